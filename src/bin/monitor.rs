//! Console monitor: wires the input handler to a logging consumer so
//! controller and keyboard activity can be inspected interactively.

use color_eyre::Result;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use unipad::{InputHandler, InputSettings};

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    let settings = match InputSettings::default_path() {
        Some(path) if path.exists() => InputSettings::load(&path)?,
        _ => InputSettings::default(),
    };
    info!(
        "starting input monitor (deadzone {}, tick {:?})",
        settings.deadzone,
        settings.poll_interval()
    );

    let mut handler = InputHandler::with_gilrs(
        settings,
        Box::new(|event| {
            info!("{event}");
            Ok(())
        }),
    )?;

    handler.start().await?;
    info!("press controller buttons or mapped keys, Ctrl-C to exit");

    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to wait for Ctrl-C: {e}");
    }
    handler.stop().await;
    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .init();
    Ok(())
}
