//! Polling loop and lifecycle controller.
//!
//! One [`InputHandler`] owns exactly one background worker. The worker is
//! the sole mutator of dispatcher state and mapping tables once running;
//! the foreground thread only flips the stop token and pushes knob updates
//! (deadzone, keyboard table) through watch channels, which the worker
//! picks up at the start of each tick.
//!
//! The consumer callback runs synchronously on the worker, so it must not
//! block or perform long-running work; doing so directly throttles input
//! latency.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::{oneshot, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::{ConfigError, InputSettings};
use crate::control::Control;
use crate::dispatch::{Dispatcher, InputCallback};
use crate::event::InputEvent;
use crate::mapping::vendor::{detect_profile, DeviceProfile};
use crate::processor::RawEventProcessor;
use crate::source::{GilrsSource, HardwareSource, SourceError};

/// How long `start` waits for the worker to report it is executing.
const STARTUP_TIMEOUT: Duration = Duration::from_secs(1);

/// How long `stop` waits for the worker to drain and exit.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

/// Backoff after a disconnect before retrying the source.
const DISCONNECT_BACKOFF: Duration = Duration::from_secs(1);

/// Consecutive unexpected tick errors tolerated before cooling down.
const MAX_ERROR_STREAK: u32 = 5;

/// Cooldown applied once the error streak is exhausted, to avoid a hot
/// error loop.
const ERROR_COOLDOWN: Duration = Duration::from_secs(5);

pub type SourceFactory =
    Arc<dyn Fn() -> Result<Box<dyn HardwareSource>, SourceError> + Send + Sync>;

#[derive(Debug, Error)]
pub enum HandlerError {
    /// The background worker never began executing.
    #[error("failed to start input worker: {0}")]
    InitializationFailure(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

struct Worker {
    cancel: CancellationToken,
    join: tokio::task::JoinHandle<()>,
}

/// Unified gamepad and keyboard input handler.
///
/// Lifecycle is `Stopped → Running → Stopped`; `start` and `stop` are
/// idempotent (a redundant call warns and does nothing) and safe to call
/// from a different thread than the worker.
pub struct InputHandler {
    settings: InputSettings,
    source_factory: SourceFactory,
    dispatcher: Arc<Mutex<Dispatcher>>,
    deadzone_tx: watch::Sender<f32>,
    keyboard_tx: watch::Sender<HashMap<String, Control>>,
    worker: Option<Worker>,
}

impl InputHandler {
    /// Creates a handler with an explicit hardware source factory. The
    /// factory runs on the worker at each `start`, so a fresh source (and a
    /// fresh vendor detection pass) backs every run.
    pub fn new<F>(
        settings: InputSettings,
        source_factory: F,
        callback: InputCallback,
    ) -> Result<Self, HandlerError>
    where
        F: Fn() -> Result<Box<dyn HardwareSource>, SourceError> + Send + Sync + 'static,
    {
        settings.validate()?;
        let (deadzone_tx, _) = watch::channel(settings.deadzone);
        let (keyboard_tx, _) = watch::channel(settings.keyboard_table());
        Ok(Self {
            settings,
            source_factory: Arc::new(source_factory),
            dispatcher: Arc::new(Mutex::new(Dispatcher::new(callback))),
            deadzone_tx,
            keyboard_tx,
            worker: None,
        })
    }

    /// Creates a handler backed by the gilrs hardware source.
    pub fn with_gilrs(
        settings: InputSettings,
        callback: InputCallback,
    ) -> Result<Self, HandlerError> {
        Self::new(
            settings,
            || GilrsSource::new().map(|source| Box::new(source) as Box<dyn HardwareSource>),
            callback,
        )
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Spawns the background polling worker and waits for it to begin
    /// executing. No-op with a warning if already running. If the worker
    /// never reports ready the handler rolls back to stopped and returns
    /// [`HandlerError::InitializationFailure`].
    pub async fn start(&mut self) -> Result<(), HandlerError> {
        if self.worker.is_some() {
            warn!("input handler is already running");
            return Ok(());
        }

        let cancel = CancellationToken::new();
        let (ready_tx, ready_rx) = oneshot::channel();

        let loop_body = PollLoop {
            factory: self.source_factory.clone(),
            dispatcher: self.dispatcher.clone(),
            deadzone_rx: self.deadzone_tx.subscribe(),
            keyboard_rx: self.keyboard_tx.subscribe(),
            poll_interval: self.settings.poll_interval(),
            cancel: cancel.clone(),
        };
        let join = tokio::task::spawn_blocking(move || loop_body.run(ready_tx));

        match tokio::time::timeout(STARTUP_TIMEOUT, ready_rx).await {
            Ok(Ok(())) => {
                info!("input handler started");
                self.worker = Some(Worker { cancel, join });
                Ok(())
            }
            Ok(Err(_)) | Err(_) => {
                cancel.cancel();
                join.abort();
                Err(HandlerError::InitializationFailure(
                    "worker did not begin executing".to_string(),
                ))
            }
        }
    }

    /// Signals the worker to stop and waits for it to exit, bounded by a
    /// timeout. No-op with a warning if already stopped. The handler is
    /// stopped afterwards regardless of whether the worker exited in time.
    pub async fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            warn!("input handler is already stopped");
            return;
        };

        info!("stopping input handler");
        worker.cancel.cancel();
        match tokio::time::timeout(SHUTDOWN_TIMEOUT, worker.join).await {
            Ok(_) => info!("input handler stopped"),
            Err(_) => warn!("input worker did not exit within {SHUTDOWN_TIMEOUT:?}"),
        }
    }

    /// Updates the analog deadzone, clamped to [0.0, 1.0]. Takes effect on
    /// the worker's next tick.
    pub fn set_deadzone(&self, deadzone: f32) {
        let deadzone = deadzone.clamp(0.0, 1.0);
        debug!("deadzone set to {deadzone}");
        self.deadzone_tx.send_replace(deadzone);
    }

    /// Replaces the keyboard table wholesale. An empty map restores the
    /// defaults plus the configured overrides.
    pub fn set_keyboard_mapping(&self, mapping: HashMap<String, Control>) {
        let table = if mapping.is_empty() {
            self.settings.keyboard_table()
        } else {
            mapping
                .into_iter()
                .map(|(code, control)| (code.to_ascii_uppercase(), control))
                .collect()
        };
        self.keyboard_tx.send_replace(table);
    }
}

impl Drop for InputHandler {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            debug!("input handler dropped while running, cancelling worker");
            worker.cancel.cancel();
        }
    }
}

/// The blocking loop body executed on the worker.
struct PollLoop {
    factory: SourceFactory,
    dispatcher: Arc<Mutex<Dispatcher>>,
    deadzone_rx: watch::Receiver<f32>,
    keyboard_rx: watch::Receiver<HashMap<String, Control>>,
    poll_interval: Duration,
    cancel: CancellationToken,
}

impl PollLoop {
    fn run(mut self, ready: oneshot::Sender<()>) {
        info!("input polling loop starting");
        if ready.send(()).is_err() {
            // start() gave up on us already.
            return;
        }

        let mut source = match (self.factory)() {
            Ok(source) => Some(source),
            Err(e) => {
                warn!("input hardware unavailable, continuing keyboard-only: {e}");
                None
            }
        };

        let profile = match source.as_mut() {
            Some(source) => detect_profile(source.as_mut()),
            None => DeviceProfile::unavailable(),
        };
        let mut processor = RawEventProcessor::new(
            profile,
            self.keyboard_rx.borrow().clone(),
            *self.deadzone_rx.borrow(),
        );

        let mut pending: Vec<InputEvent> = Vec::new();
        let mut error_streak = 0u32;

        while !self.cancel.is_cancelled() {
            let tick_start = Instant::now();

            if self.deadzone_rx.has_changed().unwrap_or(false) {
                processor.set_deadzone(*self.deadzone_rx.borrow_and_update());
            }
            if self.keyboard_rx.has_changed().unwrap_or(false) {
                processor.set_keyboard_table(self.keyboard_rx.borrow_and_update().clone());
            }

            let Some(active) = source.as_mut() else {
                // Nothing to pull; idle at the tick rate until stopped.
                std::thread::sleep(self.poll_interval);
                continue;
            };

            match active.poll(self.poll_interval) {
                Ok(samples) => {
                    error_streak = 0;
                    for sample in &samples {
                        processor.process(sample, &mut pending);
                    }
                    if !pending.is_empty() {
                        let mut dispatcher = self
                            .dispatcher
                            .lock()
                            .unwrap_or_else(|poisoned| poisoned.into_inner());
                        for event in pending.drain(..) {
                            dispatcher.offer(event);
                        }
                    }
                }
                Err(SourceError::Disconnected(reason)) => {
                    warn!("gamepad disconnected, retrying: {reason}");
                    self.sleep_cancellable(DISCONNECT_BACKOFF);
                    // The pad may have come back as a different device.
                    processor.set_profile(detect_profile(active.as_mut()));
                }
                Err(SourceError::Unavailable(reason)) => {
                    warn!("input hardware became unavailable, keyboard-only: {reason}");
                    processor.set_profile(DeviceProfile::unavailable());
                    source = None;
                }
                Err(e) => {
                    error_streak += 1;
                    error!("polling error ({error_streak}/{MAX_ERROR_STREAK}): {e}");
                    if error_streak >= MAX_ERROR_STREAK {
                        error!("too many consecutive polling errors, cooling down");
                        self.sleep_cancellable(ERROR_COOLDOWN);
                        error_streak = 0;
                    }
                }
            }

            let elapsed = tick_start.elapsed();
            if elapsed < self.poll_interval && !self.cancel.is_cancelled() {
                std::thread::sleep(self.poll_interval - elapsed);
            }
        }

        info!("input polling loop stopped");
    }

    /// Sleeps in small slices so a stop request is honored promptly.
    fn sleep_cancellable(&self, total: Duration) {
        let slice = Duration::from_millis(50);
        let deadline = Instant::now() + total;
        while Instant::now() < deadline && !self.cancel.is_cancelled() {
            std::thread::sleep(slice.min(deadline.saturating_duration_since(Instant::now())));
        }
    }
}
