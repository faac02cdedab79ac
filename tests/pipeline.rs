//! End-to-end pipeline tests: a scripted hardware source feeds the running
//! handler and the consumer callback observes the normalized stream.

use std::collections::VecDeque;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use unipad::{
    Control, GamepadDescriptor, HardwareSource, InputEvent, InputHandler, InputSettings,
    RawSample, SourceError,
};

type Script = Arc<Mutex<VecDeque<Result<Vec<RawSample>, SourceError>>>>;

/// Replays a prepared script of poll outcomes, then idles.
struct ScriptedSource {
    name: String,
    script: Script,
}

impl HardwareSource for ScriptedSource {
    fn gamepads(&mut self) -> Result<Vec<GamepadDescriptor>, SourceError> {
        Ok(vec![GamepadDescriptor {
            name: self.name.clone(),
            path: None,
        }])
    }

    fn poll(&mut self, timeout: Duration) -> Result<Vec<RawSample>, SourceError> {
        let next = self
            .script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();
        match next {
            Some(outcome) => outcome,
            None => {
                std::thread::sleep(timeout);
                Ok(Vec::new())
            }
        }
    }
}

fn scripted_handler(
    name: &str,
    script: Vec<Result<Vec<RawSample>, SourceError>>,
) -> (InputHandler, mpsc::Receiver<InputEvent>) {
    let script: Script = Arc::new(Mutex::new(script.into()));
    let (event_tx, event_rx) = mpsc::channel();

    let name = name.to_string();
    let handler = InputHandler::new(
        InputSettings::default(),
        move || {
            Ok(Box::new(ScriptedSource {
                name: name.clone(),
                script: script.clone(),
            }) as Box<dyn HardwareSource>)
        },
        Box::new(move |event| {
            event_tx.send(event).map_err(|e| e.to_string())?;
            Ok(())
        }),
    )
    .expect("handler construction");

    (handler, event_rx)
}

fn collect(receiver: &mpsc::Receiver<InputEvent>, count: usize) -> Vec<InputEvent> {
    let mut events = Vec::new();
    while events.len() < count {
        match receiver.recv_timeout(Duration::from_secs(2)) {
            Ok(event) => events.push(event),
            Err(_) => break,
        }
    }
    events
}

#[tokio::test]
async fn scripted_samples_reach_the_consumer_normalized() {
    let (mut handler, events) = scripted_handler(
        "Xbox Wireless Controller",
        vec![
            Ok(vec![
                RawSample::key("BTN_SOUTH", 1),
                RawSample::axis("ABS_HAT0Y", -1),
                RawSample::axis("ABS_X", 32767),
                RawSample::axis("ABS_Z", 32767),
            ]),
            Ok(vec![
                RawSample::key("BTN_SOUTH", 0),
                RawSample::axis("ABS_HAT0Y", 0),
                RawSample::axis("ABS_X", 0),
            ]),
        ],
    );

    handler.start().await.expect("start");
    let seen = collect(&events, 8);
    handler.stop().await;

    let summary: Vec<(Control, f32, bool)> = seen
        .iter()
        .map(|event| (event.control, event.value, event.analog))
        .collect();
    assert_eq!(
        summary,
        vec![
            (Control::A, 1.0, false),
            (Control::DPadUp, 1.0, false),
            (Control::LeftStickX, 1.0, true),
            (Control::LeftTriggerAxis, 1.0, true),
            (Control::A, 0.0, false),
            // Hat neutral releases both paired directions.
            (Control::DPadUp, 0.0, false),
            (Control::DPadDown, 0.0, false),
            // Stick back to center: deadzone-suppressed exact zero.
            (Control::LeftStickX, 0.0, true),
        ]
    );
}

#[tokio::test]
async fn sony_profile_is_applied_to_face_buttons() {
    let (mut handler, events) = scripted_handler(
        "Sony Wireless Controller (Xbox Mode)",
        vec![Ok(vec![
            RawSample::key("BTN_NORTH", 1),
            RawSample::key("BTN_WEST", 1),
        ])],
    );

    handler.start().await.expect("start");
    let seen = collect(&events, 2);
    handler.stop().await;

    // Sony overlay swaps north/west relative to the Xbox-style base table.
    assert_eq!(seen[0].control, Control::X);
    assert_eq!(seen[1].control, Control::Y);
}

#[tokio::test]
async fn disconnect_is_retried_and_events_resume() {
    let (mut handler, events) = scripted_handler(
        "Xbox Wireless Controller",
        vec![
            Err(SourceError::Disconnected("cable pulled".to_string())),
            Ok(vec![RawSample::key("BTN_START", 1)]),
        ],
    );

    handler.start().await.expect("start");
    let seen = collect(&events, 1);
    handler.stop().await;

    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].control, Control::Start);
    assert_eq!(seen[0].value, 1.0);
}

#[tokio::test]
async fn repeated_polling_errors_cool_down_then_recover() {
    let (mut handler, events) = scripted_handler(
        "Xbox Wireless Controller",
        vec![
            Err(SourceError::Io("transient fault".to_string())),
            Err(SourceError::Io("transient fault".to_string())),
            Err(SourceError::Io("transient fault".to_string())),
            Err(SourceError::Io("transient fault".to_string())),
            Err(SourceError::Io("transient fault".to_string())),
            Ok(vec![RawSample::key("BTN_SOUTH", 1)]),
        ],
    );

    let started = std::time::Instant::now();
    handler.start().await.expect("start");
    let event = events.recv_timeout(Duration::from_secs(10));
    let waited = started.elapsed();
    handler.stop().await;

    // The fifth consecutive error triggers the cooldown; delivery resumes
    // afterwards instead of the loop giving up.
    let event = event.expect("event after cooldown");
    assert_eq!(event.control, Control::A);
    assert_eq!(event.value, 1.0);
    assert!(
        waited >= Duration::from_secs(4),
        "expected a cooldown before recovery, got {waited:?}"
    );
}

#[tokio::test]
async fn source_turning_unavailable_mid_session_degrades_cleanly() {
    let (mut handler, events) = scripted_handler(
        "Xbox Wireless Controller",
        vec![
            Ok(vec![RawSample::key("BTN_SOUTH", 1)]),
            Err(SourceError::Unavailable("backend went away".to_string())),
        ],
    );

    handler.start().await.expect("start");
    let seen = collect(&events, 1);
    handler.stop().await;

    // The press before the failure arrives; afterwards the loop idles on the
    // keyboard-only profile instead of erroring.
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].control, Control::A);
    assert!(!handler.is_running());
}

#[tokio::test]
async fn unavailable_hardware_degrades_to_keyboard_only() {
    let (event_tx, event_rx) = mpsc::channel::<InputEvent>();
    let mut handler = InputHandler::new(
        InputSettings::default(),
        || Err(SourceError::Unavailable("no permission".to_string())),
        Box::new(move |event| {
            event_tx.send(event).map_err(|e| e.to_string())?;
            Ok(())
        }),
    )
    .expect("handler construction");

    // Startup must not fail just because the hardware is missing.
    handler.start().await.expect("start");
    assert!(handler.is_running());
    tokio::time::sleep(Duration::from_millis(50)).await;
    handler.stop().await;

    assert!(event_rx.try_recv().is_err());
}

#[tokio::test]
async fn lifecycle_calls_are_idempotent() {
    let (mut handler, _events) = scripted_handler("Xbox Wireless Controller", Vec::new());

    assert!(!handler.is_running());
    handler.start().await.expect("start");
    assert!(handler.is_running());

    // Redundant start is a warning, not an error, and keeps running.
    handler.start().await.expect("redundant start");
    assert!(handler.is_running());

    handler.stop().await;
    assert!(!handler.is_running());

    // Redundant stop is a no-op.
    handler.stop().await;
    assert!(!handler.is_running());
}

#[tokio::test]
async fn handler_can_be_restarted() {
    let script: Script = Arc::new(Mutex::new(VecDeque::new()));
    let (event_tx, event_rx) = mpsc::channel();

    let factory_script = script.clone();
    let mut handler = InputHandler::new(
        InputSettings::default(),
        move || {
            Ok(Box::new(ScriptedSource {
                name: "Xbox Wireless Controller".to_string(),
                script: factory_script.clone(),
            }) as Box<dyn HardwareSource>)
        },
        Box::new(move |event| {
            event_tx.send(event).map_err(|e| e.to_string())?;
            Ok(())
        }),
    )
    .expect("handler construction");

    handler.start().await.expect("first start");
    handler.stop().await;

    script
        .lock()
        .expect("script lock")
        .push_back(Ok(vec![RawSample::key("BTN_SOUTH", 1)]));
    handler.start().await.expect("second start");
    let seen = collect(&event_rx, 1);
    handler.stop().await;

    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].control, Control::A);
}
