//! gilrs-backed hardware source.
//!
//! gilrs reports pre-scaled floating point values, so this backend converts
//! them back into the raw signed 16-bit range the rest of the pipeline
//! expects, and translates gilrs buttons and axes to evdev-style codes.

use std::time::{Duration, Instant};

use gilrs::{Axis, Button, EventType, Gilrs};
use tracing::{debug, info};

use crate::normalize::AXIS_RAW_MAX;
use crate::source::{GamepadDescriptor, HardwareSource, RawSample, SourceError};

pub struct GilrsSource {
    gilrs: Gilrs,
}

impl GilrsSource {
    pub fn new() -> Result<Self, SourceError> {
        let gilrs = Gilrs::new().map_err(|e| SourceError::Unavailable(e.to_string()))?;
        info!("gilrs backend initialized");
        Ok(Self { gilrs })
    }
}

impl HardwareSource for GilrsSource {
    fn gamepads(&mut self) -> Result<Vec<GamepadDescriptor>, SourceError> {
        Ok(self
            .gilrs
            .gamepads()
            .map(|(_, gamepad)| GamepadDescriptor {
                name: gamepad.name().to_string(),
                path: None,
            })
            .collect())
    }

    fn poll(&mut self, timeout: Duration) -> Result<Vec<RawSample>, SourceError> {
        let deadline = Instant::now() + timeout;
        let mut samples = Vec::new();

        loop {
            // Block only for the first event of the batch; afterwards drain
            // whatever is already queued without waiting.
            let next = if samples.is_empty() {
                let remaining = deadline.saturating_duration_since(Instant::now());
                self.gilrs.next_event_blocking(Some(remaining))
            } else {
                self.gilrs.next_event()
            };

            let Some(event) = next else {
                break;
            };

            if let EventType::Disconnected = event.event {
                return Err(SourceError::Disconnected(format!(
                    "gamepad {} went away",
                    event.id
                )));
            }
            if let Some(sample) = convert_event(event.event) {
                samples.push(sample);
            }
        }

        Ok(samples)
    }
}

fn convert_event(event: EventType) -> Option<RawSample> {
    match event {
        EventType::ButtonPressed(button, _) => {
            button_code(button).map(|code| RawSample::key(code, 1))
        }
        EventType::ButtonReleased(button, _) => {
            button_code(button).map(|code| RawSample::key(code, 0))
        }
        // Analog trigger travel arrives as ButtonChanged on the trigger-2
        // buttons with a 0..1 value.
        EventType::ButtonChanged(Button::LeftTrigger2, value, _) => {
            Some(RawSample::axis("ABS_Z", trigger_raw(value)))
        }
        EventType::ButtonChanged(Button::RightTrigger2, value, _) => {
            Some(RawSample::axis("ABS_RZ", trigger_raw(value)))
        }
        EventType::ButtonChanged(..) | EventType::ButtonRepeated(..) => None,
        EventType::AxisChanged(axis, value, _) => axis_sample(axis, value),
        EventType::Connected => {
            info!("gamepad connected");
            None
        }
        other => {
            debug!("ignoring gilrs event: {other:?}");
            None
        }
    }
}

fn button_code(button: Button) -> Option<&'static str> {
    match button {
        Button::South => Some("BTN_SOUTH"),
        Button::East => Some("BTN_EAST"),
        Button::North => Some("BTN_NORTH"),
        Button::West => Some("BTN_WEST"),
        Button::LeftTrigger => Some("BTN_TL"),
        Button::RightTrigger => Some("BTN_TR"),
        Button::LeftTrigger2 => Some("BTN_TL2"),
        Button::RightTrigger2 => Some("BTN_TR2"),
        Button::Select => Some("BTN_SELECT"),
        Button::Start => Some("BTN_START"),
        Button::Mode => Some("BTN_MODE"),
        Button::LeftThumb => Some("BTN_THUMBL"),
        Button::RightThumb => Some("BTN_THUMBR"),
        Button::DPadUp => Some("BTN_DPAD_UP"),
        Button::DPadDown => Some("BTN_DPAD_DOWN"),
        Button::DPadLeft => Some("BTN_DPAD_LEFT"),
        Button::DPadRight => Some("BTN_DPAD_RIGHT"),
        _ => None,
    }
}

fn axis_sample(axis: Axis, value: f32) -> Option<RawSample> {
    match axis {
        Axis::LeftStickX => Some(RawSample::axis("ABS_X", stick_raw(value))),
        Axis::LeftStickY => Some(RawSample::axis("ABS_Y", stick_raw(value))),
        Axis::RightStickX => Some(RawSample::axis("ABS_RX", stick_raw(value))),
        Axis::RightStickY => Some(RawSample::axis("ABS_RY", stick_raw(value))),
        Axis::LeftZ => Some(RawSample::axis("ABS_Z", trigger_raw(value))),
        Axis::RightZ => Some(RawSample::axis("ABS_RZ", trigger_raw(value))),
        // evdev hat axes use negative for up/left, gilrs uses positive
        // for up, so the Y sign flips.
        Axis::DPadX => Some(RawSample::axis("ABS_HAT0X", hat_raw(value))),
        Axis::DPadY => Some(RawSample::axis("ABS_HAT0Y", -hat_raw(value))),
        _ => {
            debug!("ignoring unsupported axis: {axis:?}");
            None
        }
    }
}

fn stick_raw(value: f32) -> i32 {
    (value.clamp(-1.0, 1.0) * AXIS_RAW_MAX as f32) as i32
}

fn trigger_raw(value: f32) -> i32 {
    (value.clamp(0.0, 1.0) * 65535.0) as i32 - 32768
}

fn hat_raw(value: f32) -> i32 {
    if value > 0.5 {
        1
    } else if value < -0.5 {
        -1
    } else {
        0
    }
}
