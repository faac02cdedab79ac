//! Normalized input events with precise chrono timestamps.

use chrono::{DateTime, Local};
use std::fmt;

use crate::control::Control;

/// One normalized input occurrence.
///
/// Digital events carry exactly 0.0 or 1.0. Analog events carry a value in
/// [-1.0, 1.0] for stick axes and [0.0, 1.0] for trigger axes. Events are
/// consumed immediately by the dispatcher and are not retained.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputEvent {
    pub control: Control,
    pub value: f32,
    pub analog: bool,
    pub timestamp: DateTime<Local>,
}

impl InputEvent {
    /// A digital press (1) or release (0), stamped with the current time.
    pub fn digital(control: Control, pressed: bool) -> Self {
        Self {
            control,
            value: if pressed { 1.0 } else { 0.0 },
            analog: false,
            timestamp: Local::now(),
        }
    }

    /// An analog sample, clamped to the valid range for the control.
    pub fn analog(control: Control, value: f32) -> Self {
        let value = if control.is_trigger_axis() {
            value.clamp(0.0, 1.0)
        } else {
            value.clamp(-1.0, 1.0)
        };
        Self {
            control,
            value,
            analog: true,
            timestamp: Local::now(),
        }
    }
}

impl fmt::Display for InputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.analog { "analog" } else { "digital" };
        write!(f, "{} event: {:?} = {:.4}", kind, self.control, self.value)
    }
}
