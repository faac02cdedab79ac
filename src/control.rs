//! The closed set of normalized logical controls.
//!
//! Every physical input, whatever the vendor layout or keyboard key that
//! produced it, is reported against exactly one of these identifiers.

use serde::{Deserialize, Serialize};

/// A normalized logical input identifier, independent of physical hardware.
///
/// Digital controls report 0 or 1; stick axes report -1.0..=1.0; trigger
/// axes report 0.0..=1.0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    // Face buttons
    A,
    B,
    X,
    Y,

    // Shoulder bumpers and trigger clicks
    LeftBumper,
    RightBumper,
    LeftTrigger,
    RightTrigger,

    // Menu buttons
    Start,
    Select,
    Home,

    // D-pad directions
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,

    // Stick clicks
    LeftThumb,
    RightThumb,

    // Stick axes
    LeftStickX,
    LeftStickY,
    RightStickX,
    RightStickY,

    // Analog triggers
    LeftTriggerAxis,
    RightTriggerAxis,
}

impl Control {
    /// Two-sided analog axis, normalized to [-1.0, 1.0].
    pub fn is_stick_axis(self) -> bool {
        matches!(
            self,
            Control::LeftStickX
                | Control::LeftStickY
                | Control::RightStickX
                | Control::RightStickY
        )
    }

    /// One-sided analog axis, normalized to [0.0, 1.0].
    pub fn is_trigger_axis(self) -> bool {
        matches!(self, Control::LeftTriggerAxis | Control::RightTriggerAxis)
    }
}
