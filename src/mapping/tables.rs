//! Static mapping tables.
//!
//! Raw codes follow the evdev naming convention (`BTN_SOUTH`, `ABS_X`,
//! `ABS_HAT0Y`, `KEY_UP`) and are matched case-insensitively after ASCII
//! uppercasing. The base gamepad table describes the Xbox-style layout;
//! vendor overlays replace individual entries for the same code and leave
//! everything else untouched.

use std::collections::HashMap;

use crate::control::Control;

/// Target of a raw-code lookup.
///
/// `Pair` is used only for d-pad hat axes, where one raw axis stands for two
/// mutually exclusive directions: the first control corresponds to negative
/// raw values, the second to positive ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MappingTarget {
    Single(Control),
    Pair(Control, Control),
}

/// Gamepad lookup table, keyed by uppercased raw code.
pub type GamepadTable = HashMap<String, MappingTarget>;

const BASE_BUTTONS: &[(&str, Control)] = &[
    ("BTN_SOUTH", Control::A),
    ("BTN_EAST", Control::B),
    ("BTN_NORTH", Control::Y),
    ("BTN_WEST", Control::X),
    ("BTN_TL", Control::LeftBumper),
    ("BTN_TR", Control::RightBumper),
    ("BTN_TL2", Control::LeftTrigger),
    ("BTN_TR2", Control::RightTrigger),
    ("BTN_SELECT", Control::Select),
    ("BTN_START", Control::Start),
    ("BTN_MODE", Control::Home),
    ("BTN_THUMBL", Control::LeftThumb),
    ("BTN_THUMBR", Control::RightThumb),
    // Pads that report the d-pad as plain buttons instead of a hat axis.
    ("BTN_DPAD_UP", Control::DPadUp),
    ("BTN_DPAD_DOWN", Control::DPadDown),
    ("BTN_DPAD_LEFT", Control::DPadLeft),
    ("BTN_DPAD_RIGHT", Control::DPadRight),
];

const BASE_AXES: &[(&str, Control)] = &[
    ("ABS_X", Control::LeftStickX),
    ("ABS_Y", Control::LeftStickY),
    ("ABS_RX", Control::RightStickX),
    ("ABS_RY", Control::RightStickY),
    ("ABS_Z", Control::LeftTriggerAxis),
    ("ABS_RZ", Control::RightTriggerAxis),
];

/// Sony pads report the north/west face buttons swapped relative to the
/// Xbox-style base layout.
pub const SONY_OVERLAY: &[(&str, Control)] = &[
    ("BTN_SOUTH", Control::A),
    ("BTN_EAST", Control::B),
    ("BTN_NORTH", Control::X),
    ("BTN_WEST", Control::Y),
];

/// Nintendo pads use the mirrored A/B and X/Y arrangement.
pub const NINTENDO_OVERLAY: &[(&str, Control)] = &[
    ("BTN_SOUTH", Control::B),
    ("BTN_EAST", Control::A),
    ("BTN_NORTH", Control::X),
    ("BTN_WEST", Control::Y),
];

/// The base table already describes the Xbox layout.
pub const XBOX_OVERLAY: &[(&str, Control)] = &[];

/// Builds the vendor-neutral gamepad table.
pub fn base_gamepad_table() -> GamepadTable {
    let mut table: GamepadTable = HashMap::new();
    for (code, control) in BASE_BUTTONS.iter().chain(BASE_AXES) {
        table.insert((*code).to_string(), MappingTarget::Single(*control));
    }
    table.insert(
        "ABS_HAT0X".to_string(),
        MappingTarget::Pair(Control::DPadLeft, Control::DPadRight),
    );
    table.insert(
        "ABS_HAT0Y".to_string(),
        MappingTarget::Pair(Control::DPadUp, Control::DPadDown),
    );
    table
}

const DEFAULT_KEYS: &[(&str, Control)] = &[
    // Navigation
    ("KEY_UP", Control::DPadUp),
    ("KEY_DOWN", Control::DPadDown),
    ("KEY_LEFT", Control::DPadLeft),
    ("KEY_RIGHT", Control::DPadRight),
    // Primary and secondary actions
    ("KEY_ENTER", Control::A),
    ("KEY_SPACE", Control::A),
    ("KEY_ESC", Control::B),
    ("KEY_BACKSPACE", Control::B),
    ("KEY_TAB", Control::Select),
    ("KEY_RETURN", Control::Start),
    // WASD navigation
    ("KEY_W", Control::DPadUp),
    ("KEY_S", Control::DPadDown),
    ("KEY_A", Control::DPadLeft),
    ("KEY_D", Control::DPadRight),
    // Alternate action cluster
    ("KEY_J", Control::A),
    ("KEY_K", Control::B),
    ("KEY_I", Control::Y),
    ("KEY_U", Control::X),
    ("KEY_Q", Control::LeftBumper),
    ("KEY_E", Control::RightBumper),
    ("KEY_1", Control::Start),
    ("KEY_2", Control::Select),
];

/// Builds the default keyboard table: arrow keys and WASD drive the d-pad,
/// Enter/Space confirm, Escape/Backspace cancel, Tab selects, Return starts.
pub fn default_keyboard_table() -> HashMap<String, Control> {
    DEFAULT_KEYS
        .iter()
        .map(|(code, control)| ((*code).to_string(), *control))
        .collect()
}
