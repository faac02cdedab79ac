//! Lookup tables from raw hardware codes to logical controls, plus vendor
//! detection for per-manufacturer layout differences.

pub mod tables;
pub mod vendor;

pub use tables::{base_gamepad_table, default_keyboard_table, GamepadTable, MappingTarget};
pub use vendor::{classify, detect_profile, DeviceProfile, VendorKind};
