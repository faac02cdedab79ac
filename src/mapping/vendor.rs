//! Vendor detection and device profiles.
//!
//! A newly connected gamepad is classified by case-insensitive substring
//! matching of its descriptor name against ordered keyword sets. The match
//! order is significant and fixed: Sony is checked before Nintendo before
//! Xbox, so a pad advertising several vendor names (for example a Sony pad
//! running in an Xbox compatibility mode) resolves to the earlier vendor.
//! Anything unmatched falls back to the generic profile.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::control::Control;
use crate::mapping::tables::{
    base_gamepad_table, GamepadTable, MappingTarget, NINTENDO_OVERLAY, SONY_OVERLAY, XBOX_OVERLAY,
};
use crate::source::HardwareSource;

const SONY_KEYWORDS: &[&str] = &[
    "sony",
    "dualshock",
    "dualsense",
    "playstation",
    "ps3",
    "ps4",
    "ps5",
];

const NINTENDO_KEYWORDS: &[&str] = &[
    "nintendo",
    "switch",
    "joy-con",
    "joycon",
    "pro controller",
];

const XBOX_KEYWORDS: &[&str] = &[
    "xbox", "x-box", "xinput", "x360", "xone", "series x", "series s",
];

/// Detected controller family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VendorKind {
    Sony,
    Nintendo,
    Xbox,
    Generic,
    /// No gamepad is currently connected; keyboard mapping stays active.
    Absent,
    /// The hardware source could not be queried at all.
    Unavailable,
}

impl VendorKind {
    fn overlay(self) -> &'static [(&'static str, Control)] {
        match self {
            VendorKind::Sony => SONY_OVERLAY,
            VendorKind::Nintendo => NINTENDO_OVERLAY,
            VendorKind::Xbox => XBOX_OVERLAY,
            VendorKind::Generic | VendorKind::Absent | VendorKind::Unavailable => &[],
        }
    }

    /// Whether a gamepad mapping table is installed for this kind.
    pub fn has_gamepad(self) -> bool {
        !matches!(self, VendorKind::Absent | VendorKind::Unavailable)
    }
}

/// An immutable vendor profile: the detected kind plus the fully merged
/// mapping table. Replaced wholesale on redetection, never partially mutated.
#[derive(Clone, Debug)]
pub struct DeviceProfile {
    pub kind: VendorKind,
    pub table: GamepadTable,
}

impl DeviceProfile {
    /// Builds the profile for a detected vendor: the base table with the
    /// vendor overlay merged on top (overlay entries replace base entries
    /// for the same raw code, nothing else changes).
    pub fn for_kind(kind: VendorKind) -> Self {
        if !kind.has_gamepad() {
            return Self {
                kind,
                table: HashMap::new(),
            };
        }
        let mut table = base_gamepad_table();
        for (code, control) in kind.overlay() {
            table.insert((*code).to_string(), MappingTarget::Single(*control));
        }
        Self { kind, table }
    }

    /// Keyboard-only profile for when no gamepad is connected.
    pub fn absent() -> Self {
        Self::for_kind(VendorKind::Absent)
    }

    /// Keyboard-only profile for when the hardware source cannot be queried.
    pub fn unavailable() -> Self {
        Self::for_kind(VendorKind::Unavailable)
    }
}

/// Classifies a gamepad descriptor name. First keyword match wins; the
/// Sony → Nintendo → Xbox order is part of the contract.
pub fn classify(name: &str) -> VendorKind {
    let name = name.to_lowercase();
    for (kind, keywords) in [
        (VendorKind::Sony, SONY_KEYWORDS),
        (VendorKind::Nintendo, NINTENDO_KEYWORDS),
        (VendorKind::Xbox, XBOX_KEYWORDS),
    ] {
        if keywords.iter().any(|keyword| name.contains(keyword)) {
            return kind;
        }
    }
    VendorKind::Generic
}

/// Queries the hardware source and builds the profile for the first
/// connected gamepad. Detection never fails hard: an unqueryable source
/// degrades to a keyboard-only profile.
pub fn detect_profile(source: &mut dyn HardwareSource) -> DeviceProfile {
    let descriptors = match source.gamepads() {
        Ok(descriptors) => descriptors,
        Err(e) => {
            warn!("unable to query gamepads, continuing keyboard-only: {e}");
            return DeviceProfile::unavailable();
        }
    };

    let Some(first) = descriptors.first() else {
        info!("no gamepad detected, keyboard mapping remains active");
        return DeviceProfile::absent();
    };

    debug!("connected gamepads: {descriptors:?}");
    let kind = classify(&first.name);
    info!("detected gamepad \"{}\" as {:?}", first.name, kind);
    DeviceProfile::for_kind(kind)
}
