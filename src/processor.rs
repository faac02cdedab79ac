//! Converts raw hardware samples into candidate normalized events.
//!
//! The processor performs no I/O and knows nothing about the polling
//! mechanism, so it can be driven directly with synthetic samples in tests.

use std::collections::HashMap;

use tracing::debug;

use crate::control::Control;
use crate::event::InputEvent;
use crate::mapping::tables::MappingTarget;
use crate::mapping::vendor::DeviceProfile;
use crate::normalize::{
    apply_stick_deadzone, apply_trigger_deadzone, normalize_stick, normalize_trigger,
};
use crate::source::{RawSample, SampleCategory};

pub struct RawEventProcessor {
    profile: DeviceProfile,
    keyboard: HashMap<String, Control>,
    deadzone: f32,
}

impl RawEventProcessor {
    pub fn new(
        profile: DeviceProfile,
        keyboard: HashMap<String, Control>,
        deadzone: f32,
    ) -> Self {
        Self {
            profile,
            keyboard,
            deadzone: deadzone.clamp(0.0, 1.0),
        }
    }

    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    /// Installs a freshly detected profile, replacing the old one wholesale.
    pub fn set_profile(&mut self, profile: DeviceProfile) {
        self.profile = profile;
    }

    pub fn set_keyboard_table(&mut self, keyboard: HashMap<String, Control>) {
        self.keyboard = keyboard;
    }

    pub fn set_deadzone(&mut self, deadzone: f32) {
        self.deadzone = deadzone.clamp(0.0, 1.0);
    }

    /// Classifies one raw sample and appends the resulting candidate events,
    /// if any, to `out`. A d-pad hat axis returning to neutral produces a
    /// release for both paired directions; everything else produces at most
    /// one event. Unmapped codes are ignored.
    pub fn process(&self, sample: &RawSample, out: &mut Vec<InputEvent>) {
        match sample.category {
            SampleCategory::Key => self.process_key(sample, out),
            SampleCategory::AbsoluteAxis => self.process_axis(sample, out),
        }
    }

    fn process_key(&self, sample: &RawSample, out: &mut Vec<InputEvent>) {
        let code = sample.code.to_ascii_uppercase();
        let control = match self.profile.table.get(&code) {
            Some(MappingTarget::Single(control)) => Some(*control),
            Some(MappingTarget::Pair(..)) => {
                debug!("key sample for hat-pair code {code}, ignoring");
                None
            }
            None => self.keyboard.get(&code).copied(),
        };
        match control {
            // State is forced to exactly 0 or 1 regardless of raw magnitude.
            Some(control) => out.push(InputEvent::digital(control, sample.value != 0)),
            None => debug!("unmapped key code: {code}"),
        }
    }

    fn process_axis(&self, sample: &RawSample, out: &mut Vec<InputEvent>) {
        let code = sample.code.to_ascii_uppercase();
        match self.profile.table.get(&code) {
            Some(MappingTarget::Pair(negative, positive)) => {
                if sample.value == 0 {
                    // Neutral releases both paired directions.
                    out.push(InputEvent::digital(*negative, false));
                    out.push(InputEvent::digital(*positive, false));
                } else if sample.value < 0 {
                    out.push(InputEvent::digital(*negative, true));
                } else {
                    out.push(InputEvent::digital(*positive, true));
                }
            }
            Some(MappingTarget::Single(control)) => {
                if control.is_trigger_axis() {
                    let value =
                        apply_trigger_deadzone(normalize_trigger(sample.value), self.deadzone);
                    out.push(InputEvent::analog(*control, value));
                } else if control.is_stick_axis() {
                    let value = apply_stick_deadzone(normalize_stick(sample.value), self.deadzone);
                    out.push(InputEvent::analog(*control, value));
                } else {
                    // Some pads report plain buttons on absolute axes.
                    out.push(InputEvent::digital(*control, sample.value != 0));
                }
            }
            None => debug!("unmapped axis code: {code}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::tables::default_keyboard_table;
    use crate::mapping::vendor::{DeviceProfile, VendorKind};
    use crate::normalize::{AXIS_RAW_MAX, AXIS_RAW_MIN};

    fn processor() -> RawEventProcessor {
        RawEventProcessor::new(
            DeviceProfile::for_kind(VendorKind::Xbox),
            default_keyboard_table(),
            0.2,
        )
    }

    fn run(processor: &RawEventProcessor, sample: RawSample) -> Vec<InputEvent> {
        let mut out = Vec::new();
        processor.process(&sample, &mut out);
        out
    }

    #[test]
    fn digital_buttons_force_binary_state() {
        let processor = processor();
        let events = run(&processor, RawSample::key("BTN_SOUTH", 7));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].control, Control::A);
        assert_eq!(events[0].value, 1.0);
        assert!(!events[0].analog);

        let events = run(&processor, RawSample::key("BTN_SOUTH", 0));
        assert_eq!(events[0].value, 0.0);
    }

    #[test]
    fn unmapped_codes_are_ignored() {
        let processor = processor();
        assert!(run(&processor, RawSample::key("BTN_TRIGGER_HAPPY17", 1)).is_empty());
        assert!(run(&processor, RawSample::axis("ABS_MISC", 128)).is_empty());
    }

    #[test]
    fn keyboard_keys_map_through_the_keyboard_table() {
        let processor = processor();
        let events = run(&processor, RawSample::key("KEY_UP", 1));
        assert_eq!(events[0].control, Control::DPadUp);
        assert_eq!(events[0].value, 1.0);

        // Key lookups are case-insensitive.
        let events = run(&processor, RawSample::key("key_enter", 1));
        assert_eq!(events[0].control, Control::A);
    }

    #[test]
    fn hat_axis_presses_only_the_matching_direction() {
        let processor = processor();
        let events = run(&processor, RawSample::axis("ABS_HAT0Y", -1));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].control, Control::DPadUp);
        assert_eq!(events[0].value, 1.0);
        assert!(!events[0].analog);

        let events = run(&processor, RawSample::axis("ABS_HAT0Y", 1));
        assert_eq!(events[0].control, Control::DPadDown);
    }

    #[test]
    fn hat_axis_neutral_releases_both_directions() {
        let processor = processor();
        let events = run(&processor, RawSample::axis("ABS_HAT0Y", 0));
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].control, Control::DPadUp);
        assert_eq!(events[0].value, 0.0);
        assert_eq!(events[1].control, Control::DPadDown);
        assert_eq!(events[1].value, 0.0);
    }

    #[test]
    fn stick_axes_normalize_bipolar() {
        let processor = processor();
        let events = run(&processor, RawSample::axis("ABS_X", AXIS_RAW_MAX));
        assert_eq!(events[0].control, Control::LeftStickX);
        assert!(events[0].analog);
        assert_eq!(events[0].value, 1.0);

        let events = run(&processor, RawSample::axis("ABS_X", AXIS_RAW_MIN));
        assert_eq!(events[0].value, -1.0);
    }

    #[test]
    fn trigger_axes_normalize_one_sided() {
        let processor = processor();
        let events = run(&processor, RawSample::axis("ABS_RZ", AXIS_RAW_MAX));
        assert_eq!(events[0].control, Control::RightTriggerAxis);
        assert_eq!(events[0].value, 1.0);

        let events = run(&processor, RawSample::axis("ABS_RZ", AXIS_RAW_MIN));
        assert_eq!(events[0].value, 0.0);
    }

    #[test]
    fn deadzone_collapses_small_stick_values() {
        let mut processor = processor();
        processor.set_deadzone(0.1);
        // ~0.05 normalized, inside the 0.1 deadzone.
        let events = run(&processor, RawSample::axis("ABS_X", 1638));
        assert_eq!(events[0].value, 0.0);

        processor.set_deadzone(0.0);
        let events = run(&processor, RawSample::axis("ABS_X", 1638));
        assert!(events[0].value > 0.0);
    }

    #[test]
    fn keyboard_only_profile_still_maps_keys() {
        let processor = RawEventProcessor::new(
            DeviceProfile::unavailable(),
            default_keyboard_table(),
            0.2,
        );
        let events = run(&processor, RawSample::key("KEY_SPACE", 1));
        assert_eq!(events[0].control, Control::A);
        // Gamepad codes have nowhere to land.
        assert!(run(&processor, RawSample::key("BTN_SOUTH", 1)).is_empty());
    }
}
