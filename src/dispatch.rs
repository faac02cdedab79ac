//! Event significance filtering and consumer callback delivery.
//!
//! The dispatcher caches the last forwarded value per control and drops
//! candidates that would not change what the consumer sees: digital repeats,
//! and analog wobble below the significance threshold. The threshold is
//! separate from the normalizer's deadzone and is applied after it.
//!
//! The registered callback runs synchronously on the polling thread, so it
//! must not block or do long-running work. A failing callback cannot crash
//! the input thread: failures are logged and counted, and after enough
//! consecutive failures dispatch is permanently disabled.

use std::collections::HashMap;

use tracing::{error, warn};

use crate::control::Control;
use crate::event::InputEvent;

/// Minimum absolute change for an analog event to be forwarded.
pub const ANALOG_SIGNIFICANCE: f32 = 0.05;

/// Consecutive callback failures tolerated before dispatch is disabled.
pub const MAX_CONSECUTIVE_FAILURES: u32 = 10;

pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Consumer callback registered at construction. Invoked zero or more times
/// per tick, never concurrently with itself.
pub type InputCallback = Box<dyn FnMut(InputEvent) -> Result<(), CallbackError> + Send>;

pub struct Dispatcher {
    last_values: HashMap<Control, f32>,
    callback: Option<InputCallback>,
    consecutive_failures: u32,
}

impl Dispatcher {
    pub fn new(callback: InputCallback) -> Self {
        Self {
            last_values: HashMap::new(),
            callback: Some(callback),
            consecutive_failures: 0,
        }
    }

    /// Whether dispatch has been disabled after repeated callback failures.
    pub fn is_disabled(&self) -> bool {
        self.callback.is_none()
    }

    /// Last value forwarded for a control, if any.
    pub fn last_value(&self, control: Control) -> Option<f32> {
        self.last_values.get(&control).copied()
    }

    /// Offers a candidate event. Returns true if it was forwarded to the
    /// consumer callback.
    ///
    /// Digital events forward only on a state change. Analog events forward
    /// when no previous value is cached or the change reaches
    /// [`ANALOG_SIGNIFICANCE`].
    pub fn offer(&mut self, event: InputEvent) -> bool {
        if self.callback.is_none() {
            return false;
        }

        let last = self.last_values.get(&event.control).copied();
        let significant = if event.analog {
            match last {
                None => true,
                Some(previous) => (event.value - previous).abs() >= ANALOG_SIGNIFICANCE,
            }
        } else {
            last != Some(event.value)
        };
        if !significant {
            return false;
        }

        // Cache before invoking so a failing consumer still observes
        // monotonic state.
        self.last_values.insert(event.control, event.value);

        let Some(callback) = self.callback.as_mut() else {
            return false;
        };
        match callback(event) {
            Ok(()) => self.consecutive_failures = 0,
            Err(e) => {
                self.consecutive_failures += 1;
                warn!(
                    "input callback failed ({}/{}): {e}",
                    self.consecutive_failures, MAX_CONSECUTIVE_FAILURES
                );
                if self.consecutive_failures >= MAX_CONSECUTIVE_FAILURES {
                    error!("input callback disabled after repeated failures");
                    self.callback = None;
                }
            }
        }
        true
    }
}
