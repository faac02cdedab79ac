//! The hardware source boundary.
//!
//! A [`HardwareSource`] hides the actual input backend behind two
//! operations: listing connected gamepad descriptors and pulling the next
//! batch of raw samples. Disconnects are a distinct, retryable error so the
//! polling loop can back off and redetect instead of terminating.

pub mod gilrs;

use std::time::Duration;

use thiserror::Error;

pub use gilrs::GilrsSource;

/// Category of a raw hardware sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleCategory {
    /// Digital key or button transition; any nonzero value means pressed.
    Key,
    /// Absolute axis sample carrying a raw signed 16-bit-range value
    /// (or -1/0/1 for d-pad hat axes).
    AbsoluteAxis,
}

/// One raw, unnormalized sample as delivered by the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawSample {
    pub category: SampleCategory,
    pub code: String,
    pub value: i32,
}

impl RawSample {
    pub fn key(code: impl Into<String>, value: i32) -> Self {
        Self {
            category: SampleCategory::Key,
            code: code.into(),
            value,
        }
    }

    pub fn axis(code: impl Into<String>, value: i32) -> Self {
        Self {
            category: SampleCategory::AbsoluteAxis,
            code: code.into(),
            value,
        }
    }
}

/// A connected gamepad as reported by the backend.
#[derive(Clone, Debug)]
pub struct GamepadDescriptor {
    pub name: String,
    pub path: Option<String>,
}

#[derive(Debug, Error)]
pub enum SourceError {
    /// The backend cannot be queried at all. Callers degrade to
    /// keyboard-only operation instead of failing startup.
    #[error("input hardware unavailable: {0}")]
    Unavailable(String),

    /// A device went away mid-session. Transient; retry with backoff.
    #[error("gamepad disconnected: {0}")]
    Disconnected(String),

    /// Any other backend I/O failure.
    #[error("input source error: {0}")]
    Io(String),
}

/// Backend abstraction over physical input hardware.
///
/// `poll` must return within roughly `timeout` even when no events arrive,
/// so a hung device cannot stall the polling loop indefinitely.
pub trait HardwareSource: Send {
    /// Lists the currently connected gamepad descriptors.
    fn gamepads(&mut self) -> Result<Vec<GamepadDescriptor>, SourceError>;

    /// Blocks for at most `timeout` and returns the raw samples that
    /// arrived, possibly none.
    fn poll(&mut self, timeout: Duration) -> Result<Vec<RawSample>, SourceError>;
}
