//! unipad: unified gamepad and keyboard input layer.
//!
//! Turns heterogeneous physical input (multiple gamepad vendors plus
//! keyboard) into a single normalized, timestamped event stream. A
//! background worker polls the hardware source at a bounded tick rate,
//! classifies each raw sample, normalizes analog values, and forwards
//! significant changes to a consumer callback. Vendor layout differences
//! are compensated by a profile detected once at startup, so the consumer
//! never needs to know which controller is plugged in.
//!
//! Hardware faults degrade instead of crashing: an unavailable backend
//! means keyboard-only operation, disconnects are retried with backoff,
//! and a misbehaving consumer callback is isolated from the input thread.

pub mod config;
pub mod control;
pub mod dispatch;
pub mod event;
pub mod handler;
pub mod mapping;
pub mod normalize;
pub mod processor;
pub mod source;

pub use config::{ConfigError, InputSettings};
pub use control::Control;
pub use dispatch::{CallbackError, Dispatcher, InputCallback};
pub use event::InputEvent;
pub use handler::{HandlerError, InputHandler};
pub use mapping::{DeviceProfile, VendorKind};
pub use processor::RawEventProcessor;
pub use source::{
    GamepadDescriptor, GilrsSource, HardwareSource, RawSample, SampleCategory, SourceError,
};
