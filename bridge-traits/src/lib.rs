//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the navigation bar core and the
//! platform-specific code that actually drives the OS. The core only ever
//! sees trait objects; hosts inject their native adapters at startup.
//!
//! ## Traits
//!
//! - [`NavigationBarSurface`](navigation_bar::NavigationBarSurface) - get/set
//!   colour, visibility, style, position and behaviour of the system bar
//! - [`VisibilityChangeStream`](navigation_bar::VisibilityChangeStream) - native
//!   visibility notifications
//! - [`LoggerSink`](logging::LoggerSink) - forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Android  | host-provided       | ✅ Supported |
//! | Desktop  | `bridge-desktop`    | ⚪ No navigation bar (inert) |
//! | iOS      | none                | ⚪ No navigation bar (inert) |
//! | Web      | none                | ⚪ No navigation bar (inert) |
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should convert native failures into `BridgeError::OperationFailed` with the
//! native message attached; the core propagates them untouched.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so one surface can be shared by the
//! facade, the observer tasks and the notification relay.

pub mod error;
pub mod logging;
pub mod navigation_bar;
pub mod platform;

pub use error::BridgeError;

// Re-export commonly used types
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink, ADVISORY_TARGET};
pub use navigation_bar::{
    BarStyle, Behavior, NavigationBarSurface, PlatformColor, Position, Visibility,
    VisibilityChangeStream, VisibilityEvent, VISIBILITY_EVENT_NAME,
};
pub use platform::RuntimeTarget;
