//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the navigation bar core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Notification relay for native events
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the facade and observer depend
//! on. It establishes the logging conventions, the configuration builder, and
//! the process-wide relay that carries native visibility notifications.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
