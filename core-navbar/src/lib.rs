//! # Navigation Bar Core
//!
//! Application-facing control of the system navigation bar.
//!
//! ## Overview
//!
//! - [`NavigationBar`] - async get/set of background colour, border colour,
//!   visibility, bar style, position and behaviour
//! - [`VisibilityObserver`] - the latest visibility as reactive state
//! - [`CapabilityGate`] - decides whether calls reach the platform; when they
//!   don't, getters answer with the [`inert`] defaults
//! - [`ColorInput`] - colour normalisation from CSS notations or packed ARGB
//!
//! ## Example
//!
//! ```ignore
//! use bridge_desktop::EmulatedNavigationBar;
//! use bridge_traits::{RuntimeTarget, Visibility};
//! use core_navbar::NavigationBar;
//! use core_runtime::config::NavigationBarConfig;
//! use std::sync::Arc;
//!
//! let config = NavigationBarConfig::builder()
//!     .target(RuntimeTarget::Android)
//!     .surface(Arc::new(EmulatedNavigationBar::new()))
//!     .build()?;
//!
//! let bar = NavigationBar::from_config(&config)?;
//! let _pump = bar.attach_native().await?;
//! let observer = bar.observe_visibility();
//!
//! bar.set_visibility(Visibility::Hidden).await?;
//! ```

pub mod capability;
pub mod color;
pub mod error;
pub mod facade;
pub mod observer;

pub use capability::{inert, CapabilityGate, ADVISORY_TARGET};
pub use color::{parse_css_color, ColorError, ColorInput, Rgba};
pub use error::{NavBarError, Result};
pub use facade::{CapabilityValue, NavigationBar, VisibilityListener};
pub use observer::{ObservedVisibility, VisibilityObserver};

pub use bridge_traits::{BarStyle, Behavior, PlatformColor, Position, RuntimeTarget, Visibility};

#[cfg(feature = "desktop-shims")]
pub use bridge_desktop::{DesktopNavigationBar, EmulatedNavigationBar};
