//! # Navigation Bar Configuration
//!
//! Provides configuration management for the navigation bar core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `NavigationBarConfig` holding the platform surface, the runtime target the
//! capability gate is derived from, the relay buffer size and an optional
//! initial appearance. It fails fast when a required bridge is missing.
//!
//! ## Required Dependencies
//!
//! - `NavigationBarSurface` - required when the target has a navigation bar
//!   (Android). On other targets the surface is never called; with the
//!   `desktop-shims` feature a `DesktopNavigationBar` is injected for them.
//!
//! ## Usage
//!
//! ### Desktop Defaults
//!
//! ```ignore
//! use core_runtime::config::NavigationBarConfig;
//!
//! let config = NavigationBarConfig::builder()
//!     .build()
//!     .expect("Failed to build config");
//! ```
//!
//! ### Emulating a Device
//!
//! ```ignore
//! use bridge_desktop::EmulatedNavigationBar;
//! use bridge_traits::RuntimeTarget;
//! use core_runtime::config::{NavigationBarAppearance, NavigationBarConfig};
//! use std::sync::Arc;
//!
//! let appearance = NavigationBarAppearance::from_json(
//!     r#"{ "backgroundColor": "#1e1e1e", "barStyle": "dark", "position": "absolute" }"#,
//! )?;
//!
//! let config = NavigationBarConfig::builder()
//!     .target(RuntimeTarget::Android)
//!     .surface(Arc::new(EmulatedNavigationBar::new()))
//!     .appearance(appearance)
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use crate::events::DEFAULT_RELAY_BUFFER_SIZE;
use bridge_traits::{BarStyle, Behavior, NavigationBarSurface, Position, RuntimeTarget, Visibility};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const MAX_RELAY_CAPACITY: usize = 10_000;

/// Configuration for the navigation bar core.
///
/// Use [`NavigationBarConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct NavigationBarConfig {
    /// Target the capability gate is derived from
    pub target: RuntimeTarget,

    /// Native navigation bar surface
    pub surface: Arc<dyn NavigationBarSurface>,

    /// Per-subscriber buffer of the notification relay
    pub relay_capacity: usize,

    /// Appearance applied once at startup
    pub appearance: Option<NavigationBarAppearance>,

    /// Emit advisory notices when operations are called on unsupported targets
    pub advisory_notices: bool,
}

impl std::fmt::Debug for NavigationBarConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationBarConfig")
            .field("target", &self.target)
            .field("surface", &"NavigationBarSurface { ... }")
            .field("relay_capacity", &self.relay_capacity)
            .field("appearance", &self.appearance)
            .field("advisory_notices", &self.advisory_notices)
            .finish()
    }
}

/// Initial navigation bar appearance.
///
/// Keys mirror the app config plugin (`backgroundColor`, `borderColor`,
/// `visibility`, `barStyle`, `position`, `behavior`). Every field is optional;
/// absent fields leave the platform default untouched. Colours are kept as
/// written and normalised when applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NavigationBarAppearance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bar_style: Option<BarStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior: Option<Behavior>,
}

impl NavigationBarAppearance {
    /// Parses an appearance block from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("Invalid navigation bar appearance: {}", e)))
    }

    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    pub fn with_border_color(mut self, color: impl Into<String>) -> Self {
        self.border_color = Some(color.into());
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn with_bar_style(mut self, style: BarStyle) -> Self {
        self.bar_style = Some(style);
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = Some(behavior);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl NavigationBarConfig {
    pub fn builder() -> NavigationBarConfigBuilder {
        NavigationBarConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Relay capacity is reasonable (> 0 and <= 10,000)
    pub fn validate(&self) -> Result<()> {
        if self.relay_capacity == 0 {
            return Err(Error::Config(
                "Relay capacity must be greater than 0".to_string(),
            ));
        }

        if self.relay_capacity > MAX_RELAY_CAPACITY {
            return Err(Error::Config(format!(
                "Relay capacity exceeds maximum of {}",
                MAX_RELAY_CAPACITY
            )));
        }

        Ok(())
    }
}

fn surface_missing_error(target: RuntimeTarget) -> Error {
    Error::CapabilityMissing {
        capability: "NavigationBarSurface".to_string(),
        message: format!(
            "A NavigationBarSurface implementation is required on {}. \
             Android: inject the host's native adapter. \
             Desktop previews: inject bridge_desktop::EmulatedNavigationBar.",
            target
        ),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_surface(target: RuntimeTarget) -> Result<Arc<dyn NavigationBarSurface>> {
    use bridge_desktop::DesktopNavigationBar;

    if target.has_navigation_bar() {
        return Err(surface_missing_error(target));
    }

    let surface: Arc<dyn NavigationBarSurface> = Arc::new(DesktopNavigationBar::new());
    Ok(surface)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_surface(target: RuntimeTarget) -> Result<Arc<dyn NavigationBarSurface>> {
    Err(surface_missing_error(target))
}

/// Builder for constructing [`NavigationBarConfig`] instances.
pub struct NavigationBarConfigBuilder {
    target: Option<RuntimeTarget>,
    surface: Option<Arc<dyn NavigationBarSurface>>,
    relay_capacity: Option<usize>,
    appearance: Option<NavigationBarAppearance>,
    advisory_notices: bool,
}

impl Default for NavigationBarConfigBuilder {
    fn default() -> Self {
        Self {
            target: None,
            surface: None,
            relay_capacity: None,
            appearance: None,
            advisory_notices: true,
        }
    }
}

impl NavigationBarConfigBuilder {
    /// Overrides the runtime target (defaults to [`RuntimeTarget::current`]).
    pub fn target(mut self, target: RuntimeTarget) -> Self {
        self.target = Some(target);
        self
    }

    pub fn surface(mut self, surface: Arc<dyn NavigationBarSurface>) -> Self {
        self.surface = Some(surface);
        self
    }

    pub fn relay_capacity(mut self, capacity: usize) -> Self {
        self.relay_capacity = Some(capacity);
        self
    }

    pub fn appearance(mut self, appearance: NavigationBarAppearance) -> Self {
        self.appearance = Some(appearance);
        self
    }

    /// Enables or disables advisory notices on unsupported targets.
    pub fn advisory_notices(mut self, enabled: bool) -> Self {
        self.advisory_notices = enabled;
        self
    }

    /// Builds the final configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapabilityMissing`] if no surface was injected and no
    /// default can be provided for the target, or [`Error::Config`] if
    /// validation fails.
    pub fn build(self) -> Result<NavigationBarConfig> {
        let target = self.target.unwrap_or_else(RuntimeTarget::current);

        let surface = match self.surface {
            Some(surface) => surface,
            None => provide_default_surface(target)?,
        };

        let config = NavigationBarConfig {
            target,
            surface,
            relay_capacity: self.relay_capacity.unwrap_or(DEFAULT_RELAY_BUFFER_SIZE),
            appearance: self.appearance.filter(|a| !a.is_empty()),
            advisory_notices: self.advisory_notices,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_desktop::EmulatedNavigationBar;

    fn emulated() -> Arc<dyn NavigationBarSurface> {
        Arc::new(EmulatedNavigationBar::new())
    }

    #[test]
    fn test_builder_with_surface_and_target() {
        let config = NavigationBarConfig::builder()
            .target(RuntimeTarget::Android)
            .surface(emulated())
            .build()
            .unwrap();

        assert_eq!(config.target, RuntimeTarget::Android);
        assert_eq!(config.relay_capacity, DEFAULT_RELAY_BUFFER_SIZE);
        assert!(config.appearance.is_none());
        assert!(config.advisory_notices);
    }

    #[test]
    fn test_android_requires_surface() {
        let result = NavigationBarConfig::builder()
            .target(RuntimeTarget::Android)
            .build();

        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("NavigationBarSurface"));
        assert!(err_msg.contains("android"));
    }

    #[cfg(feature = "desktop-shims")]
    #[test]
    fn test_desktop_default_surface() {
        let config = NavigationBarConfig::builder()
            .target(RuntimeTarget::Desktop)
            .build()
            .expect("desktop defaults should succeed");

        assert_eq!(config.target, RuntimeTarget::Desktop);
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn test_desktop_without_shims_requires_surface() {
        let result = NavigationBarConfig::builder()
            .target(RuntimeTarget::Desktop)
            .build();

        assert!(matches!(result, Err(Error::CapabilityMissing { .. })));
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let result = NavigationBarConfig::builder()
            .target(RuntimeTarget::Android)
            .surface(emulated())
            .relay_capacity(0)
            .build();

        assert!(result
            .unwrap_err()
            .to_string()
            .contains("must be greater than 0"));
    }

    #[test]
    fn test_validate_rejects_excessive_capacity() {
        let result = NavigationBarConfig::builder()
            .target(RuntimeTarget::Android)
            .surface(emulated())
            .relay_capacity(50_000)
            .build();

        assert!(result.unwrap_err().to_string().contains("exceeds maximum"));
    }

    #[test]
    fn test_empty_appearance_is_dropped() {
        let config = NavigationBarConfig::builder()
            .target(RuntimeTarget::Android)
            .surface(emulated())
            .appearance(NavigationBarAppearance::default())
            .build()
            .unwrap();

        assert!(config.appearance.is_none());
    }

    #[test]
    fn test_appearance_from_json() {
        let appearance = NavigationBarAppearance::from_json(
            r##"{
                "backgroundColor": "#1e1e1e",
                "borderColor": "rgba(255, 255, 255, 0.1)",
                "visibility": "hidden",
                "barStyle": "dark",
                "position": "absolute",
                "behavior": "overlay-swipe"
            }"##,
        )
        .unwrap();

        assert_eq!(appearance.background_color.as_deref(), Some("#1e1e1e"));
        assert_eq!(appearance.visibility, Some(Visibility::Hidden));
        assert_eq!(appearance.bar_style, Some(BarStyle::Dark));
        assert_eq!(appearance.position, Some(Position::Absolute));
        assert_eq!(appearance.behavior, Some(Behavior::OverlaySwipe));
    }

    #[test]
    fn test_appearance_rejects_unknown_keys_and_values() {
        let err = NavigationBarAppearance::from_json(r#"{ "colour": "red" }"#).unwrap_err();
        assert!(err.to_string().contains("Invalid navigation bar appearance"));

        assert!(NavigationBarAppearance::from_json(r#"{ "barStyle": "neon" }"#).is_err());
    }

    #[test]
    fn test_appearance_builder() {
        let appearance = NavigationBarAppearance::default()
            .with_background_color("white")
            .with_bar_style(BarStyle::Dark);

        assert!(!appearance.is_empty());
        assert_eq!(appearance.background_color.as_deref(), Some("white"));
        assert!(appearance.border_color.is_none());
    }

    #[test]
    fn test_config_is_cloneable() {
        let config = NavigationBarConfig::builder()
            .target(RuntimeTarget::Android)
            .surface(emulated())
            .advisory_notices(false)
            .build()
            .unwrap();

        let cloned = config.clone();
        assert_eq!(cloned.target, config.target);
        assert!(!cloned.advisory_notices);
        assert!(format!("{:?}", cloned).contains("NavigationBarSurface { ... }"));
    }
}
