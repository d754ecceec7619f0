//! Desktop Navigation Bar
//!
//! Desktop windowing systems have no system navigation bar. This surface
//! exists so the config builder always has something to inject; the facade's
//! capability gate keeps calls from reaching it on desktop targets.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    navigation_bar::{
        BarStyle, Behavior, NavigationBarSurface, PlatformColor, Position, Visibility,
        VisibilityChangeStream, VisibilityEvent,
    },
};
use tracing::debug;

/// Navigation bar surface for desktop platforms.
///
/// Every operation fails with [`BridgeError::NotAvailable`] and the change
/// stream is closed from the start.
#[derive(Debug, Clone, Default)]
pub struct DesktopNavigationBar;

impl DesktopNavigationBar {
    pub fn new() -> Self {
        Self
    }

    fn unavailable<T>(operation: &str) -> Result<T> {
        debug!(operation, "Navigation bar call reached desktop surface");
        Err(BridgeError::NotAvailable(format!(
            "navigation bar {} is not available on desktop",
            operation
        )))
    }
}

#[async_trait]
impl NavigationBarSurface for DesktopNavigationBar {
    async fn get_background_color(&self) -> Result<String> {
        Self::unavailable("get_background_color")
    }

    async fn set_background_color(&self, _color: PlatformColor) -> Result<()> {
        Self::unavailable("set_background_color")
    }

    async fn get_border_color(&self) -> Result<String> {
        Self::unavailable("get_border_color")
    }

    async fn set_border_color(&self, _color: PlatformColor) -> Result<()> {
        Self::unavailable("set_border_color")
    }

    async fn get_visibility(&self) -> Result<Visibility> {
        Self::unavailable("get_visibility")
    }

    async fn set_visibility(&self, _visibility: Visibility) -> Result<()> {
        Self::unavailable("set_visibility")
    }

    async fn get_bar_style(&self) -> Result<BarStyle> {
        Self::unavailable("get_bar_style")
    }

    async fn set_bar_style(&self, _style: BarStyle) -> Result<()> {
        Self::unavailable("set_bar_style")
    }

    async fn get_position(&self) -> Result<Position> {
        Self::unavailable("get_position")
    }

    async fn set_position(&self, _position: Position) -> Result<()> {
        Self::unavailable("set_position")
    }

    async fn get_behavior(&self) -> Result<Behavior> {
        Self::unavailable("get_behavior")
    }

    async fn set_behavior(&self, _behavior: Behavior) -> Result<()> {
        Self::unavailable("set_behavior")
    }

    async fn subscribe_visibility(&self) -> Result<Box<dyn VisibilityChangeStream>> {
        Ok(Box::new(ClosedVisibilityStream))
    }
}

/// The desktop never reports visibility changes.
struct ClosedVisibilityStream;

#[async_trait]
impl VisibilityChangeStream for ClosedVisibilityStream {
    async fn next(&mut self) -> Option<VisibilityEvent> {
        None
    }
}
