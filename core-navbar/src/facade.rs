//! # Navigation Bar Facade
//!
//! Async query/command surface over the system navigation bar.
//!
//! Every operation consults the [`CapabilityGate`] first. When the gate is
//! closed the platform is never called: setters resolve to `Ok(())` and
//! getters resolve to the matching value from [`inert`]. When it is open the
//! call is forwarded to the injected [`NavigationBarSurface`] and platform
//! failures propagate as [`NavBarError::Platform`].
//!
//! Operations are independent of each other. Nothing is locked here, so
//! concurrent writes to one property resolve last-writer-wins on the platform.
//!
//! ## Usage
//!
//! ```ignore
//! use core_navbar::NavigationBar;
//! use core_runtime::config::NavigationBarConfig;
//!
//! let config = NavigationBarConfig::builder().build()?;
//! let bar = NavigationBar::from_config(&config)?;
//!
//! bar.set_background_color("rgba(0, 0, 0, 0.5)").await?;
//! bar.set_visibility(Visibility::Hidden).await?;
//! ```

use bridge_traits::{
    BarStyle, Behavior, NavigationBarSurface, Position, Visibility, VisibilityEvent,
    VISIBILITY_EVENT_NAME,
};
use core_runtime::config::{NavigationBarAppearance, NavigationBarConfig};
use core_runtime::events::{
    EventStream, NavigationBarEvent, NotificationRelay, RecvError, RelayPump,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::capability::{inert, CapabilityGate};
use crate::color::ColorInput;
use crate::error::Result;
use crate::observer::VisibilityObserver;

/// One navigation bar property together with its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "property", content = "value", rename_all = "camelCase")]
pub enum CapabilityValue {
    BackgroundColor(String),
    BorderColor(String),
    Visibility(Visibility),
    BarStyle(BarStyle),
    Position(Position),
    Behavior(Behavior),
}

/// Application-facing handle onto the system navigation bar.
///
/// Cheap to clone; clones share the surface, gate and relay.
#[derive(Clone)]
pub struct NavigationBar {
    surface: Arc<dyn NavigationBarSurface>,
    gate: CapabilityGate,
    relay: NotificationRelay,
}

impl NavigationBar {
    pub fn new(
        surface: Arc<dyn NavigationBarSurface>,
        gate: CapabilityGate,
        relay: NotificationRelay,
    ) -> Self {
        Self {
            surface,
            gate,
            relay,
        }
    }

    /// Builds the facade described by `config`.
    ///
    /// Colours in the configured appearance are parsed here so a bad
    /// app-config value is reported before anything reaches the platform.
    /// The appearance itself is applied by [`NavigationBar::apply_appearance`].
    pub fn from_config(config: &NavigationBarConfig) -> Result<Self> {
        if let Some(appearance) = &config.appearance {
            validate_appearance(appearance)?;
        }

        let gate =
            CapabilityGate::for_target(config.target).with_advisory_notices(config.advisory_notices);
        let relay = NotificationRelay::new(config.relay_capacity);

        debug!(
            target_platform = %config.target,
            available = gate.is_available(),
            "Navigation bar facade created"
        );

        Ok(Self::new(config.surface.clone(), gate, relay))
    }

    pub fn gate(&self) -> &CapabilityGate {
        &self.gate
    }

    /// Relay carrying visibility notifications for this bar.
    pub fn relay(&self) -> &NotificationRelay {
        &self.relay
    }

    /// Starts forwarding native visibility changes onto the relay.
    ///
    /// Returns `None` without touching the platform when the navigation bar
    /// is unavailable.
    pub async fn attach_native(&self) -> Result<Option<RelayPump>> {
        if !self.gate.is_available() {
            return Ok(None);
        }
        let pump = self.relay.attach(self.surface.as_ref()).await?;
        Ok(Some(pump))
    }

    // ------------------------------------------------------------------
    // Background colour
    // ------------------------------------------------------------------

    #[instrument(skip(self, color))]
    pub async fn set_background_color(&self, color: impl Into<ColorInput>) -> Result<()> {
        if !self.gate.check("setBackgroundColorAsync") {
            return Ok(());
        }
        let color = color.into().normalize()?;
        debug!(color = %color.to_hex(), "Setting background color");
        self.surface.set_background_color(color).await?;
        Ok(())
    }

    /// Current background colour as `#RRGGBBAA`.
    pub async fn get_background_color(&self) -> Result<String> {
        if !self.gate.check("getBackgroundColorAsync") {
            return Ok(inert::BACKGROUND_COLOR.to_string());
        }
        Ok(self.surface.get_background_color().await?)
    }

    // ------------------------------------------------------------------
    // Border colour
    // ------------------------------------------------------------------

    #[instrument(skip(self, color))]
    pub async fn set_border_color(&self, color: impl Into<ColorInput>) -> Result<()> {
        if !self.gate.check("setBorderColorAsync") {
            return Ok(());
        }
        let color = color.into().normalize()?;
        debug!(color = %color.to_hex(), "Setting border color");
        self.surface.set_border_color(color).await?;
        Ok(())
    }

    /// Current border colour as `#RRGGBBAA`.
    pub async fn get_border_color(&self) -> Result<String> {
        if !self.gate.check("getBorderColorAsync") {
            return Ok(inert::BORDER_COLOR.to_string());
        }
        Ok(self.surface.get_border_color().await?)
    }

    // ------------------------------------------------------------------
    // Enumerated properties
    // ------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn set_visibility(&self, visibility: Visibility) -> Result<()> {
        if !self.gate.check("setVisibilityAsync") {
            return Ok(());
        }
        self.surface.set_visibility(visibility).await?;
        Ok(())
    }

    pub async fn get_visibility(&self) -> Result<Visibility> {
        if !self.gate.check("getVisibilityAsync") {
            return Ok(inert::VISIBILITY);
        }
        Ok(self.surface.get_visibility().await?)
    }

    /// Reads visibility from the surface without consulting the gate.
    ///
    /// For callers that already passed the gate and must not receive the
    /// inert default if it closes in the meantime.
    pub(crate) async fn fetch_visibility(&self) -> Result<Visibility> {
        Ok(self.surface.get_visibility().await?)
    }

    #[instrument(skip(self))]
    pub async fn set_bar_style(&self, style: BarStyle) -> Result<()> {
        if !self.gate.check("setButtonStyleAsync") {
            return Ok(());
        }
        self.surface.set_bar_style(style).await?;
        Ok(())
    }

    pub async fn get_bar_style(&self) -> Result<BarStyle> {
        if !self.gate.check("getButtonStyleAsync") {
            return Ok(inert::BAR_STYLE);
        }
        Ok(self.surface.get_bar_style().await?)
    }

    #[instrument(skip(self))]
    pub async fn set_position(&self, position: Position) -> Result<()> {
        if !self.gate.check("setPositionAsync") {
            return Ok(());
        }
        self.surface.set_position(position).await?;
        Ok(())
    }

    pub async fn get_position(&self) -> Result<Position> {
        if !self.gate.check("unstable_getPositionAsync") {
            return Ok(inert::POSITION);
        }
        Ok(self.surface.get_position().await?)
    }

    #[instrument(skip(self))]
    pub async fn set_behavior(&self, behavior: Behavior) -> Result<()> {
        if !self.gate.check("setBehaviorAsync") {
            return Ok(());
        }
        self.surface.set_behavior(behavior).await?;
        Ok(())
    }

    pub async fn get_behavior(&self) -> Result<Behavior> {
        if !self.gate.check("getBehaviorAsync") {
            return Ok(inert::BEHAVIOR);
        }
        Ok(self.surface.get_behavior().await?)
    }

    // ------------------------------------------------------------------
    // Composite operations
    // ------------------------------------------------------------------

    /// Applies every property present in `appearance`.
    ///
    /// Order: position, background colour, border colour, bar style,
    /// behavior, visibility. Stops at the first failure.
    #[instrument(skip(self, appearance))]
    pub async fn apply_appearance(&self, appearance: &NavigationBarAppearance) -> Result<()> {
        if let Some(position) = appearance.position {
            self.set_position(position).await?;
        }
        if let Some(color) = &appearance.background_color {
            self.set_background_color(color).await?;
        }
        if let Some(color) = &appearance.border_color {
            self.set_border_color(color).await?;
        }
        if let Some(style) = appearance.bar_style {
            self.set_bar_style(style).await?;
        }
        if let Some(behavior) = appearance.behavior {
            self.set_behavior(behavior).await?;
        }
        if let Some(visibility) = appearance.visibility {
            self.set_visibility(visibility).await?;
        }
        Ok(())
    }

    /// Reads all six properties, one after another.
    pub async fn snapshot(&self) -> Result<Vec<CapabilityValue>> {
        Ok(vec![
            CapabilityValue::BackgroundColor(self.get_background_color().await?),
            CapabilityValue::BorderColor(self.get_border_color().await?),
            CapabilityValue::Visibility(self.get_visibility().await?),
            CapabilityValue::BarStyle(self.get_bar_style().await?),
            CapabilityValue::Position(self.get_position().await?),
            CapabilityValue::Behavior(self.get_behavior().await?),
        ])
    }

    /// Subscribes directly to visibility notifications.
    pub fn add_visibility_listener(&self) -> VisibilityListener {
        VisibilityListener {
            stream: self.relay.subscribe_to(VISIBILITY_EVENT_NAME),
        }
    }

    /// Activates an observer holding the latest known visibility.
    pub fn observe_visibility(&self) -> VisibilityObserver {
        VisibilityObserver::activate(self)
    }
}

impl fmt::Debug for NavigationBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationBar")
            .field("gate", &self.gate)
            .field("relay", &self.relay)
            .finish()
    }
}

fn validate_appearance(appearance: &NavigationBarAppearance) -> Result<()> {
    for color in [&appearance.background_color, &appearance.border_color]
        .into_iter()
        .flatten()
    {
        ColorInput::from(color).normalize()?;
    }
    Ok(())
}

/// Subscription returned by [`NavigationBar::add_visibility_listener`].
///
/// Dropping it, or calling [`VisibilityListener::remove`], unsubscribes.
#[derive(Debug)]
pub struct VisibilityListener {
    stream: EventStream,
}

impl VisibilityListener {
    /// Waits for the next visibility notification.
    ///
    /// Returns `None` once the relay is gone. Notifications dropped because
    /// this listener fell behind are skipped.
    pub async fn recv(&mut self) -> Option<VisibilityEvent> {
        loop {
            match self.stream.recv().await {
                Ok(NavigationBarEvent::VisibilityChanged(event)) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Visibility listener fell behind the relay");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    pub fn remove(self) {
        self.stream.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_desktop::EmulatedNavigationBar;
    use bridge_traits::RuntimeTarget;
    use tokio::time::{timeout, Duration};

    fn android_bar(surface: &EmulatedNavigationBar) -> NavigationBar {
        NavigationBar::new(
            Arc::new(surface.clone()),
            CapabilityGate::for_target(RuntimeTarget::Android),
            NotificationRelay::new(8),
        )
    }

    #[tokio::test]
    async fn test_listener_receives_relay_events() {
        let bar = android_bar(&EmulatedNavigationBar::new());
        let mut listener = bar.add_visibility_listener();

        bar.relay()
            .emit(NavigationBarEvent::visibility_changed(Visibility::Hidden))
            .unwrap();

        let event = timeout(Duration::from_secs(1), listener.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event.visibility, Visibility::Hidden);
    }

    #[tokio::test]
    async fn test_listener_remove_unsubscribes() {
        let bar = android_bar(&EmulatedNavigationBar::new());
        let listener = bar.add_visibility_listener();
        assert_eq!(bar.relay().subscriber_count(), 1);

        listener.remove();
        assert_eq!(bar.relay().subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_apply_appearance_order_and_values() {
        let surface = EmulatedNavigationBar::new();
        let bar = android_bar(&surface);

        let appearance = NavigationBarAppearance::default()
            .with_position(Position::Absolute)
            .with_background_color("#1e1e1e")
            .with_bar_style(BarStyle::Dark)
            .with_visibility(Visibility::Hidden);

        bar.apply_appearance(&appearance).await.unwrap();

        let state = surface.state().await;
        assert_eq!(state.position, Position::Absolute);
        assert_eq!(state.background_color.to_hex(), "#1E1E1EFF");
        assert_eq!(state.bar_style, BarStyle::Dark);
        assert_eq!(state.visibility, Visibility::Hidden);
        assert_eq!(surface.call_count(), 4);
    }

    #[tokio::test]
    async fn test_apply_appearance_stops_at_first_error() {
        let surface = EmulatedNavigationBar::new();
        let bar = android_bar(&surface);
        surface.fail_next_call("position rejected").await;

        let appearance = NavigationBarAppearance::default()
            .with_position(Position::Absolute)
            .with_bar_style(BarStyle::Dark);

        assert!(bar.apply_appearance(&appearance).await.is_err());
        assert_eq!(surface.call_count(), 1);
        assert_eq!(surface.state().await.bar_style, BarStyle::Light);
    }

    #[tokio::test]
    async fn test_snapshot_on_unsupported_target() {
        let bar = NavigationBar::new(
            Arc::new(EmulatedNavigationBar::new()),
            CapabilityGate::for_target(RuntimeTarget::Ios).with_advisory_notices(false),
            NotificationRelay::new(8),
        );

        let snapshot = bar.snapshot().await.unwrap();
        assert_eq!(
            snapshot,
            vec![
                CapabilityValue::BackgroundColor("#00000000".to_string()),
                CapabilityValue::BorderColor("#00000000".to_string()),
                CapabilityValue::Visibility(Visibility::Hidden),
                CapabilityValue::BarStyle(BarStyle::Light),
                CapabilityValue::Position(Position::Relative),
                CapabilityValue::Behavior(Behavior::InsetTouch),
            ]
        );
    }

    #[test]
    fn test_capability_value_serialization() {
        let json = serde_json::to_string(&CapabilityValue::Behavior(Behavior::OverlaySwipe)).unwrap();
        assert_eq!(json, r#"{"property":"behavior","value":"overlay-swipe"}"#);
    }

    #[tokio::test]
    async fn test_attach_native_skipped_when_unavailable() {
        let surface = EmulatedNavigationBar::new();
        let bar = NavigationBar::new(
            Arc::new(surface.clone()),
            CapabilityGate::for_target(RuntimeTarget::Web),
            NotificationRelay::new(8),
        );

        assert!(bar.attach_native().await.unwrap().is_none());
        assert_eq!(surface.call_count(), 0);
    }
}
