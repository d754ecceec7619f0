//! Navigation Bar Abstraction
//!
//! Contract for the system navigation bar drawn by the host OS (the strip
//! hosting back/home/recents controls). The core never talks to the OS
//! directly; each host ships an implementation of [`NavigationBarSurface`]
//! that forwards to its native APIs:
//!
//! - **Android**: `Window.setNavigationBarColor`, `WindowInsetsControllerCompat`
//! - **Desktop / iOS / Web**: no navigation bar; callers are gated before
//!   reaching the surface
//!
//! Values cross the boundary in the shapes the native layer expects: colours
//! go in as packed ARGB integers ([`PlatformColor`]) and come back as
//! `#RRGGBBAA` hex strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{BridgeError, Result};

/// Event identifier under which visibility changes are delivered.
pub const VISIBILITY_EVENT_NAME: &str = "ExpoNavigationBar.didChange";

/// Whether the navigation bar is currently drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Visible => "visible",
            Visibility::Hidden => "hidden",
        }
    }
}

impl FromStr for Visibility {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "visible" => Ok(Visibility::Visible),
            "hidden" => Ok(Visibility::Hidden),
            other => Err(invalid("visibility", other)),
        }
    }
}

/// Foreground style of the navigation bar buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarStyle {
    Light,
    Dark,
}

impl BarStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            BarStyle::Light => "light",
            BarStyle::Dark => "dark",
        }
    }
}

impl FromStr for BarStyle {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "light" => Ok(BarStyle::Light),
            "dark" => Ok(BarStyle::Dark),
            other => Err(invalid("bar style", other)),
        }
    }
}

/// Layout mode of the bar relative to app content.
///
/// `Absolute` is edge-to-edge: content extends behind the bar, which floats
/// above it. `Relative` reserves space for the bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Absolute,
    Relative,
}

impl Position {
    pub fn as_str(self) -> &'static str {
        match self {
            Position::Absolute => "absolute",
            Position::Relative => "relative",
        }
    }
}

impl FromStr for Position {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "absolute" => Ok(Position::Absolute),
            "relative" => Ok(Position::Relative),
            other => Err(invalid("position", other)),
        }
    }
}

/// How the bar reacts to user gestures while hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Behavior {
    /// Swipe reveals the bar temporarily, overlaying content.
    OverlaySwipe,
    /// Swipe reveals the bar and insets content.
    InsetSwipe,
    /// Any touch reveals the bar and insets content.
    InsetTouch,
}

impl Behavior {
    pub fn as_str(self) -> &'static str {
        match self {
            Behavior::OverlaySwipe => "overlay-swipe",
            Behavior::InsetSwipe => "inset-swipe",
            Behavior::InsetTouch => "inset-touch",
        }
    }
}

impl FromStr for Behavior {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "overlay-swipe" => Ok(Behavior::OverlaySwipe),
            "inset-swipe" => Ok(Behavior::InsetSwipe),
            "inset-touch" => Ok(Behavior::InsetTouch),
            other => Err(invalid("behavior", other)),
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(Visibility, BarStyle, Position, Behavior);

fn invalid(kind: &'static str, value: &str) -> BridgeError {
    BridgeError::InvalidValue {
        kind,
        value: value.to_string(),
    }
}

/// Packed `0xAARRGGBB` colour, the representation native colour APIs accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlatformColor(pub u32);

impl PlatformColor {
    pub const TRANSPARENT: PlatformColor = PlatformColor(0x0000_0000);

    pub const fn from_argb(argb: u32) -> Self {
        Self(argb)
    }

    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub const fn argb(self) -> u32 {
        self.0
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Formats as `#RRGGBBAA`, the shape colour getters report.
    pub fn to_hex(self) -> String {
        format!(
            "#{:02X}{:02X}{:02X}{:02X}",
            self.red(),
            self.green(),
            self.blue(),
            self.alpha()
        )
    }
}

impl fmt::Display for PlatformColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Payload of a [`VISIBILITY_EVENT_NAME`] notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityEvent {
    pub visibility: Visibility,
    /// Raw system UI visibility flags as reported by the OS, when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_visibility: Option<i32>,
}

impl VisibilityEvent {
    pub fn new(visibility: Visibility) -> Self {
        Self {
            visibility,
            raw_visibility: None,
        }
    }

    pub fn with_raw_visibility(mut self, raw: i32) -> Self {
        self.raw_visibility = Some(raw);
        self
    }
}

/// Native navigation bar surface.
///
/// Each method maps onto one native call and returns its result unchanged.
/// Implementations must not cache or coordinate calls: two concurrent
/// setters for the same property race, and whichever completes last wins.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::navigation_bar::{NavigationBarSurface, Visibility};
///
/// async fn hide(surface: &dyn NavigationBarSurface) -> bridge_traits::error::Result<()> {
///     surface.set_visibility(Visibility::Hidden).await
/// }
/// ```
#[async_trait::async_trait]
pub trait NavigationBarSurface: Send + Sync {
    /// Current background colour as `#RRGGBBAA`.
    async fn get_background_color(&self) -> Result<String>;

    async fn set_background_color(&self, color: PlatformColor) -> Result<()>;

    /// Current top border colour as `#RRGGBBAA`.
    async fn get_border_color(&self) -> Result<String>;

    async fn set_border_color(&self, color: PlatformColor) -> Result<()>;

    async fn get_visibility(&self) -> Result<Visibility>;

    async fn set_visibility(&self, visibility: Visibility) -> Result<()>;

    async fn get_bar_style(&self) -> Result<BarStyle>;

    async fn set_bar_style(&self, style: BarStyle) -> Result<()>;

    async fn get_position(&self) -> Result<Position>;

    async fn set_position(&self, position: Position) -> Result<()>;

    async fn get_behavior(&self) -> Result<Behavior>;

    async fn set_behavior(&self, behavior: Behavior) -> Result<()>;

    /// Subscribe to native visibility changes.
    ///
    /// Implementations should emit an event every time the OS reports a
    /// change, including repeats of the same value.
    async fn subscribe_visibility(&self) -> Result<Box<dyn VisibilityChangeStream>>;
}

/// Stream of native visibility notifications
#[async_trait::async_trait]
pub trait VisibilityChangeStream: Send {
    /// Get the next visibility notification
    ///
    /// Returns `None` when the stream is closed.
    async fn next(&mut self) -> Option<VisibilityEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_color_channels() {
        let color = PlatformColor::from_rgba(0x12, 0x34, 0x56, 0x78);
        assert_eq!(color.argb(), 0x7812_3456);
        assert_eq!(color.red(), 0x12);
        assert_eq!(color.green(), 0x34);
        assert_eq!(color.blue(), 0x56);
        assert_eq!(color.alpha(), 0x78);
        assert_eq!(color.to_hex(), "#12345678");
    }

    #[test]
    fn test_transparent_hex() {
        assert_eq!(PlatformColor::TRANSPARENT.to_hex(), "#00000000");
    }

    #[test]
    fn test_enum_strings_match_serde() {
        assert_eq!(
            serde_json::to_string(&Behavior::OverlaySwipe).unwrap(),
            "\"overlay-swipe\""
        );
        assert_eq!(
            "inset-touch".parse::<Behavior>().unwrap(),
            Behavior::InsetTouch
        );
        assert_eq!(Position::Absolute.to_string(), "absolute");
        assert_eq!("dark".parse::<BarStyle>().unwrap(), BarStyle::Dark);
    }

    #[test]
    fn test_parse_rejects_unknown_value() {
        let err = "sideways".parse::<Visibility>().unwrap_err();
        assert!(matches!(
            err,
            BridgeError::InvalidValue {
                kind: "visibility",
                ..
            }
        ));
    }

    #[test]
    fn test_visibility_event_payload_shape() {
        let event: VisibilityEvent =
            serde_json::from_str(r#"{"visibility":"visible","rawVisibility":0}"#).unwrap();
        assert_eq!(event.visibility, Visibility::Visible);
        assert_eq!(event.raw_visibility, Some(0));

        let json = serde_json::to_string(&VisibilityEvent::new(Visibility::Hidden)).unwrap();
        assert_eq!(json, r#"{"visibility":"hidden"}"#);
    }
}
