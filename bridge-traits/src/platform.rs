//! Runtime target identification.
//!
//! The navigation bar only exists on Android. Every other target is treated
//! as unsupported and receives the inert defaults documented on
//! [`NavigationBarSurface`](crate::navigation_bar::NavigationBarSurface).
//! The target is resolved at compile time by [`RuntimeTarget::current`] but
//! can be overridden through configuration so hosts and tests can emulate a
//! device.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating system family the core is running on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeTarget {
    Android,
    Ios,
    Web,
    Desktop,
}

impl RuntimeTarget {
    /// Target this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "android") {
            Self::Android
        } else if cfg!(target_os = "ios") {
            Self::Ios
        } else if cfg!(target_arch = "wasm32") {
            Self::Web
        } else {
            Self::Desktop
        }
    }

    /// Whether this target draws a system navigation bar that can be controlled.
    pub fn has_navigation_bar(self) -> bool {
        matches!(self, Self::Android)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Android => "android",
            Self::Ios => "ios",
            Self::Web => "web",
            Self::Desktop => "desktop",
        }
    }
}

impl fmt::Display for RuntimeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
