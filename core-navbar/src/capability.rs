//! Capability gate and inert defaults.
//!
//! Only Android exposes a system navigation bar. Everywhere else each facade
//! operation short-circuits at the gate: setters do nothing, getters answer
//! with the value from [`inert`], and an advisory notice is logged on the
//! `navbar::advisory` target so the caller can see why nothing happened.

use bridge_traits::{BarStyle, Behavior, Position, RuntimeTarget, Visibility};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

pub use bridge_traits::ADVISORY_TARGET;

/// Values reported by getters when the navigation bar is unavailable.
pub mod inert {
    use super::*;

    pub const BACKGROUND_COLOR: &str = "#00000000";
    pub const BORDER_COLOR: &str = "#00000000";
    pub const VISIBILITY: Visibility = Visibility::Hidden;
    pub const BAR_STYLE: BarStyle = BarStyle::Light;
    pub const POSITION: Position = Position::Relative;
    pub const BEHAVIOR: Behavior = Behavior::InsetTouch;
}

type Predicate = Arc<dyn Fn() -> bool + Send + Sync>;

/// Decides whether navigation bar operations reach the platform.
#[derive(Clone)]
pub struct CapabilityGate {
    target: RuntimeTarget,
    predicate: Predicate,
    advisory_notices: bool,
}

impl CapabilityGate {
    /// Gate open exactly when `target` has a navigation bar.
    pub fn for_target(target: RuntimeTarget) -> Self {
        Self::custom(target, move || target.has_navigation_bar())
    }

    /// Gate for the target this binary was compiled for.
    pub fn current() -> Self {
        Self::for_target(RuntimeTarget::current())
    }

    /// Gate driven by an arbitrary predicate, evaluated on every check.
    pub fn custom<F>(target: RuntimeTarget, predicate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self {
            target,
            predicate: Arc::new(predicate),
            advisory_notices: true,
        }
    }

    pub fn with_advisory_notices(mut self, enabled: bool) -> Self {
        self.advisory_notices = enabled;
        self
    }

    pub fn target(&self) -> RuntimeTarget {
        self.target
    }

    pub fn is_available(&self) -> bool {
        (self.predicate)()
    }

    /// Returns `true` if `operation` may call the platform.
    ///
    /// A closed gate logs the advisory notice (unless disabled) and returns
    /// `false`; the caller must then answer with its inert default.
    pub fn check(&self, operation: &'static str) -> bool {
        if self.is_available() {
            return true;
        }

        if self.advisory_notices {
            warn!(
                target: ADVISORY_TARGET,
                operation,
                runtime = %self.target,
                "`{}` is only available on Android; returning the inert default",
                operation
            );
        }
        false
    }
}

impl fmt::Debug for CapabilityGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityGate")
            .field("target", &self.target)
            .field("available", &self.is_available())
            .field("advisory_notices", &self.advisory_notices)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_gate_follows_target() {
        assert!(CapabilityGate::for_target(RuntimeTarget::Android).is_available());
        assert!(!CapabilityGate::for_target(RuntimeTarget::Ios).is_available());
        assert!(!CapabilityGate::for_target(RuntimeTarget::Web).is_available());
        assert!(!CapabilityGate::for_target(RuntimeTarget::Desktop).is_available());
        assert_eq!(CapabilityGate::current().target(), RuntimeTarget::current());
    }

    #[test]
    fn test_custom_predicate_is_reevaluated() {
        let flag = Arc::new(AtomicBool::new(false));
        let probe = flag.clone();
        let gate = CapabilityGate::custom(RuntimeTarget::Android, move || {
            probe.load(Ordering::SeqCst)
        });

        assert!(!gate.check("setVisibilityAsync"));
        flag.store(true, Ordering::SeqCst);
        assert!(gate.check("setVisibilityAsync"));
    }

    #[test]
    fn test_silenced_gate_still_blocks() {
        let gate = CapabilityGate::for_target(RuntimeTarget::Web).with_advisory_notices(false);
        assert!(!gate.check("getBarStyleAsync"));
        assert_eq!(gate.target(), RuntimeTarget::Web);
    }

    #[test]
    fn test_inert_colors_are_transparent_hex() {
        assert_eq!(inert::BACKGROUND_COLOR, "#00000000");
        assert_eq!(inert::BORDER_COLOR, inert::BACKGROUND_COLOR);
        assert_eq!(inert::VISIBILITY, Visibility::Hidden);
    }
}
