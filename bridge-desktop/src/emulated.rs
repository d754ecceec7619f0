//! Emulated Navigation Bar
//!
//! In-memory stand-in for an Android navigation bar. Used when running the
//! core on a desktop with the target overridden to Android (previews,
//! integration tests). State lives behind an async mutex and every
//! visibility write is echoed on the change stream, mirroring how the OS
//! reports system UI visibility.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    navigation_bar::{
        BarStyle, Behavior, NavigationBarSurface, PlatformColor, Position, Visibility,
        VisibilityChangeStream, VisibilityEvent,
    },
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, warn};

const CHANGE_BUFFER_SIZE: usize = 16;

/// Snapshot of the emulated bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmulatedState {
    pub background_color: PlatformColor,
    pub border_color: PlatformColor,
    pub visibility: Visibility,
    pub bar_style: BarStyle,
    pub position: Position,
    pub behavior: Behavior,
}

impl Default for EmulatedState {
    fn default() -> Self {
        Self {
            background_color: PlatformColor::from_rgba(0, 0, 0, 0xFF),
            border_color: PlatformColor::TRANSPARENT,
            visibility: Visibility::Visible,
            bar_style: BarStyle::Light,
            position: Position::Relative,
            behavior: Behavior::InsetSwipe,
        }
    }
}

struct Inner {
    state: EmulatedState,
    pending_failure: Option<String>,
}

/// In-memory navigation bar surface.
///
/// Cloning yields another handle onto the same emulated bar.
#[derive(Clone)]
pub struct EmulatedNavigationBar {
    inner: Arc<Mutex<Inner>>,
    changes: broadcast::Sender<VisibilityEvent>,
    calls: Arc<AtomicUsize>,
}

impl EmulatedNavigationBar {
    pub fn new() -> Self {
        Self::with_state(EmulatedState::default())
    }

    pub fn with_state(state: EmulatedState) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_BUFFER_SIZE);
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state,
                pending_failure: None,
            })),
            changes,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Current emulated state, read without counting as a platform call.
    pub async fn state(&self) -> EmulatedState {
        self.inner.lock().await.state.clone()
    }

    /// Number of surface operations served so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make the next surface operation fail with `message`.
    pub async fn fail_next_call(&self, message: impl Into<String>) {
        self.inner.lock().await.pending_failure = Some(message.into());
    }

    /// Simulate the user revealing or hiding the bar with a gesture.
    ///
    /// Updates state and notifies subscribers without counting as a call.
    pub async fn simulate_user_visibility(&self, visibility: Visibility) {
        self.inner.lock().await.state.visibility = visibility;
        self.publish(visibility);
    }

    fn publish(&self, visibility: Visibility) {
        // No receivers simply means nobody is listening yet.
        let _ = self.changes.send(VisibilityEvent::new(visibility));
    }

    async fn read<T>(&self, operation: &str, f: impl FnOnce(&EmulatedState) -> T) -> Result<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut inner = self.inner.lock().await;
        if let Some(message) = inner.pending_failure.take() {
            warn!(operation, %message, "Emulated navigation bar failure");
            return Err(BridgeError::OperationFailed(message));
        }
        debug!(operation, "Emulated navigation bar read");
        Ok(f(&inner.state))
    }

    async fn write(&self, operation: &str, f: impl FnOnce(&mut EmulatedState)) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut inner = self.inner.lock().await;
        if let Some(message) = inner.pending_failure.take() {
            warn!(operation, %message, "Emulated navigation bar failure");
            return Err(BridgeError::OperationFailed(message));
        }
        f(&mut inner.state);
        debug!(operation, "Emulated navigation bar write");
        Ok(())
    }
}

impl Default for EmulatedNavigationBar {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NavigationBarSurface for EmulatedNavigationBar {
    async fn get_background_color(&self) -> Result<String> {
        self.read("get_background_color", |s| s.background_color.to_hex())
            .await
    }

    async fn set_background_color(&self, color: PlatformColor) -> Result<()> {
        self.write("set_background_color", |s| s.background_color = color)
            .await
    }

    async fn get_border_color(&self) -> Result<String> {
        self.read("get_border_color", |s| s.border_color.to_hex())
            .await
    }

    async fn set_border_color(&self, color: PlatformColor) -> Result<()> {
        self.write("set_border_color", |s| s.border_color = color)
            .await
    }

    async fn get_visibility(&self) -> Result<Visibility> {
        self.read("get_visibility", |s| s.visibility).await
    }

    async fn set_visibility(&self, visibility: Visibility) -> Result<()> {
        self.write("set_visibility", |s| s.visibility = visibility)
            .await?;
        self.publish(visibility);
        Ok(())
    }

    async fn get_bar_style(&self) -> Result<BarStyle> {
        self.read("get_bar_style", |s| s.bar_style).await
    }

    async fn set_bar_style(&self, style: BarStyle) -> Result<()> {
        self.write("set_bar_style", |s| s.bar_style = style).await
    }

    async fn get_position(&self) -> Result<Position> {
        self.read("get_position", |s| s.position).await
    }

    async fn set_position(&self, position: Position) -> Result<()> {
        self.write("set_position", |s| s.position = position).await
    }

    async fn get_behavior(&self) -> Result<Behavior> {
        self.read("get_behavior", |s| s.behavior).await
    }

    async fn set_behavior(&self, behavior: Behavior) -> Result<()> {
        self.write("set_behavior", |s| s.behavior = behavior).await
    }

    async fn subscribe_visibility(&self) -> Result<Box<dyn VisibilityChangeStream>> {
        Ok(Box::new(EmulatedVisibilityStream {
            receiver: self.changes.subscribe(),
        }))
    }
}

struct EmulatedVisibilityStream {
    receiver: broadcast::Receiver<VisibilityEvent>,
}

#[async_trait]
impl VisibilityChangeStream for EmulatedVisibilityStream {
    async fn next(&mut self) -> Option<VisibilityEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Emulated visibility stream lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_state_reads() {
        let bar = EmulatedNavigationBar::new();

        assert_eq!(bar.get_visibility().await.unwrap(), Visibility::Visible);
        assert_eq!(bar.get_background_color().await.unwrap(), "#000000FF");
        assert_eq!(bar.get_border_color().await.unwrap(), "#00000000");
        assert_eq!(bar.call_count(), 3);
    }

    #[tokio::test]
    async fn test_writes_are_visible_to_reads() {
        let bar = EmulatedNavigationBar::new();

        bar.set_bar_style(BarStyle::Dark).await.unwrap();
        bar.set_position(Position::Absolute).await.unwrap();
        bar.set_behavior(Behavior::OverlaySwipe).await.unwrap();
        bar.set_background_color(PlatformColor::from_argb(0xFF33_6699))
            .await
            .unwrap();

        assert_eq!(bar.get_bar_style().await.unwrap(), BarStyle::Dark);
        assert_eq!(bar.get_position().await.unwrap(), Position::Absolute);
        assert_eq!(bar.get_behavior().await.unwrap(), Behavior::OverlaySwipe);
        assert_eq!(bar.get_background_color().await.unwrap(), "#336699FF");
    }

    #[tokio::test]
    async fn test_set_visibility_emits_every_time() {
        let bar = EmulatedNavigationBar::new();
        let mut stream = bar.subscribe_visibility().await.unwrap();

        bar.set_visibility(Visibility::Hidden).await.unwrap();
        bar.set_visibility(Visibility::Hidden).await.unwrap();

        assert_eq!(
            stream.next().await.map(|e| e.visibility),
            Some(Visibility::Hidden)
        );
        assert_eq!(
            stream.next().await.map(|e| e.visibility),
            Some(Visibility::Hidden)
        );
    }

    #[tokio::test]
    async fn test_user_gesture_is_not_a_call() {
        let bar = EmulatedNavigationBar::new();
        let mut stream = bar.subscribe_visibility().await.unwrap();

        bar.simulate_user_visibility(Visibility::Hidden).await;

        assert_eq!(bar.call_count(), 0);
        assert_eq!(bar.state().await.visibility, Visibility::Hidden);
        assert_eq!(
            stream.next().await.map(|e| e.visibility),
            Some(Visibility::Hidden)
        );
    }

    #[tokio::test]
    async fn test_injected_failure_applies_once() {
        let bar = EmulatedNavigationBar::new();
        bar.fail_next_call("window not attached").await;

        let err = bar.set_bar_style(BarStyle::Dark).await.unwrap_err();
        assert!(matches!(err, BridgeError::OperationFailed(ref m) if m == "window not attached"));
        assert_eq!(bar.state().await.bar_style, BarStyle::Light);

        bar.set_bar_style(BarStyle::Dark).await.unwrap();
        assert_eq!(bar.state().await.bar_style, BarStyle::Dark);
    }

    #[tokio::test]
    async fn test_failed_visibility_write_does_not_emit() {
        let bar = EmulatedNavigationBar::new();
        let mut stream = bar.subscribe_visibility().await.unwrap();
        bar.fail_next_call("boom").await;

        assert!(bar.set_visibility(Visibility::Hidden).await.is_err());
        bar.simulate_user_visibility(Visibility::Visible).await;

        assert_eq!(
            stream.next().await.map(|e| e.visibility),
            Some(Visibility::Visible)
        );
    }
}
