//! # Notification Relay
//!
//! Process-wide relay that fans native navigation bar notifications out to
//! any number of in-process listeners, built on `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! The relay consists of:
//! - **Event Types**: [`NavigationBarEvent`], keyed by a fixed event name
//! - **NotificationRelay**: the shared broadcast channel
//! - **EventStream**: a subscription handle with optional filtering; dropping
//!   it (or calling [`EventStream::unsubscribe`]) releases the subscription
//! - **Relay pump**: [`NotificationRelay::attach`] forwards a surface's native
//!   change stream onto the relay
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────┐  native stream  ┌───────────────────┐  subscribe  ┌───────────┐
//! │ Navigation bar ├────────────────>│                   ├────────────>│ Observer  │
//! │    surface     │   (pump task)   │ NotificationRelay │             └───────────┘
//! └────────────────┘                 │    (broadcast)    │  subscribe  ┌───────────┐
//!                                    │                   ├────────────>│ Listener  │
//!                                    └───────────────────┘             └───────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use bridge_traits::{Visibility, VisibilityEvent, VISIBILITY_EVENT_NAME};
//! use core_runtime::events::{NavigationBarEvent, NotificationRelay};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let relay = NotificationRelay::new(16);
//! let mut stream = relay.subscribe_to(VISIBILITY_EVENT_NAME);
//!
//! relay
//!     .emit(NavigationBarEvent::VisibilityChanged(VisibilityEvent::new(
//!         Visibility::Hidden,
//!     )))
//!     .ok();
//!
//! let event = stream.recv().await.unwrap();
//! assert_eq!(event.name(), VISIBILITY_EVENT_NAME);
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: the subscriber fell `n` events behind. Non-fatal;
//!   subsequent `recv` calls continue with newer events.
//! - **`RecvError::Closed`**: every relay handle has been dropped.
//!
//! Delivery is best-effort: events emitted while nobody is subscribed are
//! discarded, and nothing is replayed to late subscribers.

use bridge_traits::{
    navigation_bar::{NavigationBarSurface, VisibilityEvent, VISIBILITY_EVENT_NAME},
    Visibility,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::error::Result;

// Re-export commonly used types
pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the relay channel.
///
/// Visibility changes are rare and user-driven; a small buffer is plenty.
pub const DEFAULT_RELAY_BUFFER_SIZE: usize = 64;

/// Notification delivered through the relay.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum NavigationBarEvent {
    /// The system reported a navigation bar visibility change.
    VisibilityChanged(VisibilityEvent),
}

impl NavigationBarEvent {
    pub fn visibility_changed(visibility: Visibility) -> Self {
        NavigationBarEvent::VisibilityChanged(VisibilityEvent::new(visibility))
    }

    /// Event identifier this notification is published under.
    pub fn name(&self) -> &'static str {
        match self {
            NavigationBarEvent::VisibilityChanged(_) => VISIBILITY_EVENT_NAME,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            NavigationBarEvent::VisibilityChanged(e) => match e.visibility {
                Visibility::Visible => "Navigation bar became visible",
                Visibility::Hidden => "Navigation bar became hidden",
            },
        }
    }
}

/// Shared relay for navigation bar notifications.
///
/// Cloning is cheap and yields another handle onto the same channel. The
/// composition root owns one instance and hands clones to every component
/// that publishes or listens.
#[derive(Clone)]
pub struct NotificationRelay {
    sender: broadcast::Sender<NavigationBarEvent>,
    shutdown: CancellationToken,
}

impl NotificationRelay {
    /// Creates a relay buffering at most `capacity` events per subscriber.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            shutdown: CancellationToken::new(),
        }
    }

    /// Publishes an event to all current subscribers.
    ///
    /// Returns the number of subscribers reached, or an error if there are none.
    pub fn emit(
        &self,
        event: NavigationBarEvent,
    ) -> std::result::Result<usize, SendError<NavigationBarEvent>> {
        self.sender.send(event)
    }

    /// Raw subscription receiving every event.
    pub fn subscribe(&self) -> Receiver<NavigationBarEvent> {
        self.sender.subscribe()
    }

    /// Subscription receiving only events published under `event_name`.
    pub fn subscribe_to(&self, event_name: impl Into<String>) -> EventStream {
        let event_name = event_name.into();
        EventStream::new(self.subscribe()).filter(move |event| event.name() == event_name)
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Forwards the surface's native visibility stream onto the relay.
    ///
    /// The returned pump runs until the native stream closes, the pump is
    /// stopped, or the relay is shut down.
    pub async fn attach(&self, surface: &dyn NavigationBarSurface) -> Result<RelayPump> {
        let mut native = surface.subscribe_visibility().await?;
        let sender = self.sender.clone();
        let token = self.shutdown.child_token();
        let stop = token.clone();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = stop.cancelled() => break,
                    next = native.next() => match next {
                        Some(event) => {
                            trace!(visibility = %event.visibility, "Relaying native visibility change");
                            if sender.send(NavigationBarEvent::VisibilityChanged(event)).is_err() {
                                trace!("No relay subscribers for visibility change");
                            }
                        }
                        None => {
                            debug!("Native visibility stream closed");
                            break;
                        }
                    },
                }
            }
        });

        Ok(RelayPump { token, handle })
    }

    /// Stops every pump attached to this relay.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl Default for NotificationRelay {
    fn default() -> Self {
        Self::new(DEFAULT_RELAY_BUFFER_SIZE)
    }
}

impl fmt::Debug for NotificationRelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationRelay")
            .field("subscriber_count", &self.subscriber_count())
            .field("shut_down", &self.shutdown.is_cancelled())
            .finish()
    }
}

/// Background task forwarding a native stream into the relay.
pub struct RelayPump {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl RelayPump {
    /// Stops forwarding and waits for the task to exit.
    pub async fn stop(self) {
        self.token.cancel();
        let _ = self.handle.await;
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl fmt::Debug for RelayPump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayPump")
            .field("finished", &self.is_finished())
            .finish()
    }
}

/// Type alias for event filter functions.
type EventFilter = Box<dyn Fn(&NavigationBarEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with additional filtering capabilities.
pub struct EventStream {
    receiver: Receiver<NavigationBarEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<NavigationBarEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` will be returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&NavigationBarEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Receives the next event that passes the filter (if any).
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n` events.
    /// Returns `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> std::result::Result<NavigationBarEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;

            let Some(filter) = &self.filter else {
                return Ok(event);
            };

            if filter(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without waiting.
    ///
    /// Returns `None` if no events are currently available.
    pub fn try_recv(&mut self) -> Option<std::result::Result<NavigationBarEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    let Some(filter) = &self.filter else {
                        return Some(Ok(event));
                    };
                    if filter(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }

    /// Releases the subscription.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_desktop::{DesktopNavigationBar, EmulatedNavigationBar};
    use bridge_traits::NavigationBarSurface;
    use tokio::time::{timeout, Duration};

    #[tokio::test]
    async fn test_relay_creation() {
        let relay = NotificationRelay::default();
        assert_eq!(relay.subscriber_count(), 0);
        assert!(format!("{:?}", relay).contains("shut_down: false"));
    }

    #[tokio::test]
    async fn test_zero_capacity_is_raised_to_one() {
        let relay = NotificationRelay::new(0);
        let mut stream = relay.subscribe_to(VISIBILITY_EVENT_NAME);
        relay
            .emit(NavigationBarEvent::visibility_changed(Visibility::Hidden))
            .unwrap();

        let received = timeout(Duration::from_secs(1), stream.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            received,
            NavigationBarEvent::visibility_changed(Visibility::Hidden)
        );
    }

    #[tokio::test]
    async fn test_subscribe_and_unsubscribe() {
        let relay = NotificationRelay::new(10);
        let first = relay.subscribe_to(VISIBILITY_EVENT_NAME);
        let _second = relay.subscribe_to(VISIBILITY_EVENT_NAME);
        assert_eq!(relay.subscriber_count(), 2);

        first.unsubscribe();
        assert_eq!(relay.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_emit_without_subscribers_fails() {
        let relay = NotificationRelay::new(10);
        assert!(relay
            .emit(NavigationBarEvent::visibility_changed(Visibility::Hidden))
            .is_err());
    }

    #[tokio::test]
    async fn test_every_subscriber_receives_event() {
        let relay = NotificationRelay::new(10);
        let mut a = relay.subscribe_to(VISIBILITY_EVENT_NAME);
        let mut b = relay.subscribe_to(VISIBILITY_EVENT_NAME);

        let event = NavigationBarEvent::visibility_changed(Visibility::Visible);
        assert_eq!(relay.emit(event).unwrap(), 2);

        assert_eq!(a.recv().await.unwrap(), event);
        assert_eq!(b.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_filter_by_other_name_skips_events() {
        let relay = NotificationRelay::new(10);
        let mut other = relay.subscribe_to("ExpoNavigationBar.somethingElse");

        relay
            .emit(NavigationBarEvent::visibility_changed(Visibility::Hidden))
            .ok();

        assert!(other.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_lagged_subscriber() {
        let relay = NotificationRelay::new(2);
        let mut sub = relay.subscribe();

        for _ in 0..5 {
            relay
                .emit(NavigationBarEvent::visibility_changed(Visibility::Hidden))
                .ok();
        }

        let result = sub.recv().await;
        assert!(matches!(result, Err(RecvError::Lagged(_))));
    }

    #[test]
    fn test_event_serialization() {
        let event = NavigationBarEvent::VisibilityChanged(
            VisibilityEvent::new(Visibility::Hidden).with_raw_visibility(2),
        );

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"rawVisibility\":2"));

        let deserialized: NavigationBarEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, event);
    }

    #[test]
    fn test_event_description() {
        let event = NavigationBarEvent::visibility_changed(Visibility::Visible);
        assert_eq!(event.description(), "Navigation bar became visible");
        assert_eq!(event.name(), "ExpoNavigationBar.didChange");
    }

    #[tokio::test]
    async fn test_attach_forwards_native_changes() {
        let relay = NotificationRelay::new(10);
        let bar = EmulatedNavigationBar::new();
        let mut stream = relay.subscribe_to(VISIBILITY_EVENT_NAME);

        let pump = relay.attach(&bar).await.unwrap();
        bar.set_visibility(Visibility::Hidden).await.unwrap();

        let received = timeout(Duration::from_secs(1), stream.recv())
            .await
            .expect("relay should forward the change")
            .unwrap();
        assert_eq!(
            received,
            NavigationBarEvent::visibility_changed(Visibility::Hidden)
        );

        pump.stop().await;
    }

    #[tokio::test]
    async fn test_pump_ends_when_native_stream_closes() {
        let relay = NotificationRelay::new(10);
        let pump = relay.attach(&DesktopNavigationBar::new()).await.unwrap();

        timeout(Duration::from_secs(1), async {
            while !pump.is_finished() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("pump should exit once the native stream closes");
    }

    #[tokio::test]
    async fn test_shutdown_stops_pumps() {
        let relay = NotificationRelay::new(10);
        let bar = EmulatedNavigationBar::new();
        let pump = relay.attach(&bar).await.unwrap();

        relay.shutdown();

        timeout(Duration::from_secs(1), async {
            while !pump.is_finished() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("shutdown should stop the pump");
    }
}
