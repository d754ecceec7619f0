//! # Visibility Observer
//!
//! Turns pushed visibility notifications into pull-based state.
//!
//! On activation the observer subscribes to the relay and, if the navigation
//! bar is available, fetches the current visibility once. The fetch and the
//! notifications race; whichever lands last is what [`VisibilityObserver::current`]
//! reports. Every notification is applied, even one repeating the held
//! value, and wakes every [`watch::Receiver`] handed out by
//! [`VisibilityObserver::subscribe`].
//!
//! Deactivation (explicit or by drop) marks the observer inert at once. A
//! fetch still in flight is left to finish, but its result is discarded.
//! [`VisibilityObserver::deactivate`] returns only after the relay
//! subscription is released; dropping the observer releases it
//! asynchronously, once the runtime reaps the aborted listener task.

use bridge_traits::{Visibility, VISIBILITY_EVENT_NAME};
use core_runtime::events::{NavigationBarEvent, RecvError};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::facade::NavigationBar;

/// Visibility as last observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObservedVisibility {
    /// Nothing has been observed yet.
    #[default]
    Uninitialized,
    Known(Visibility),
}

impl ObservedVisibility {
    pub fn visibility(self) -> Option<Visibility> {
        match self {
            ObservedVisibility::Uninitialized => None,
            ObservedVisibility::Known(visibility) => Some(visibility),
        }
    }

    pub fn is_known(self) -> bool {
        matches!(self, ObservedVisibility::Known(_))
    }
}

/// State cell shared by the observer and its background tasks.
///
/// The inert flag is only read or written while holding the watch channel's
/// lock, so a write can never slip in after [`StateCell::detach`] returns.
#[derive(Clone)]
struct StateCell {
    sender: Arc<watch::Sender<ObservedVisibility>>,
    inert: Arc<AtomicBool>,
}

impl StateCell {
    fn new() -> Self {
        let (sender, _) = watch::channel(ObservedVisibility::Uninitialized);
        Self {
            sender: Arc::new(sender),
            inert: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Overwrites the held value. Returns `false` if the cell was detached.
    fn write(&self, visibility: Visibility) -> bool {
        let inert = &self.inert;
        self.sender.send_if_modified(|current| {
            if inert.load(Ordering::SeqCst) {
                return false;
            }
            *current = ObservedVisibility::Known(visibility);
            true
        });
        !inert.load(Ordering::SeqCst)
    }

    fn detach(&self) {
        let inert = &self.inert;
        self.sender.send_if_modified(|_| {
            inert.store(true, Ordering::SeqCst);
            false
        });
    }

    fn is_detached(&self) -> bool {
        self.inert.load(Ordering::SeqCst)
    }
}

/// Reactive holder of the navigation bar visibility.
pub struct VisibilityObserver {
    id: Uuid,
    cell: StateCell,
    token: CancellationToken,
    listener: Option<JoinHandle<()>>,
    fetch: Option<JoinHandle<()>>,
}

impl VisibilityObserver {
    /// Subscribes to `bar`'s relay and starts the initial fetch.
    ///
    /// Must be called from within a tokio runtime. The relay subscription is
    /// registered before this returns, so no notification emitted afterwards
    /// is missed.
    pub fn activate(bar: &NavigationBar) -> Self {
        let id = Uuid::new_v4();
        let cell = StateCell::new();
        let token = CancellationToken::new();
        let mut stream = bar.relay().subscribe_to(VISIBILITY_EVENT_NAME);

        let listener = {
            let cell = cell.clone();
            let token = token.clone();
            tokio::spawn(async move {
                loop {
                    tokio::select! {
                        _ = token.cancelled() => break,
                        received = stream.recv() => match received {
                            Ok(NavigationBarEvent::VisibilityChanged(event)) => {
                                trace!(%id, visibility = %event.visibility, "Visibility notification");
                                if !cell.write(event.visibility) {
                                    break;
                                }
                            }
                            Err(RecvError::Lagged(skipped)) => {
                                warn!(%id, skipped, "Visibility observer fell behind the relay");
                            }
                            Err(RecvError::Closed) => break,
                        },
                    }
                }
                debug!(%id, "Visibility observer released its subscription");
            })
        };

        // Gate once here; the fetch goes straight to the surface so a gate
        // closing mid-flight cannot turn into an inert default being recorded.
        let fetch = if bar.gate().is_available() {
            let bar = bar.clone();
            let cell = cell.clone();
            Some(tokio::spawn(async move {
                match bar.fetch_visibility().await {
                    Ok(visibility) => {
                        if cell.write(visibility) {
                            trace!(%id, %visibility, "Initial visibility fetched");
                        } else {
                            debug!(%id, "Discarding visibility fetched after deactivation");
                        }
                    }
                    Err(e) => warn!(%id, error = %e, "Initial visibility fetch failed"),
                }
            }))
        } else {
            debug!(%id, "Navigation bar unavailable; skipping initial visibility fetch");
            None
        };

        debug!(%id, "Visibility observer activated");

        Self {
            id,
            cell,
            token,
            listener: Some(listener),
            fetch,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Most recently observed visibility.
    pub fn current(&self) -> ObservedVisibility {
        *self.cell.sender.borrow()
    }

    /// Change notifications. Drop the receiver to unsubscribe.
    pub fn subscribe(&self) -> watch::Receiver<ObservedVisibility> {
        self.cell.sender.subscribe()
    }

    pub fn is_active(&self) -> bool {
        !self.cell.is_detached()
    }

    /// Whether the initial fetch has resolved (or was never started).
    pub fn is_reconciled(&self) -> bool {
        self.fetch.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Marks the observer inert and waits until its relay subscription is
    /// released.
    pub async fn deactivate(mut self) {
        self.cell.detach();
        self.token.cancel();
        if let Some(listener) = self.listener.take() {
            let _ = listener.await;
        }
        debug!(id = %self.id, "Visibility observer deactivated");
    }
}

/// Marks the observer inert immediately. The relay subscription is released
/// asynchronously; use [`VisibilityObserver::deactivate`] to wait for it.
impl Drop for VisibilityObserver {
    fn drop(&mut self) {
        self.cell.detach();
        self.token.cancel();
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }
}

impl fmt::Debug for VisibilityObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisibilityObserver")
            .field("id", &self.id)
            .field("current", &self.current())
            .field("active", &self.is_active())
            .finish()
    }
}
