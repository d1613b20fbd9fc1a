//! Broadcast coordinator
//!
//! Fans observer events out over a `tokio::sync::broadcast` channel. Every
//! publish happens while the coordinator holds the session lock, so all
//! observers see events in the order their mutations were serialized.
//!
//! Observers reconcile to full snapshots rather than diffs. An observer
//! that lags behind the channel buffer loses intermediate events but
//! recovers on the next `snapshot_update`.

use plenary_domain::{ObserverEvent, SessionSnapshot};
use tokio::sync::broadcast;
use tracing::{trace, warn};

pub struct BroadcastCoordinator {
    sender: broadcast::Sender<ObserverEvent>,
}

impl BroadcastCoordinator {
    pub fn new(capacity: usize) -> Self {
        let (sender, _rx) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Push the full snapshot to every observer
    pub fn notify(&self, snapshot: SessionSnapshot) {
        self.publish(ObserverEvent::SnapshotUpdate(snapshot));
    }

    pub fn publish(&self, event: ObserverEvent) {
        let name = event.name();
        // An error only means nobody is listening right now
        match self.sender.send(event) {
            Ok(receivers) => trace!("Published {} to {} observers", name, receivers),
            Err(_) => trace!("Published {} with no observers", name),
        }
    }

    /// Raw receiver; pair it with a snapshot taken under the same lock
    pub fn subscribe(&self) -> broadcast::Receiver<ObserverEvent> {
        self.sender.subscribe()
    }

    pub fn observer_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// A connected observer: the snapshot at connect time plus the live stream
pub struct ObserverSubscription {
    pub initial: SessionSnapshot,
    events: broadcast::Receiver<ObserverEvent>,
}

impl ObserverSubscription {
    pub fn new(initial: SessionSnapshot, events: broadcast::Receiver<ObserverEvent>) -> Self {
        Self { initial, events }
    }

    /// Wait for the next event, skipping over a lag gap
    ///
    /// Returns `None` once the session is gone.
    pub async fn next(&mut self) -> Option<ObserverEvent> {
        loop {
            match self.events.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!("Observer lagged, skipped {} events", missed);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Drain whatever is already queued without waiting
    pub fn drain(&mut self) -> Vec<ObserverEvent> {
        let mut events = Vec::new();
        loop {
            match self.events.try_recv() {
                Ok(event) => events.push(event),
                Err(broadcast::error::TryRecvError::Lagged(missed)) => {
                    warn!("Observer lagged, skipped {} events", missed);
                }
                Err(_) => break,
            }
        }
        events
    }
}
