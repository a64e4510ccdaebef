//! Grocery change notifier trait and implementations.

use std::sync::{Arc, Mutex};

use super::ChangeEvent;

/// Receives grocery list changes after a write has been committed.
///
/// # Design Rules
///
/// - `publish()` must be fast and non-blocking (no awaiting slow clients)
/// - Delivery is best-effort; failures are logged by the implementation and
///   never reach the caller
/// - Each write calls exactly one `notify_*` method, after its commit
pub trait GroceryChangeNotifier: Send + Sync {
    /// Push a single event to every connected subscriber.
    fn publish(&self, event: ChangeEvent);

    fn notify_created(&self, entry_id: i64) {
        self.publish(ChangeEvent::created(entry_id));
    }

    fn notify_updated(&self, entry_id: i64) {
        self.publish(ChangeEvent::updated(entry_id));
    }

    fn notify_deleted(&self, entry_id: i64) {
        self.publish(ChangeEvent::deleted(entry_id));
    }

    fn notify_cleared(&self) {
        self.publish(ChangeEvent::cleared());
    }
}

/// No-op implementation for contexts without connected clients.
#[derive(Clone, Default)]
pub struct NoOpChangeNotifier;

impl GroceryChangeNotifier for NoOpChangeNotifier {
    fn publish(&self, _event: ChangeEvent) {}
}

/// Recording notifier for tests - collects published events.
#[derive(Clone, Default)]
pub struct RecordingChangeNotifier {
    events: Arc<Mutex<Vec<ChangeEvent>>>,
}

impl RecordingChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    pub fn events(&self) -> Vec<ChangeEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Returns the number of collected events.
    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }
}

impl GroceryChangeNotifier for RecordingChangeNotifier {
    fn publish(&self, event: ChangeEvent) {
        self.events.lock().unwrap().push(event);
    }
}
