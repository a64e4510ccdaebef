use indkob_core::events::{ChangeEvent, GroceryChangeNotifier};
use tokio::sync::broadcast;

pub use indkob_core::events::GROCERY_CHANGED;

/// Fans grocery change events out to every connected hub client.
///
/// Each subscriber owns a bounded FIFO queue, so events reach a single
/// client in publish order. Publishing never waits for slow clients.
#[derive(Clone)]
pub struct GroceryChangeBroadcaster {
    sender: broadcast::Sender<ChangeEvent>,
}

impl GroceryChangeBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl GroceryChangeNotifier for GroceryChangeBroadcaster {
    fn publish(&self, event: ChangeEvent) {
        let kind = event.kind.as_str();
        let entry_id = event.entry_id;
        match self.sender.send(event) {
            Ok(delivered) => {
                tracing::debug!(
                    "Broadcast grocery change {} for entry {:?} to {} client(s)",
                    kind,
                    entry_id,
                    delivered
                );
            }
            Err(_) => {
                tracing::debug!(
                    "Grocery change {} for entry {:?} not delivered: no connected clients",
                    kind,
                    entry_id
                );
            }
        }
    }
}
