//! Change events module.
//!
//! Provides the grocery change event type and the notifier trait that core
//! services call after a successful write. Runtime adapters implement the
//! notifier to push events to connected clients.

mod change_event;
mod notifier;

pub use change_event::*;
pub use notifier::*;
