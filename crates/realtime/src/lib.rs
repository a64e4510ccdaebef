//! Indkøb Realtime - client side of the grocery list sync.
//!
//! [`RealtimeClient`] keeps a push channel to the grocery hub open and turns
//! every (re)connect into a `resync` signal. [`GroceryListSync`] turns the
//! resulting change feed into coalesced full reloads of the local list, with
//! periodic polling as the fallback transport.

pub mod api;
pub mod auth;
pub mod backoff;
pub mod client;
pub mod config;
pub mod error;
pub mod reload;
pub mod sse;
pub mod transport;


pub use api::GroceryApiClient;
pub use auth::{AuthState, AuthUser};
pub use backoff::RetrySchedule;
pub use client::{ConnectionState, RealtimeClient};
pub use config::{RealtimeConfig, SyncConfig};
pub use error::{RealtimeError, Result};
pub use reload::{EntriesSource, GroceryListSync, SyncHandle, SyncNotice};
pub use transport::{Channel, ChannelConnector, SseConnector};
