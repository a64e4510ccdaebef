//! In-process storage implementation for Indkøb.
//!
//! Implements the repository traits defined in `indkob-core` on top of a
//! single shared table set guarded by a read/write lock. Referential checks
//! between entries and items run under the same write lock as the mutation
//! they guard.
//!
//! ```text
//!        core (domain traits)
//!               │
//!               ▼
//!   storage-memory (this crate)
//!               │
//!               ▼
//!        MemoryDb (RwLock<Tables>)
//! ```

pub mod db;

// Repository implementations
pub mod grocery;
pub mod items;
pub mod meal_plan;

pub use db::MemoryDb;

// Re-export from indkob-core for convenience
pub use indkob_core::errors::{Error, Result};
