//! Indkøb Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic for the grocery list and meal plan.
//! It is storage-agnostic and defines repository traits that are implemented
//! by the `storage-memory` crate, plus the change notification seam the
//! web runtime uses to push list changes to connected clients.

pub mod constants;
pub mod errors;
pub mod events;
pub mod grocery;
pub mod items;
pub mod meal_plan;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
