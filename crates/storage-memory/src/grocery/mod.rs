//! In-process storage for grocery entries.

mod repository;

pub use repository::GroceryEntryRepository;
