//! In-process storage for the item catalogue.

mod repository;

pub use repository::ItemRepository;
