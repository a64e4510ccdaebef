//! Items module - the catalogue of things that can be put on the list.

mod items_model;
mod items_seed;
mod items_service;
mod items_traits;

pub use items_model::{Item, NewItem};
pub use items_seed::default_items;
pub use items_service::ItemService;
pub use items_traits::{ItemRepositoryTrait, ItemServiceTrait};
