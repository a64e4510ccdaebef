//! Grocery list module - entries on the shared shopping list.

mod grocery_model;
mod grocery_service;
mod grocery_traits;


pub use grocery_model::{GroceryEntry, GroceryEntryUpdate, NewGroceryEntry};
pub use grocery_service::GroceryEntryService;
pub use grocery_traits::{GroceryEntryRepositoryTrait, GroceryEntryServiceTrait};
