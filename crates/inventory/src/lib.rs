//! `larder-inventory` — stock item entity and quantity operations.

pub mod item;

pub use item::{Item, ItemPatch};
