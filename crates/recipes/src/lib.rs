//! `larder-recipes` — recipe entity (bill of materials) and its resolved view.

pub mod recipe;

pub use recipe::{Recipe, RecipeLine, ResolvedLine, ResolvedRecipe};
