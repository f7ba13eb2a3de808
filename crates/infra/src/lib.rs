//! Infrastructure layer: stores, persistence backends, and the consumption
//! workflow that orchestrates them.

pub mod consumption;
pub mod error;
pub mod resolve;
pub mod store;

pub use consumption::{ConsumeError, ConsumptionWorkflow};
pub use error::StoreError;
pub use store::{
    InMemoryItemStore, InMemoryRecipeStore, ItemStore, PostgresItemStore, PostgresRecipeStore,
    RecipeStore,
};

#[cfg(test)]
mod integration_tests;
