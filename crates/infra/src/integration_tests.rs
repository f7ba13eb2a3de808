//! Integration tests over the in-memory backend.
//!
//! Tests: store operations → consumption workflow → resulting stock levels.
//!
//! Verifies:
//! - Guarded decrease enforces the strict insufficient-stock rule
//! - Consumption decrements every line, in order, without rollback on failure
//! - Recipe resolution tolerates dangling item references

use std::sync::Arc;

use chrono::Utc;

use larder_core::{DomainError, ItemId, RecipeId};
use larder_inventory::{Item, ItemPatch};
use larder_recipes::{Recipe, RecipeLine};

use crate::consumption::{ConsumeError, ConsumptionWorkflow};
use crate::error::StoreError;
use crate::resolve::{resolve_recipe, resolve_recipes};
use crate::store::{InMemoryItemStore, InMemoryRecipeStore, ItemStore, RecipeStore};

fn setup() -> (
    Arc<InMemoryItemStore>,
    Arc<InMemoryRecipeStore>,
    ConsumptionWorkflow,
) {
    let items = Arc::new(InMemoryItemStore::new());
    let recipes = Arc::new(InMemoryRecipeStore::new());
    let workflow = ConsumptionWorkflow::new(items.clone(), recipes.clone());
    (items, recipes, workflow)
}

async fn seed_item(store: &InMemoryItemStore, name: &str, quantity: i64) -> Item {
    let item = Item::new(ItemId::new(), name, quantity, Utc::now()).unwrap();
    store.insert(item).await.unwrap()
}

async fn seed_recipe(store: &InMemoryRecipeStore, name: &str, lines: Vec<RecipeLine>) -> Recipe {
    let recipe = Recipe::new(RecipeId::new(), name, lines, Utc::now()).unwrap();
    store.insert(recipe).await.unwrap()
}

fn line(item_id: ItemId, amount: i64) -> RecipeLine {
    RecipeLine { item_id, amount }
}

#[tokio::test]
async fn insert_then_get_round_trips() {
    let (items, _, _) = setup();
    let flour = seed_item(&items, "Flour", 10).await;

    let fetched = items.get(flour.id_typed()).await.unwrap().unwrap();
    assert_eq!(fetched, flour);
    assert!(items.get(ItemId::new()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_returns_items_in_creation_order() {
    let (items, _, _) = setup();
    let first = seed_item(&items, "Flour", 1).await;
    let second = seed_item(&items, "Sugar", 2).await;

    let listed = items.list().await.unwrap();
    let ids: Vec<ItemId> = listed.iter().map(|i| i.id_typed()).collect();
    assert_eq!(ids, vec![first.id_typed(), second.id_typed()]);
}

#[tokio::test]
async fn update_applies_partial_fields() {
    let (items, _, _) = setup();
    let flour = seed_item(&items, "Flour", 10).await;

    let updated = items
        .update(
            flour.id_typed(),
            ItemPatch {
                name: Some("Bread flour".to_string()),
                quantity: None,
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name(), "Bread flour");
    assert_eq!(updated.quantity(), 10);
}

#[tokio::test]
async fn update_missing_item_returns_none() {
    let (items, _, _) = setup();
    let result = items.update(ItemId::new(), ItemPatch::default()).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn update_rejects_invalid_patch() {
    let (items, _, _) = setup();
    let flour = seed_item(&items, "Flour", 10).await;

    let err = items
        .update(
            flour.id_typed(),
            ItemPatch {
                name: Some("  ".to_string()),
                quantity: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Domain(DomainError::Validation(_))
    ));
}

#[tokio::test]
async fn guarded_decrease_enforces_strict_rule() {
    let (items, _, _) = setup();
    let flour = seed_item(&items, "Flour", 5).await;

    // Consuming the full stock is refused, quantity untouched.
    let err = items.decrease(flour.id_typed(), 5).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Domain(DomainError::InsufficientQuantity {
            available: 5,
            requested: 5
        })
    ));
    assert_eq!(
        items.get(flour.id_typed()).await.unwrap().unwrap().quantity(),
        5
    );

    let after = items.decrease(flour.id_typed(), 3).await.unwrap();
    assert_eq!(after.quantity(), 2);
}

#[tokio::test]
async fn decrease_missing_item_is_not_found() {
    let (items, _, _) = setup();
    let err = items.decrease(ItemId::new(), 1).await.unwrap_err();
    assert!(matches!(err, StoreError::Domain(DomainError::NotFound)));
}

#[tokio::test]
async fn increase_is_unbounded() {
    let (items, _, _) = setup();
    let flour = seed_item(&items, "Flour", 1).await;
    let after = items
        .increase(flour.id_typed(), 1_000_000)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.quantity(), 1_000_001);
}

#[tokio::test]
async fn consume_decrements_every_line() {
    let (items, recipes, workflow) = setup();
    let flour = seed_item(&items, "Flour", 10).await;
    let sugar = seed_item(&items, "Sugar", 4).await;
    let cake = seed_recipe(
        &recipes,
        "Cake",
        vec![line(flour.id_typed(), 3), line(sugar.id_typed(), 1)],
    )
    .await;

    workflow.consume(cake.id_typed()).await.unwrap();

    assert_eq!(
        items.get(flour.id_typed()).await.unwrap().unwrap().quantity(),
        7
    );
    assert_eq!(
        items.get(sugar.id_typed()).await.unwrap().unwrap().quantity(),
        3
    );
}

#[tokio::test]
async fn consume_twice_deducts_twice() {
    let (items, recipes, workflow) = setup();
    let flour = seed_item(&items, "Flour", 10).await;
    let bread = seed_recipe(&recipes, "Bread", vec![line(flour.id_typed(), 4)]).await;

    workflow.consume(bread.id_typed()).await.unwrap();
    workflow.consume(bread.id_typed()).await.unwrap();

    assert_eq!(
        items.get(flour.id_typed()).await.unwrap().unwrap().quantity(),
        2
    );
}

#[tokio::test]
async fn consume_uses_the_unguarded_primitive() {
    // Item A quantity=10, item B quantity=2, recipe requires {A:5, B:5}.
    // The consumption decrement is unconditional, so B goes negative and the
    // consume succeeds as a whole.
    let (items, recipes, workflow) = setup();
    let a = seed_item(&items, "A", 10).await;
    let b = seed_item(&items, "B", 2).await;
    let recipe = seed_recipe(
        &recipes,
        "R",
        vec![line(a.id_typed(), 5), line(b.id_typed(), 5)],
    )
    .await;

    workflow.consume(recipe.id_typed()).await.unwrap();

    assert_eq!(items.get(a.id_typed()).await.unwrap().unwrap().quantity(), 5);
    assert_eq!(items.get(b.id_typed()).await.unwrap().unwrap().quantity(), -3);
}

#[tokio::test]
async fn consume_aborts_on_missing_item_without_rollback() {
    let (items, recipes, workflow) = setup();
    let flour = seed_item(&items, "Flour", 10).await;
    let dangling = ItemId::new();
    let recipe = seed_recipe(
        &recipes,
        "Ghost cake",
        vec![line(flour.id_typed(), 4), line(dangling, 1)],
    )
    .await;

    let err = workflow.consume(recipe.id_typed()).await.unwrap_err();
    assert!(matches!(err, ConsumeError::ItemNotFound(id) if id == dangling));

    // The line processed before the failure keeps its decrement.
    assert_eq!(
        items.get(flour.id_typed()).await.unwrap().unwrap().quantity(),
        6
    );
}

#[tokio::test]
async fn consume_missing_recipe_is_not_found() {
    let (_, _, workflow) = setup();
    let err = workflow.consume(RecipeId::new()).await.unwrap_err();
    assert!(matches!(err, ConsumeError::RecipeNotFound));
}

#[tokio::test]
async fn delete_recipe_removes_it() {
    let (_, recipes, _) = setup();
    let bread = seed_recipe(&recipes, "Bread", vec![]).await;

    assert!(recipes.delete(bread.id_typed()).await.unwrap());
    assert!(recipes.get(bread.id_typed()).await.unwrap().is_none());
    assert!(!recipes.delete(bread.id_typed()).await.unwrap());
}

#[tokio::test]
async fn replace_swaps_recipe_contents() {
    let (items, recipes, _) = setup();
    let flour = seed_item(&items, "Flour", 10).await;
    let bread = seed_recipe(&recipes, "Bread", vec![]).await;

    let replaced = recipes
        .replace(
            bread.id_typed(),
            "Sourdough".to_string(),
            vec![line(flour.id_typed(), 2)],
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(replaced.name(), "Sourdough");
    assert_eq!(replaced.lines().len(), 1);

    let missing = recipes
        .replace(RecipeId::new(), "X".to_string(), vec![])
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn resolution_tolerates_dangling_references() {
    let (items, recipes, _) = setup();
    let flour = seed_item(&items, "Flour", 10).await;
    let dangling = ItemId::new();
    let recipe = seed_recipe(
        &recipes,
        "Bread",
        vec![line(flour.id_typed(), 2), line(dangling, 1)],
    )
    .await;

    let resolved = resolve_recipe(items.as_ref(), &recipe).await.unwrap();
    assert_eq!(resolved.lines[0].item.as_ref().map(|i| i.name()), Some("Flour"));
    assert!(resolved.lines[1].item.is_none());

    // List resolution does not abort on the dangling entry either.
    let all = resolve_recipes(items.as_ref(), &recipes.list().await.unwrap())
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
}
