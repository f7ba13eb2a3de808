use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use larder_core::{DomainError, DomainResult, Entity, ItemId};

/// A stock-keeping unit: a named quantity of something on hand.
///
/// `quantity` is non-negative at creation and protected by the guarded
/// [`Item::decrease`]. The unguarded [`Item::adjust`] used by recipe
/// consumption applies a raw delta and can drive it negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    name: String,
    quantity: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Partial update applied by `PUT /items/:itemId`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub quantity: Option<i64>,
}

impl Item {
    /// Create a new item.
    ///
    /// The name is trimmed of surrounding whitespace and must be non-empty;
    /// the initial quantity must be non-negative.
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = valid_name(name.into())?;
        if quantity < 0 {
            return Err(DomainError::validation("quantity cannot be negative"));
        }
        Ok(Self {
            id,
            name,
            quantity,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild an item from stored fields without re-validating.
    ///
    /// For store implementations loading persisted rows; not a way to bypass
    /// validation on user input.
    pub fn from_parts(
        id: ItemId,
        name: String,
        quantity: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            quantity,
            created_at,
            updated_at,
        }
    }

    pub fn id_typed(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Apply a partial update. Fields left `None` are untouched.
    pub fn apply_patch(&mut self, patch: ItemPatch, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(name) = patch.name {
            self.name = valid_name(name)?;
        }
        if let Some(quantity) = patch.quantity {
            if quantity < 0 {
                return Err(DomainError::validation("quantity cannot be negative"));
            }
            self.quantity = quantity;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Add stock. No upper bound.
    pub fn increase(&mut self, amount: i64, now: DateTime<Utc>) {
        self.quantity += amount;
        self.updated_at = now;
    }

    /// Remove stock, guarded.
    ///
    /// Rejects when `quantity <= amount` (strict: consuming the entire stock
    /// is refused), leaving the item unchanged.
    pub fn decrease(&mut self, amount: i64, now: DateTime<Utc>) -> DomainResult<()> {
        if self.quantity <= amount {
            return Err(DomainError::insufficient(self.quantity, amount));
        }
        self.quantity -= amount;
        self.updated_at = now;
        Ok(())
    }

    /// Apply a raw signed delta, unguarded.
    ///
    /// This is the consumption primitive; the quantity may go negative.
    pub fn adjust(&mut self, delta: i64, now: DateTime<Utc>) {
        self.quantity += delta;
        self.updated_at = now;
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn valid_name(name: String) -> DomainResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-15T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn flour(quantity: i64) -> Item {
        Item::new(ItemId::new(), "Flour", quantity, test_time()).unwrap()
    }

    #[test]
    fn create_trims_name() {
        let item = Item::new(ItemId::new(), "  Sugar  ", 3, test_time()).unwrap();
        assert_eq!(item.name(), "Sugar");
        assert_eq!(item.quantity(), 3);
    }

    #[test]
    fn create_rejects_empty_name() {
        let err = Item::new(ItemId::new(), "   ", 3, test_time()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn create_rejects_negative_quantity() {
        let err = Item::new(ItemId::new(), "Salt", -1, test_time()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn decrease_below_stock_succeeds() {
        let mut item = flour(10);
        item.decrease(4, test_time()).unwrap();
        assert_eq!(item.quantity(), 6);
    }

    #[test]
    fn decrease_equal_to_stock_is_rejected() {
        let mut item = flour(5);
        let err = item.decrease(5, test_time()).unwrap_err();
        assert_eq!(
            err,
            DomainError::InsufficientQuantity {
                available: 5,
                requested: 5
            }
        );
        assert_eq!(item.quantity(), 5);
    }

    #[test]
    fn decrease_above_stock_leaves_quantity_unchanged() {
        let mut item = flour(2);
        assert!(item.decrease(7, test_time()).is_err());
        assert_eq!(item.quantity(), 2);
    }

    #[test]
    fn adjust_may_go_negative() {
        let mut item = flour(2);
        item.adjust(-5, test_time());
        assert_eq!(item.quantity(), -3);
    }

    #[test]
    fn patch_updates_only_given_fields() {
        let mut item = flour(2);
        item.apply_patch(
            ItemPatch {
                name: None,
                quantity: Some(9),
            },
            test_time(),
        )
        .unwrap();
        assert_eq!(item.name(), "Flour");
        assert_eq!(item.quantity(), 9);
    }

    #[test]
    fn patch_rejects_empty_name() {
        let mut item = flour(2);
        let err = item
            .apply_patch(
                ItemPatch {
                    name: Some(" ".to_string()),
                    quantity: None,
                },
                test_time(),
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: increase always adds exactly `amount`.
            #[test]
            fn increase_adds_amount(start in 0i64..1_000_000, amount in 0i64..1_000_000) {
                let mut item = flour(start);
                item.increase(amount, test_time());
                prop_assert_eq!(item.quantity(), start + amount);
            }

            /// Property: a decrease below current stock subtracts exactly `amount`.
            #[test]
            fn decrease_subtracts_amount(start in 1i64..1_000_000, amount in 0i64..1_000_000) {
                prop_assume!(amount < start);
                let mut item = flour(start);
                item.decrease(amount, test_time()).unwrap();
                prop_assert_eq!(item.quantity(), start - amount);
            }

            /// Property: a decrease of the full stock or more fails and changes nothing.
            #[test]
            fn oversized_decrease_is_rejected(start in 0i64..1_000_000, extra in 0i64..1_000_000) {
                let mut item = flour(start);
                let requested = start + extra;
                let err = item.decrease(requested, test_time()).unwrap_err();
                prop_assert_eq!(err, DomainError::insufficient(start, requested));
                prop_assert_eq!(item.quantity(), start);
            }

            /// Property: adjust is a plain signed add, even past zero.
            #[test]
            fn adjust_applies_raw_delta(start in 0i64..1_000_000, delta in -1_000_000i64..1_000_000) {
                let mut item = flour(start);
                item.adjust(delta, test_time());
                prop_assert_eq!(item.quantity(), start + delta);
            }
        }
    }
}
