//! # Cart Operations
//!
//! ## Distinct-Dish Cap
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cart for table 4 (cap = 5)                                             │
//! │                                                                         │
//! │  salmon ×2 │ tuna ×1 │ ebi ×1 │ tamago ×3 │ unagi ×1                    │
//! │                                                                         │
//! │  add_item("salmon")  → salmon ×3            (increment, never capped)   │
//! │  add_item("ikura")   → CapacityExceeded     (6th distinct dish)         │
//! │  remove_item(tuna)   → 4 distinct dishes, "ikura" fits again            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The increment-or-insert decision and the cap check run as one SQL
//! statement, so two guests tapping the same dish at once end up with one
//! line of quantity 2.

use tracing::{debug, warn};

use sushi_core::validation::{
    validate_item_id, validate_item_name, validate_price_cents, validate_quantity,
    validate_table_id,
};
use sushi_core::{CartLine, CoreError};

use super::OrderEngine;
use crate::error::EngineResult;

impl OrderEngine {
    /// Adds one portion of a dish to a seating's cart.
    ///
    /// ## Behavior
    /// - Dish already in cart: quantity + 1, cap not checked
    /// - New dish: inserted with quantity 1 if the cart has fewer than
    ///   `item_cap` distinct dishes
    ///
    /// ## Errors
    /// `CapacityExceeded` when the dish is new and the cart is full.
    pub async fn add_item(
        &self,
        table_id: &str,
        item_id: &str,
        name: &str,
        price_cents: i64,
    ) -> EngineResult<CartLine> {
        let table_id = validate_table_id(table_id)?;
        validate_item_id(item_id)?;
        validate_item_name(name)?;
        validate_price_cents(price_cents)?;

        let item_id = item_id.trim();
        let name = name.trim();

        let line = self
            .db
            .carts()
            .add_item(&table_id, item_id, name, price_cents, self.item_cap)
            .await?
            .ok_or_else(|| CoreError::CapacityExceeded {
                table_id: table_id.to_string(),
                cap: self.item_cap,
            })?;

        debug!(
            table_id = %table_id,
            item_id = %line.item_id,
            quantity = line.quantity,
            "Cart line saved"
        );
        Ok(line)
    }

    /// Sets a line's quantity. Zero or less removes the line.
    ///
    /// Succeeds whether or not the line exists.
    ///
    /// ## Errors
    /// `ValidationError` when the quantity is above `MAX_QUANTITY`.
    pub async fn update_quantity(
        &self,
        table_id: &str,
        line_id: i64,
        quantity: i64,
    ) -> EngineResult<()> {
        let table_id = validate_table_id(table_id)?;
        if quantity > 0 {
            validate_quantity(quantity)?;
        }
        let affected = self
            .db
            .carts()
            .update_quantity(&table_id, line_id, quantity)
            .await?;

        if affected == 0 {
            debug!(table_id = %table_id, line_id, "Cart line not present, nothing updated");
        }
        Ok(())
    }

    /// Removes a line. Succeeds whether or not the line exists.
    pub async fn remove_item(&self, table_id: &str, line_id: i64) -> EngineResult<()> {
        let table_id = validate_table_id(table_id)?;
        self.db.carts().remove(&table_id, line_id).await?;
        Ok(())
    }

    /// The seating's cart in the order lines were added.
    ///
    /// Never fails: an unknown table, a bad table id or a store error all
    /// read as an empty cart.
    pub async fn list_cart(&self, table_id: &str) -> Vec<CartLine> {
        let table_id = match validate_table_id(table_id) {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "Cart requested for invalid table id");
                return Vec::new();
            }
        };

        let carts = self.db.carts();
        let result = match self.db.seatings().ensure(&table_id).await {
            Ok(_) => carts.list(&table_id).await,
            Err(e) => Err(e),
        };

        result.unwrap_or_else(|e| {
            warn!(table_id = %table_id, error = %e, "Failed to read cart, showing it empty");
            Vec::new()
        })
    }
}
