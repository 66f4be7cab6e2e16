//! # Cart Repository
//!
//! Database operations for a seating's unconfirmed cart.
//!
//! ## Add Item: One Statement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  INSERT ... SELECT ... WHERE <dish already in cart> OR <count < cap>    │
//! │  ON CONFLICT (table_id, item_id) DO UPDATE SET quantity = quantity + 1  │
//! │  RETURNING ...                                                          │
//! │                                                                         │
//! │   dish in cart?  ──yes──► WHERE true → conflict → quantity + 1 → row    │
//! │        │                                                                │
//! │        no ──► count < cap? ──yes──► insert quantity 1 → row             │
//! │                    │                                                    │
//! │                    no ──► WHERE false → nothing inserted → no row       │
//! │                                                 (cap reached)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cap check and the insert-or-increment decision happen inside a single
//! SQLite statement, so two tablets adding the same dish at the same moment
//! can never create two lines or slip past the cap.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::seating::ensure_on;
use sushi_core::validation::MAX_QUANTITY;
use sushi_core::{CartLine, TableId};

const CART_COLUMNS: &str =
    "id, table_id, item_id, name, price_cents, quantity, status, added_at";

/// Repository for cart lines.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Adds one unit of a dish to the cart.
    ///
    /// Registers the seating first. An existing line is always incremented
    /// (stopping at [`MAX_QUANTITY`]); a new line is only inserted while the
    /// cart holds fewer than `cap` distinct dishes.
    ///
    /// ## Returns
    /// * `Some(line)` - The inserted or incremented line
    /// * `None` - The dish is new and the cart is already at `cap`
    pub async fn add_item(
        &self,
        table_id: &TableId,
        item_id: &str,
        name: &str,
        price_cents: i64,
        cap: usize,
    ) -> DbResult<Option<CartLine>> {
        debug!(table_id = %table_id, item_id = %item_id, cap, "Adding item to cart");

        let now = Utc::now();
        let mut conn = self.pool.acquire().await?;
        ensure_on(&mut *conn, table_id, now).await?;

        // WHERE keeps SQLite from reading ON CONFLICT as a join constraint.
        let sql = format!(
            r#"
            INSERT INTO cart_lines (table_id, item_id, name, price_cents, quantity, status, added_at)
            SELECT ?1, ?2, ?3, ?4, 1, 'preparing', ?5
            WHERE EXISTS (SELECT 1 FROM cart_lines WHERE table_id = ?1 AND item_id = ?2)
               OR (SELECT COUNT(*) FROM cart_lines WHERE table_id = ?1) < ?6
            ON CONFLICT (table_id, item_id) DO UPDATE SET quantity = MIN(quantity + 1, ?7)
            RETURNING {CART_COLUMNS}
            "#
        );

        let line = sqlx::query_as::<_, CartLine>(&sql)
            .bind(table_id.as_str())
            .bind(item_id)
            .bind(name)
            .bind(price_cents)
            .bind(now)
            .bind(cap as i64)
            .bind(MAX_QUANTITY)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(line)
    }

    /// Sets a line's quantity; zero or less deletes the line.
    ///
    /// ## Returns
    /// Rows affected (0 when the line does not exist).
    pub async fn update_quantity(
        &self,
        table_id: &TableId,
        line_id: i64,
        quantity: i64,
    ) -> DbResult<u64> {
        if quantity <= 0 {
            return self.remove(table_id, line_id).await;
        }

        debug!(table_id = %table_id, line_id, quantity, "Updating cart quantity");

        let result = sqlx::query(
            "UPDATE cart_lines SET quantity = ?3 WHERE table_id = ?1 AND id = ?2",
        )
        .bind(table_id.as_str())
        .bind(line_id)
        .bind(quantity)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Deletes a line. Idempotent.
    pub async fn remove(&self, table_id: &TableId, line_id: i64) -> DbResult<u64> {
        debug!(table_id = %table_id, line_id, "Removing cart line");

        let result = sqlx::query("DELETE FROM cart_lines WHERE table_id = ?1 AND id = ?2")
            .bind(table_id.as_str())
            .bind(line_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Lists a seating's cart in the order dishes were first added.
    pub async fn list(&self, table_id: &TableId) -> DbResult<Vec<CartLine>> {
        let sql = format!("SELECT {CART_COLUMNS} FROM cart_lines WHERE table_id = ?1 ORDER BY id");

        let lines = sqlx::query_as::<_, CartLine>(&sql)
            .bind(table_id.as_str())
            .fetch_all(&self.pool)
            .await?;

        Ok(lines)
    }
}
