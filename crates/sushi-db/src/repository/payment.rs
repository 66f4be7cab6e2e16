//! # Payment Selection Repository
//!
//! Append-only log of the payment channel each seating picked before paying.
//! Readers take the newest row; settlement deletes the seating's rows.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use sushi_core::{PaymentMethod, PaymentSelection, TableId};

const SELECTION_COLUMNS: &str = "id, table_id, method, selected_at";

/// Repository for payment selections.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: SqlitePool,
}

impl PaymentRepository {
    /// Creates a new PaymentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PaymentRepository { pool }
    }

    /// Records a selection. Every call appends a row.
    pub async fn select(
        &self,
        table_id: &TableId,
        method: &PaymentMethod,
    ) -> DbResult<PaymentSelection> {
        debug!(table_id = %table_id, method = %method, "Recording payment selection");

        let sql = format!(
            r#"
            INSERT INTO payment_selections (table_id, method, selected_at)
            VALUES (?1, ?2, ?3)
            RETURNING {SELECTION_COLUMNS}
            "#
        );

        let selection = sqlx::query_as::<_, PaymentSelection>(&sql)
            .bind(table_id.as_str())
            .bind(method.as_str())
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        Ok(selection)
    }

    /// The newest selection for a seating, if any.
    pub async fn latest(&self, table_id: &TableId) -> DbResult<Option<PaymentSelection>> {
        let sql = format!(
            r#"
            SELECT {SELECTION_COLUMNS}
            FROM payment_selections
            WHERE table_id = ?1
            ORDER BY selected_at DESC, id DESC
            LIMIT 1
            "#
        );

        let selection = sqlx::query_as::<_, PaymentSelection>(&sql)
            .bind(table_id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(selection)
    }

    /// All pending selections for a seating, oldest first.
    #[cfg(test)]
    pub(crate) async fn list(&self, table_id: &TableId) -> DbResult<Vec<PaymentSelection>> {
        let sql = format!(
            "SELECT {SELECTION_COLUMNS} FROM payment_selections WHERE table_id = ?1 ORDER BY selected_at, id"
        );

        let selections = sqlx::query_as::<_, PaymentSelection>(&sql)
            .bind(table_id.as_str())
            .fetch_all(&self.pool)
            .await?;

        Ok(selections)
    }
}
