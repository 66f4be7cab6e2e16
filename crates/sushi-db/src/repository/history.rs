//! # History Repository
//!
//! Read access to a seating's served history: confirmed lines that have not
//! been settled yet. Writes happen inside the kitchen and settlement
//! transactions.

use sqlx::SqlitePool;

use crate::error::DbResult;
use sushi_core::{HistoryLine, TableId};

pub(crate) const HISTORY_COLUMNS: &str =
    "id, ticket_id, table_id, item_id, name, price_cents, quantity, status, served_at";

/// Repository for history lines.
#[derive(Debug, Clone)]
pub struct HistoryRepository {
    pool: SqlitePool,
}

impl HistoryRepository {
    /// Creates a new HistoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        HistoryRepository { pool }
    }

    /// Lists a seating's history in confirmation order.
    pub async fn list(&self, table_id: &TableId) -> DbResult<Vec<HistoryLine>> {
        let sql =
            format!("SELECT {HISTORY_COLUMNS} FROM history_lines WHERE table_id = ?1 ORDER BY id");

        let lines = sqlx::query_as::<_, HistoryLine>(&sql)
            .bind(table_id.as_str())
            .fetch_all(&self.pool)
            .await?;

        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_history_follows_confirmation() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let t = TableId::parse("8").unwrap();

        assert!(db.history().list(&t).await.unwrap().is_empty());

        db.carts().add_item(&t, "ikura", "Ikura", 6_000, 5).await.unwrap();
        db.carts().add_item(&t, "ikura", "Ikura", 6_000, 5).await.unwrap();
        db.kitchen().confirm_order(&t).await.unwrap().unwrap();

        let history = db.history().list(&t).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].item_id, "ikura");
        assert_eq!(history[0].quantity, 2);
    }
}
