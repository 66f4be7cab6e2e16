//! # Seating Repository
//!
//! The seating registry: one row per table id the system has seen.
//!
//! Carts, tickets and history rows reference `seatings(table_id)`, so a
//! seating must be registered before the first write that touches it.
//! Registration is an idempotent `INSERT ... ON CONFLICT DO NOTHING`.
//! The first confirmed order stamps `first_confirmed_at`; only stamped
//! seatings appear on the cashier board.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use sushi_core::{PaymentMethod, Seating, SeatingSnapshot, TableId};

const SEATING_COLUMNS: &str = "table_id, first_seen_at, first_confirmed_at";

/// Repository for the seating registry.
#[derive(Debug, Clone)]
pub struct SeatingRepository {
    pool: SqlitePool,
}

impl SeatingRepository {
    /// Creates a new SeatingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SeatingRepository { pool }
    }

    /// Registers the seating if it is new.
    ///
    /// ## Returns
    /// `true` when this call created the seating, `false` if it existed.
    pub async fn ensure(&self, table_id: &TableId) -> DbResult<bool> {
        let mut conn = self.pool.acquire().await?;
        let created = ensure_on(&mut *conn, table_id, Utc::now()).await?;
        Ok(created)
    }

    /// Gets one seating.
    pub async fn get(&self, table_id: &TableId) -> DbResult<Option<Seating>> {
        let sql = format!("SELECT {SEATING_COLUMNS} FROM seatings WHERE table_id = ?1");

        let seating = sqlx::query_as::<_, Seating>(&sql)
            .bind(table_id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(seating)
    }

    /// Lists every registered seating, ordered by table (numeric-aware).
    pub async fn list(&self) -> DbResult<Vec<Seating>> {
        let sql = format!("SELECT {SEATING_COLUMNS} FROM seatings ORDER BY first_seen_at");
        self.fetch_sorted(&sql).await
    }

    /// Lists seatings that have confirmed at least one order, ordered by
    /// table. Seatings that only read or edited a cart are left out.
    pub async fn list_confirmed(&self) -> DbResult<Vec<Seating>> {
        let sql = format!(
            "SELECT {SEATING_COLUMNS} FROM seatings \
             WHERE first_confirmed_at IS NOT NULL ORDER BY first_seen_at"
        );
        self.fetch_sorted(&sql).await
    }

    async fn fetch_sorted(&self, sql: &str) -> DbResult<Vec<Seating>> {
        let mut seatings = sqlx::query_as::<_, Seating>(sql)
            .fetch_all(&self.pool)
            .await?;

        seatings.sort_by(|a, b| a.table_id.cmp(&b.table_id));
        debug!(count = seatings.len(), "Listed seatings");
        Ok(seatings)
    }

    /// Collects what the cashier board needs to know about one seating.
    pub async fn snapshot(&self, table_id: &TableId) -> DbResult<SeatingSnapshot> {
        let (history_lines, latest_method, has_sale) =
            sqlx::query_as::<_, (i64, Option<String>, bool)>(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM history_lines WHERE table_id = ?1),
                    (SELECT method FROM payment_selections
                        WHERE table_id = ?1
                        ORDER BY selected_at DESC, id DESC
                        LIMIT 1),
                    EXISTS (SELECT 1 FROM sales WHERE table_id = ?1)
                "#,
            )
            .bind(table_id.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(SeatingSnapshot {
            table_id: table_id.clone(),
            history_lines,
            latest_method: latest_method.map(PaymentMethod::from),
            has_sale,
        })
    }
}

/// Registers a seating on an existing connection or transaction.
///
/// Used as the first statement of write transactions so the SQLite write
/// lock is held before anything is read.
pub(crate) async fn ensure_on(
    conn: &mut SqliteConnection,
    table_id: &TableId,
    now: DateTime<Utc>,
) -> DbResult<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO seatings (table_id, first_seen_at)
        VALUES (?1, ?2)
        ON CONFLICT(table_id) DO NOTHING
        "#,
    )
    .bind(table_id.as_str())
    .bind(now)
    .execute(&mut *conn)
    .await?;

    let created = result.rows_affected() > 0;
    if created {
        debug!(table_id = %table_id, "Registered new seating");
    }
    Ok(created)
}

/// Stamps the seating's first confirmation inside a confirm transaction.
/// Later confirmations keep the original timestamp.
pub(crate) async fn mark_confirmed_on(
    conn: &mut SqliteConnection,
    table_id: &TableId,
    now: DateTime<Utc>,
) -> DbResult<()> {
    sqlx::query(
        r#"
        UPDATE seatings
        SET first_confirmed_at = COALESCE(first_confirmed_at, ?2)
        WHERE table_id = ?1
        "#,
    )
    .bind(table_id.as_str())
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn table(raw: &str) -> TableId {
        TableId::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn test_ensure_is_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.seatings();

        assert!(repo.ensure(&table("4")).await.unwrap());
        assert!(!repo.ensure(&table("4")).await.unwrap());

        let seating = repo.get(&table("4")).await.unwrap().unwrap();
        assert_eq!(seating.table_id, table("4"));
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_orders_numerically() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.seatings();

        for raw in ["10", "bar", "9", "1"] {
            repo.ensure(&table(raw)).await.unwrap();
        }

        let tables: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.table_id.to_string())
            .collect();
        assert_eq!(tables, ["1", "9", "10", "bar"]);
    }

    #[tokio::test]
    async fn test_snapshot_of_fresh_seating() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.seatings();
        repo.ensure(&table("3")).await.unwrap();

        let snapshot = repo.snapshot(&table("3")).await.unwrap();
        assert_eq!(snapshot.history_lines, 0);
        assert_eq!(snapshot.latest_method, None);
        assert!(!snapshot.has_sale);
    }

    #[tokio::test]
    async fn test_list_confirmed_skips_cart_only_seatings() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.seatings();

        repo.ensure(&table("99")).await.unwrap();
        db.carts().add_item(&table("4"), "ebi", "Ebi", 3_500, 5).await.unwrap();
        assert!(repo.list_confirmed().await.unwrap().is_empty());

        db.kitchen().confirm_order(&table("4")).await.unwrap().unwrap();
        let first = repo.get(&table("4")).await.unwrap().unwrap().first_confirmed_at;
        assert!(first.is_some());

        // A second round keeps the first stamp
        db.carts().add_item(&table("4"), "tamago", "Tamago", 2_000, 5).await.unwrap();
        db.kitchen().confirm_order(&table("4")).await.unwrap().unwrap();
        let seating = repo.get(&table("4")).await.unwrap().unwrap();
        assert_eq!(seating.first_confirmed_at, first);

        let confirmed = repo.list_confirmed().await.unwrap();
        assert_eq!(confirmed.len(), 1);
        assert_eq!(confirmed[0].table_id, table("4"));
        assert!(repo.get(&table("99")).await.unwrap().unwrap().first_confirmed_at.is_none());
    }
}
