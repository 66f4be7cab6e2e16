//! # Kitchen Repository
//!
//! The global kitchen queue and the two transitions that keep it in step
//! with each seating's history.
//!
//! ## Confirm Order (one transaction)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │   1. register seating            (write first: takes the write lock)    │
//! │   2. INSERT tickets  SELECT FROM cart_lines    RETURNING tickets        │
//! │        └── no rows? → ROLLBACK, report empty order                      │
//! │   3. INSERT history  SELECT FROM the new tickets                        │
//! │   4. DELETE cart_lines for the table                                    │
//! │   5. stamp the seating's first confirmation (kept if already set)       │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Apply Status (one transaction)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │   lock + load ticket   (no-op UPDATE ... RETURNING)                     │
//! │        └── missing? → ROLLBACK, report not found                        │
//! │                                                                         │
//! │   Cancel    DELETE ticket; DELETE history (same table + item)           │
//! │   Complete  UPDATE history SET 'done'; DELETE ticket                    │
//! │   Advance   UPDATE ticket status; UPDATE history status                 │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failure at any step drops the transaction, which rolls back, so the
//! queue and history are never left half-updated.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::seating::{ensure_on, mark_confirmed_on};
use sushi_core::{KitchenTicket, StatusAction, StatusUpdate, TableId, TicketStatus};

const TICKET_COLUMNS: &str =
    "id, table_id, item_id, name, price_cents, quantity, status, queued_at";

/// Repository for kitchen tickets.
#[derive(Debug, Clone)]
pub struct KitchenRepository {
    pool: SqlitePool,
}

impl KitchenRepository {
    /// Creates a new KitchenRepository.
    pub fn new(pool: SqlitePool) -> Self {
        KitchenRepository { pool }
    }

    /// Moves a seating's whole cart into the kitchen queue and its history.
    ///
    /// ## Returns
    /// * `Some(tickets)` - One new ticket per former cart line, in cart order
    /// * `None` - The cart was empty; nothing was written
    pub async fn confirm_order(&self, table_id: &TableId) -> DbResult<Option<Vec<KitchenTicket>>> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        ensure_on(&mut *tx, table_id, now).await?;

        let insert_tickets = format!(
            r#"
            INSERT INTO kitchen_tickets (table_id, item_id, name, price_cents, quantity, status, queued_at)
            SELECT table_id, item_id, name, price_cents, quantity, 'preparing', ?2
            FROM cart_lines
            WHERE table_id = ?1
            ORDER BY id
            RETURNING {TICKET_COLUMNS}
            "#
        );

        let mut tickets = sqlx::query_as::<_, KitchenTicket>(&insert_tickets)
            .bind(table_id.as_str())
            .bind(now)
            .fetch_all(&mut *tx)
            .await?;

        tickets.sort_by_key(|t| t.id);
        let (first_id, last_id) = match (tickets.first(), tickets.last()) {
            (Some(first), Some(last)) => (first.id, last.id),
            _ => {
                debug!(table_id = %table_id, "Confirm requested for empty cart");
                return Ok(None);
            }
        };

        let history = sqlx::query(
            r#"
            INSERT INTO history_lines
                (ticket_id, table_id, item_id, name, price_cents, quantity, status, served_at)
            SELECT id, table_id, item_id, name, price_cents, quantity, 'preparing', ?2
            FROM kitchen_tickets
            WHERE table_id = ?1 AND id BETWEEN ?3 AND ?4
            ORDER BY id
            "#,
        )
        .bind(table_id.as_str())
        .bind(now)
        .bind(first_id)
        .bind(last_id)
        .execute(&mut *tx)
        .await?;

        if history.rows_affected() != tickets.len() as u64 {
            return Err(DbError::Internal(format!(
                "history mirror mismatch for table {table_id}: {} tickets, {} history rows",
                tickets.len(),
                history.rows_affected()
            )));
        }

        sqlx::query("DELETE FROM cart_lines WHERE table_id = ?1")
            .bind(table_id.as_str())
            .execute(&mut *tx)
            .await?;

        mark_confirmed_on(&mut *tx, table_id, now).await?;

        tx.commit().await.map_err(DbError::transaction)?;

        info!(table_id = %table_id, tickets = tickets.len(), "Order confirmed to kitchen");
        Ok(Some(tickets))
    }

    /// Applies a status to a ticket and mirrors it into history.
    ///
    /// ## Returns
    /// * `Some(update)` - What was done
    /// * `None` - No such ticket (already done/cancelled or never queued)
    pub async fn apply_status(
        &self,
        ticket_id: i64,
        status: &TicketStatus,
    ) -> DbResult<Option<StatusUpdate>> {
        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        let lock_ticket = format!(
            "UPDATE kitchen_tickets SET status = status WHERE id = ?1 RETURNING {TICKET_COLUMNS}"
        );
        let ticket = sqlx::query_as::<_, KitchenTicket>(&lock_ticket)
            .bind(ticket_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(ticket) = ticket else {
            debug!(ticket_id, "Status update for unknown ticket");
            return Ok(None);
        };

        let action = status.action();
        let history_rows = match action {
            StatusAction::Cancel => {
                sqlx::query("DELETE FROM kitchen_tickets WHERE id = ?1")
                    .bind(ticket.id)
                    .execute(&mut *tx)
                    .await?;

                sqlx::query("DELETE FROM history_lines WHERE table_id = ?1 AND item_id = ?2")
                    .bind(ticket.table_id.as_str())
                    .bind(&ticket.item_id)
                    .execute(&mut *tx)
                    .await?
                    .rows_affected()
            }
            StatusAction::Complete => {
                let rows = sqlx::query("UPDATE history_lines SET status = ?2 WHERE ticket_id = ?1")
                    .bind(ticket.id)
                    .bind(TicketStatus::Done.as_str())
                    .execute(&mut *tx)
                    .await?
                    .rows_affected();

                sqlx::query("DELETE FROM kitchen_tickets WHERE id = ?1")
                    .bind(ticket.id)
                    .execute(&mut *tx)
                    .await?;

                rows
            }
            StatusAction::Advance => {
                sqlx::query("UPDATE kitchen_tickets SET status = ?2 WHERE id = ?1")
                    .bind(ticket.id)
                    .bind(status.as_str())
                    .execute(&mut *tx)
                    .await?;

                sqlx::query("UPDATE history_lines SET status = ?2 WHERE ticket_id = ?1")
                    .bind(ticket.id)
                    .bind(status.as_str())
                    .execute(&mut *tx)
                    .await?
                    .rows_affected()
            }
        };

        tx.commit().await.map_err(DbError::transaction)?;

        info!(
            ticket_id,
            table_id = %ticket.table_id,
            status = %status,
            ?action,
            history_rows,
            "Kitchen ticket status applied"
        );

        Ok(Some(StatusUpdate {
            ticket,
            status: status.clone(),
            still_queued: !status.is_final(),
            history_rows,
        }))
    }

    /// Gets one ticket.
    pub async fn get(&self, ticket_id: i64) -> DbResult<Option<KitchenTicket>> {
        let sql = format!("SELECT {TICKET_COLUMNS} FROM kitchen_tickets WHERE id = ?1");

        let ticket = sqlx::query_as::<_, KitchenTicket>(&sql)
            .bind(ticket_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(ticket)
    }

    /// Lists the whole queue: by table (numeric-aware), then queue order.
    pub async fn list_queue(&self) -> DbResult<Vec<KitchenTicket>> {
        let sql = format!("SELECT {TICKET_COLUMNS} FROM kitchen_tickets ORDER BY id");

        let mut tickets = sqlx::query_as::<_, KitchenTicket>(&sql)
            .fetch_all(&self.pool)
            .await?;

        // Stable sort keeps insertion order within a table
        tickets.sort_by(|a, b| a.table_id.cmp(&b.table_id));
        Ok(tickets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn table(raw: &str) -> TableId {
        TableId::parse(raw).unwrap()
    }

    async fn seeded(db: &Database, t: &TableId, items: &[(&str, i64)]) {
        for (item, price) in items {
            db.carts().add_item(t, item, item, *price, 5).await.unwrap().unwrap();
        }
    }

    #[tokio::test]
    async fn test_confirm_moves_cart_to_queue_and_history() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let t = table("4");
        seeded(&db, &t, &[("salmon", 10_000), ("tamago", 5_000), ("salmon", 10_000)]).await;

        let tickets = db.kitchen().confirm_order(&t).await.unwrap().unwrap();
        assert_eq!(tickets.len(), 2);
        assert_eq!(tickets[0].item_id, "salmon");
        assert_eq!(tickets[0].quantity, 2);
        assert_eq!(tickets[0].status, TicketStatus::Preparing);

        assert!(db.carts().list(&t).await.unwrap().is_empty());

        let history = db.history().list(&t).await.unwrap();
        assert_eq!(history.len(), 2);
        for (ticket, line) in tickets.iter().zip(&history) {
            assert_eq!(line.ticket_id, ticket.id);
            assert_eq!(line.item_id, ticket.item_id);
            assert_eq!(line.quantity, ticket.quantity);
        }
    }

    #[tokio::test]
    async fn test_confirm_empty_cart_writes_nothing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let t = table("6");

        assert!(db.kitchen().confirm_order(&t).await.unwrap().is_none());
        assert!(db.kitchen().list_queue().await.unwrap().is_empty());
        // Rolled back: not even the seating was registered
        assert!(db.seatings().get(&t).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_done_keeps_history_and_leaves_queue() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let t = table("1");
        seeded(&db, &t, &[("maguro", 8_000)]).await;
        let ticket = db.kitchen().confirm_order(&t).await.unwrap().unwrap().remove(0);

        let update = db
            .kitchen()
            .apply_status(ticket.id, &TicketStatus::Done)
            .await
            .unwrap()
            .unwrap();
        assert!(!update.still_queued);
        assert_eq!(update.history_rows, 1);

        assert!(db.kitchen().get(ticket.id).await.unwrap().is_none());
        let history = db.history().list(&t).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, TicketStatus::Done);
    }

    #[tokio::test]
    async fn test_cancel_removes_ticket_and_all_matching_history() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let t = table("2");

        // Same dish confirmed in two rounds
        seeded(&db, &t, &[("unagi", 12_000)]).await;
        let first = db.kitchen().confirm_order(&t).await.unwrap().unwrap().remove(0);
        seeded(&db, &t, &[("unagi", 12_000), ("miso", 2_000)]).await;
        db.kitchen().confirm_order(&t).await.unwrap().unwrap();

        let update = db
            .kitchen()
            .apply_status(first.id, &TicketStatus::Cancelled)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(update.history_rows, 2);

        let history = db.history().list(&t).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].item_id, "miso");
        assert!(db.kitchen().get(first.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_other_status_relabels_both_sides() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let t = table("3");
        seeded(&db, &t, &[("hamachi", 9_000)]).await;
        let ticket = db.kitchen().confirm_order(&t).await.unwrap().unwrap().remove(0);

        let plating = TicketStatus::from("plating");
        let update = db.kitchen().apply_status(ticket.id, &plating).await.unwrap().unwrap();
        assert!(update.still_queued);

        let queued = db.kitchen().get(ticket.id).await.unwrap().unwrap();
        assert_eq!(queued.status, plating);
        assert_eq!(db.history().list(&t).await.unwrap()[0].status, plating);
    }

    #[tokio::test]
    async fn test_unknown_ticket() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let result = db.kitchen().apply_status(999, &TicketStatus::Done).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_queue_ordered_by_table_then_insertion() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        seeded(&db, &table("10"), &[("a", 100)]).await;
        db.kitchen().confirm_order(&table("10")).await.unwrap();
        seeded(&db, &table("2"), &[("b", 100), ("c", 100)]).await;
        db.kitchen().confirm_order(&table("2")).await.unwrap();
        seeded(&db, &table("10"), &[("d", 100)]).await;
        db.kitchen().confirm_order(&table("10")).await.unwrap();

        let order: Vec<(String, String)> = db
            .kitchen()
            .list_queue()
            .await
            .unwrap()
            .into_iter()
            .map(|t| (t.table_id.to_string(), t.item_id))
            .collect();

        assert_eq!(
            order,
            vec![
                ("2".to_string(), "b".to_string()),
                ("2".to_string(), "c".to_string()),
                ("10".to_string(), "a".to_string()),
                ("10".to_string(), "d".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_history_write_rolls_back_confirm() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let t = table("5");
        seeded(&db, &t, &[("sake", 9_000)]).await;

        sqlx::query(
            r#"
            CREATE TRIGGER history_lines_reject BEFORE INSERT ON history_lines
            BEGIN
                SELECT RAISE(ABORT, 'disk full');
            END
            "#,
        )
        .execute(db.pool())
        .await
        .unwrap();

        assert!(db.kitchen().confirm_order(&t).await.is_err());

        // Cart kept, nothing queued, nothing mirrored, seating not stamped
        let cart = db.carts().list(&t).await.unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].item_id, "sake");
        assert!(db.kitchen().list_queue().await.unwrap().is_empty());
        assert!(db.history().list(&t).await.unwrap().is_empty());
        let seating = db.seatings().get(&t).await.unwrap().unwrap();
        assert!(seating.first_confirmed_at.is_none());

        sqlx::query("DROP TRIGGER history_lines_reject")
            .execute(db.pool())
            .await
            .unwrap();
        let tickets = db.kitchen().confirm_order(&t).await.unwrap().unwrap();
        assert_eq!(tickets.len(), 1);
        assert!(db.carts().list(&t).await.unwrap().is_empty());
    }
}
