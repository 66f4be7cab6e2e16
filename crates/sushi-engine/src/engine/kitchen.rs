//! # Kitchen Operations
//!
//! Confirming a cart and moving tickets through the kitchen.
//!
//! ## Status Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  update_status(ticket, s)                                               │
//! │                                                                         │
//! │   s = "cancelled" ──► delete ticket, delete history (table + dish)      │
//! │   s = "done"      ──► history.status = done, delete ticket              │
//! │   anything else   ──► ticket.status = s, history.status = s             │
//! │                                                                         │
//! │  Each branch is one transaction. The ticket row is locked first.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use sushi_core::validation::{validate_label, validate_table_id};
use sushi_core::{CoreError, KitchenTicket, StatusUpdate, TicketStatus};

use super::OrderEngine;
use crate::error::EngineResult;

impl OrderEngine {
    /// Sends the seating's whole cart to the kitchen.
    ///
    /// Every cart line becomes one queued ticket plus one history line and
    /// the cart is emptied, all in one transaction.
    ///
    /// ## Errors
    /// `EmptyOrder` when the cart has no lines; nothing is written.
    pub async fn confirm_order(&self, table_id: &str) -> EngineResult<Vec<KitchenTicket>> {
        let table_id = validate_table_id(table_id)?;

        let tickets = self
            .db
            .kitchen()
            .confirm_order(&table_id)
            .await?
            .ok_or_else(|| CoreError::EmptyOrder {
                table_id: table_id.to_string(),
            })?;

        debug!(table_id = %table_id, tickets = tickets.len(), "Cart handed to kitchen");
        Ok(tickets)
    }

    /// Applies a kitchen status to a ticket.
    ///
    /// `status` is free text; "cancelled" and "done" are final (any case,
    /// "canceled" accepted), anything else is stored as-is.
    ///
    /// ## Errors
    /// `TicketNotFound` when no such ticket is queued.
    pub async fn update_status(&self, ticket_id: i64, status: &str) -> EngineResult<StatusUpdate> {
        validate_label("status", status)?;
        let status = TicketStatus::from(status);

        let update = self
            .db
            .kitchen()
            .apply_status(ticket_id, &status)
            .await?
            .ok_or(CoreError::TicketNotFound(ticket_id))?;

        debug!(ticket_id, still_queued = update.still_queued, "Status update returned");
        Ok(update)
    }

    /// All queued tickets, by table then queue order.
    pub async fn list_queue(&self) -> EngineResult<Vec<KitchenTicket>> {
        Ok(self.db.kitchen().list_queue().await?)
    }

    /// One queued ticket.
    ///
    /// ## Errors
    /// `TicketNotFound` once the ticket is done or cancelled.
    pub async fn get_ticket(&self, ticket_id: i64) -> EngineResult<KitchenTicket> {
        Ok(self
            .db
            .kitchen()
            .get(ticket_id)
            .await?
            .ok_or(CoreError::TicketNotFound(ticket_id))?)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::engine;
    use crate::error::ErrorCode;
    use sushi_core::TicketStatus;

    #[tokio::test]
    async fn test_confirm_moves_cart_to_queue_and_history() {
        let engine = engine().await;
        engine.add_item("4", "salmon", "Salmon Nigiri", 4_000).await.unwrap();
        engine.add_item("4", "salmon", "Salmon Nigiri", 4_000).await.unwrap();
        engine.add_item("4", "tuna", "Tuna Nigiri", 5_000).await.unwrap();

        let tickets = engine.confirm_order("4").await.unwrap();
        assert_eq!(tickets.len(), 2);
        assert!(engine.list_cart("4").await.is_empty());

        let history = engine.list_history("4").await.unwrap();
        assert_eq!(history.len(), 2);
        for ticket in &tickets {
            let mirror: Vec<_> = history
                .iter()
                .filter(|h| h.ticket_id == ticket.id)
                .collect();
            assert_eq!(mirror.len(), 1);
            assert_eq!(mirror[0].item_id, ticket.item_id);
            assert_eq!(mirror[0].quantity, ticket.quantity);
            assert_eq!(mirror[0].status, TicketStatus::Preparing);
        }
        assert_eq!(engine.list_queue().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_confirm_empty_cart() {
        let engine = engine().await;
        let err = engine.confirm_order("4").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::EmptyOrder);
        assert!(engine.list_queue().await.unwrap().is_empty());
        assert!(engine.list_history("4").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_removes_ticket_and_history() {
        let engine = engine().await;
        engine.add_item("4", "salmon", "Salmon Nigiri", 4_000).await.unwrap();
        engine.add_item("4", "tuna", "Tuna Nigiri", 5_000).await.unwrap();
        let tickets = engine.confirm_order("4").await.unwrap();
        let salmon = tickets.iter().find(|t| t.item_id == "salmon").unwrap();

        let update = engine.update_status(salmon.id, "Cancelled").await.unwrap();
        assert!(!update.still_queued);
        assert_eq!(update.status, TicketStatus::Cancelled);

        let queue = engine.list_queue().await.unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].item_id, "tuna");

        let history = engine.list_history("4").await.unwrap();
        assert!(history.iter().all(|h| h.item_id != "salmon"));

        let bill = engine.preview_bill("4").await.unwrap();
        assert_eq!(bill.quote.subtotal.cents(), 5_000);
    }

    #[tokio::test]
    async fn test_cancel_removes_every_matching_history_line() {
        let engine = engine().await;
        engine.add_item("4", "salmon", "Salmon Nigiri", 4_000).await.unwrap();
        let first = engine.confirm_order("4").await.unwrap();
        engine.add_item("4", "salmon", "Salmon Nigiri", 4_000).await.unwrap();
        engine.confirm_order("4").await.unwrap();
        assert_eq!(engine.list_history("4").await.unwrap().len(), 2);

        let update = engine.update_status(first[0].id, "cancelled").await.unwrap();
        assert_eq!(update.history_rows, 2);
        assert!(engine.list_history("4").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_done_keeps_history_until_settlement() {
        let engine = engine().await;
        engine.add_item("4", "ebi", "Ebi Nigiri", 3_500).await.unwrap();
        let tickets = engine.confirm_order("4").await.unwrap();

        let update = engine.update_status(tickets[0].id, "done").await.unwrap();
        assert!(!update.still_queued);
        assert!(engine.list_queue().await.unwrap().is_empty());

        let history = engine.list_history("4").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, TicketStatus::Done);

        let err = engine.get_ticket(tickets[0].id).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_other_status_updates_in_place() {
        let engine = engine().await;
        engine.add_item("4", "ebi", "Ebi Nigiri", 3_500).await.unwrap();
        let tickets = engine.confirm_order("4").await.unwrap();

        let update = engine.update_status(tickets[0].id, "plating").await.unwrap();
        assert!(update.still_queued);

        let ticket = engine.get_ticket(tickets[0].id).await.unwrap();
        assert_eq!(ticket.status.as_str(), "plating");
        assert_eq!(engine.list_history("4").await.unwrap()[0].status.as_str(), "plating");
    }

    #[tokio::test]
    async fn test_unknown_ticket() {
        let engine = engine().await;
        let err = engine.update_status(404, "done").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);

        let err = engine.update_status(1, "  ").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_queue_ordered_by_table_then_arrival() {
        let engine = engine().await;
        for table in ["10", "2"] {
            engine.add_item(table, "tuna", "Tuna Nigiri", 5_000).await.unwrap();
            engine.add_item(table, "ebi", "Ebi Nigiri", 3_500).await.unwrap();
            engine.confirm_order(table).await.unwrap();
        }

        let queue = engine.list_queue().await.unwrap();
        let order: Vec<(String, String)> = queue
            .into_iter()
            .map(|t| (t.table_id.to_string(), t.item_id))
            .collect();
        assert_eq!(
            order,
            vec![
                ("2".to_string(), "tuna".to_string()),
                ("2".to_string(), "ebi".to_string()),
                ("10".to_string(), "tuna".to_string()),
                ("10".to_string(), "ebi".to_string()),
            ]
        );
    }
}
