//! # Cashier Board
//!
//! One snapshot per seating that has confirmed at least once, fetched
//! concurrently, then classified and sorted by the pure
//! `sushi_core::cashier::build_board`. Seatings that only opened a cart
//! never reach the board.

use futures_util::future::try_join_all;
use tracing::debug;

use sushi_core::cashier::build_board;
use sushi_core::CashierEntry;

use super::OrderEngine;
use crate::error::EngineResult;

impl OrderEngine {
    /// Seatings the cashier needs to look at, ordered by table.
    ///
    /// - served items + chosen method → `AwaitingPayment`
    /// - served items, no method → `NotReady`
    /// - nothing served, never settled → `Unsettled`
    /// - nothing served, settled before → omitted
    pub async fn cashier_board(&self) -> EngineResult<Vec<CashierEntry>> {
        let seatings = self.db.seatings().list_confirmed().await?;
        let repo = self.db.seatings();

        let snapshots = try_join_all(
            seatings
                .iter()
                .map(|seating| repo.snapshot(&seating.table_id)),
        )
        .await?;

        let board = build_board(snapshots);
        debug!(seatings = seatings.len(), entries = board.len(), "Cashier board built");
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::engine;
    use sushi_core::{CashierState, PaymentMethod};

    #[tokio::test]
    async fn test_board_classifies_each_seating() {
        let engine = engine().await;

        // 10: served, paying by card
        engine.add_item("10", "tuna", "Tuna Nigiri", 5_000).await.unwrap();
        engine.confirm_order("10").await.unwrap();
        engine.select_method("10", "card").await.unwrap();

        // 2: served, no method yet
        engine.add_item("2", "ebi", "Ebi Nigiri", 3_500).await.unwrap();
        engine.confirm_order("2").await.unwrap();

        // 3: confirmed once, the only dish was cancelled
        engine.add_item("3", "tamago", "Tamago", 2_000).await.unwrap();
        let tickets = engine.confirm_order("3").await.unwrap();
        engine.update_status(tickets[0].id, "cancelled").await.unwrap();

        // 5: cart only, never confirmed
        engine.add_item("5", "ikura", "Ikura Gunkan", 7_000).await.unwrap();

        // 7: already paid
        engine.add_item("7", "unagi", "Unagi", 6_000).await.unwrap();
        engine.confirm_order("7").await.unwrap();
        engine.settle_at_counter("7").await.unwrap();

        let board = engine.cashier_board().await.unwrap();
        let rows: Vec<(&str, CashierState)> = board
            .iter()
            .map(|entry| (entry.table_id.as_str(), entry.state))
            .collect();

        assert_eq!(
            rows,
            vec![
                ("2", CashierState::NotReady),
                ("3", CashierState::Unsettled),
                ("10", CashierState::AwaitingPayment),
            ]
        );
        assert_eq!(board[2].method, Some(PaymentMethod::Card));
        assert_eq!(board[0].method, None);
    }

    #[tokio::test]
    async fn test_empty_board() {
        let engine = engine().await;
        assert!(engine.cashier_board().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cart_reads_stay_off_the_board() {
        let engine = engine().await;
        assert!(engine.list_cart("99").await.is_empty());
        engine.ensure_partitions("98").await.unwrap();

        assert!(engine.cashier_board().await.unwrap().is_empty());
        assert_eq!(engine.list_seatings().await.unwrap().len(), 2);
    }
}
