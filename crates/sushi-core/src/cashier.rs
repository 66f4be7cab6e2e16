//! # Cashier Board
//!
//! Builds the cashier's list of seatings from per-seating snapshots.
//!
//! ## Classification
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  history lines?  ──yes──► method chosen? ──yes──► AwaitingPayment(m)    │
//! │        │                        │                                       │
//! │        no                       no ─────────────► NotReady              │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  ever settled?   ──no───► Unsettled                                     │
//! │        │                                                                │
//! │        yes ─────────────► omitted (already paid, table free)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Snapshots may arrive in any order (they are fetched concurrently); the
//! output is always sorted by table.

use crate::types::{CashierEntry, CashierState, SeatingSnapshot};

/// Classifies one seating, or `None` when it has nothing for the cashier.
pub fn classify(snapshot: &SeatingSnapshot) -> Option<CashierEntry> {
    let (state, method) = if snapshot.history_lines > 0 {
        match &snapshot.latest_method {
            Some(method) => (CashierState::AwaitingPayment, Some(method.clone())),
            None => (CashierState::NotReady, None),
        }
    } else if !snapshot.has_sale {
        (CashierState::Unsettled, None)
    } else {
        return None;
    };

    Some(CashierEntry {
        table_id: snapshot.table_id.clone(),
        state,
        method,
    })
}

/// Builds the board, ordered by table (numeric-aware).
pub fn build_board<I>(snapshots: I) -> Vec<CashierEntry>
where
    I: IntoIterator<Item = SeatingSnapshot>,
{
    let mut board: Vec<CashierEntry> = snapshots
        .into_iter()
        .filter_map(|snapshot| classify(&snapshot))
        .collect();
    board.sort_by(|a, b| a.table_id.cmp(&b.table_id));
    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::PaymentMethod;
    use crate::types::TableId;

    fn snapshot(
        table: &str,
        history_lines: i64,
        latest_method: Option<PaymentMethod>,
        has_sale: bool,
    ) -> SeatingSnapshot {
        SeatingSnapshot {
            table_id: TableId::parse(table).unwrap(),
            history_lines,
            latest_method,
            has_sale,
        }
    }

    #[test]
    fn test_classification() {
        let waiting = classify(&snapshot("1", 2, Some(PaymentMethod::QrCode), true)).unwrap();
        assert_eq!(waiting.state, CashierState::AwaitingPayment);
        assert_eq!(waiting.method, Some(PaymentMethod::QrCode));

        let not_ready = classify(&snapshot("2", 1, None, false)).unwrap();
        assert_eq!(not_ready.state, CashierState::NotReady);
        assert_eq!(not_ready.method, None);

        let fresh = classify(&snapshot("3", 0, None, false)).unwrap();
        assert_eq!(fresh.state, CashierState::Unsettled);

        assert!(classify(&snapshot("4", 0, Some(PaymentMethod::Cash), true)).is_none());
    }

    #[test]
    fn test_board_is_sorted_regardless_of_arrival_order() {
        let board = build_board(vec![
            snapshot("10", 1, Some(PaymentMethod::Cash), false),
            snapshot("patio", 0, None, false),
            snapshot("2", 0, None, false),
            snapshot("9", 0, None, true),
        ]);

        let tables: Vec<&str> = board.iter().map(|e| e.table_id.as_str()).collect();
        assert_eq!(tables, ["2", "10", "patio"]);
    }
}
