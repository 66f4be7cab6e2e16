//! # Settlement Arithmetic
//!
//! Turns a seating's served lines into the amounts written on a sale.
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  History lines                                                          │
//! │    Salmon   100.00 × 2 = 200.00                                         │
//! │    Tamago    50.00 × 1 =  50.00                                         │
//! │                         ───────                                         │
//! │  Subtotal                 250.00                                        │
//! │  Surcharge 17%             42.50   round half away from zero            │
//! │                         ───────                                         │
//! │  Total                    292.50                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The same quote backs the checkout preview and the settlement itself, so
//! the guest is always charged what the bill showed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{Money, SurchargeRate};
use crate::types::{HistoryLine, TableId};

// =============================================================================
// Settlement Quote
// =============================================================================

/// Amounts for a set of served lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SettlementQuote {
    pub subtotal: Money,
    pub surcharge: Money,
    pub total: Money,
    pub surcharge_rate: SurchargeRate,
    /// Number of history lines.
    pub line_count: usize,
    /// Sum of quantities across lines.
    pub item_count: i64,
}

impl SettlementQuote {
    /// Quotes arbitrary (unit price, quantity) pairs.
    pub fn from_amounts<I>(amounts: I, rate: SurchargeRate) -> Self
    where
        I: IntoIterator<Item = (Money, i64)>,
    {
        let mut subtotal = Money::zero();
        let mut line_count = 0;
        let mut item_count = 0;

        for (unit_price, quantity) in amounts {
            subtotal += unit_price.multiply_quantity(quantity);
            line_count += 1;
            item_count += quantity;
        }

        let surcharge = subtotal.surcharge(rate);

        SettlementQuote {
            subtotal,
            surcharge,
            total: subtotal + surcharge,
            surcharge_rate: rate,
            line_count,
            item_count,
        }
    }

    /// Quotes a seating's history lines.
    pub fn from_lines(lines: &[HistoryLine], rate: SurchargeRate) -> Self {
        Self::from_amounts(
            lines.iter().map(|line| (line.unit_price(), line.quantity)),
            rate,
        )
    }

    /// Zero quote (nothing served).
    pub fn empty(rate: SurchargeRate) -> Self {
        Self::from_amounts(std::iter::empty(), rate)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.line_count == 0
    }
}

// =============================================================================
// Receipt Number
// =============================================================================

/// Builds the human-readable receipt number: `YYYYMMDD-T<table>-NNNN`.
///
/// `sequence` is the 1-based count of sales for that table on that day.
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use sushi_core::{settlement::receipt_number, TableId};
///
/// let paid_at = Utc.with_ymd_and_hms(2024, 3, 9, 19, 30, 0).unwrap();
/// let table = TableId::parse("12").unwrap();
/// assert_eq!(receipt_number(paid_at, &table, 3), "20240309-T12-0003");
/// ```
pub fn receipt_number(paid_at: DateTime<Utc>, table_id: &TableId, sequence: i64) -> String {
    format!(
        "{}-T{}-{:04}",
        paid_at.format("%Y%m%d"),
        table_id.as_str(),
        sequence
    )
}

/// Prefix shared by every receipt for a table on a given day.
pub fn receipt_prefix(paid_at: DateTime<Utc>, table_id: &TableId) -> String {
    format!("{}-T{}-", paid_at.format("%Y%m%d"), table_id.as_str())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::TicketStatus;
    use chrono::TimeZone;

    fn line(item: &str, price_cents: i64, quantity: i64) -> HistoryLine {
        HistoryLine {
            id: 0,
            ticket_id: 0,
            table_id: TableId::parse("1").unwrap(),
            item_id: item.to_string(),
            name: item.to_string(),
            price_cents,
            quantity,
            status: TicketStatus::Done,
            served_at: Utc::now(),
        }
    }

    #[test]
    fn test_quote_for_served_lines() {
        let lines = vec![line("salmon", 10_000, 2), line("tamago", 5_000, 1)];
        let quote = SettlementQuote::from_lines(&lines, SurchargeRate::default());

        assert_eq!(quote.subtotal.cents(), 25_000);
        assert_eq!(quote.surcharge.cents(), 4_250);
        assert_eq!(quote.total.cents(), 29_250);
        assert_eq!(quote.line_count, 2);
        assert_eq!(quote.item_count, 3);
        assert_eq!(quote.total.to_string(), "292.50");
    }

    #[test]
    fn test_quote_rounds_fractional_surcharge() {
        // 33.33 × 1.17 = 38.9961 → 39.00
        let lines = vec![line("ebi", 3_333, 1)];
        let quote = SettlementQuote::from_lines(&lines, SurchargeRate::default());
        assert_eq!(quote.total.cents(), 3_900);
    }

    #[test]
    fn test_empty_quote() {
        let quote = SettlementQuote::empty(SurchargeRate::default());
        assert!(quote.is_empty());
        assert!(quote.total.is_zero());
        assert_eq!(quote.item_count, 0);
    }

    #[test]
    fn test_receipt_number_format() {
        let paid_at = Utc.with_ymd_and_hms(2025, 12, 1, 8, 0, 0).unwrap();
        let table = TableId::parse("bar").unwrap();
        assert_eq!(receipt_number(paid_at, &table, 12), "20251201-Tbar-0012");
        assert_eq!(receipt_prefix(paid_at, &table), "20251201-Tbar-");
    }
}
