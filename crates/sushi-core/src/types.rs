//! # Domain Types
//!
//! Core domain types used throughout Sushi POS.
//!
//! ## Where a Line Item Lives
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Order Lifecycle                                    │
//! │                                                                         │
//! │  ┌─────────────┐ confirm ┌───────────────┐                              │
//! │  │  CartLine   │────────►│ KitchenTicket │ done/cancel → deleted        │
//! │  │ (per table) │    │    │   (global)    │                              │
//! │  └─────────────┘    │    └───────────────┘                              │
//! │                     │    ┌───────────────┐  settle  ┌──────────────┐    │
//! │                     └───►│  HistoryLine  │─────────►│  SaleRecord  │    │
//! │                          │  (per table)  │          │ SaleLineItem │    │
//! │                          └───────────────┘          └──────────────┘    │
//! │                                                                         │
//! │  PaymentSelection (per table) feeds the cashier board and is cleared    │
//! │  together with the history at settlement.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! - Cart lines, tickets, history lines and selections use integer row ids.
//! - Sales use a UUID v4 plus a human-readable receipt number.
//! - Seatings are keyed by the caller's table number (`TableId`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::settlement::SettlementQuote;
use crate::status::{PaymentMethod, TicketStatus};
use crate::MAX_TABLE_ID_LEN;

// =============================================================================
// Table Id
// =============================================================================

/// Opaque seating key supplied by the caller (usually a table number).
///
/// Not required to be numeric. Ordering is numeric-aware so that table "10"
/// sorts after table "9":
///
/// ```rust
/// use sushi_core::TableId;
///
/// let mut tables: Vec<TableId> = ["10", "9", "bar", "2"]
///     .iter()
///     .map(|t| TableId::parse(t).unwrap())
///     .collect();
/// tables.sort();
/// let order: Vec<&str> = tables.iter().map(|t| t.as_str()).collect();
/// assert_eq!(order, ["2", "9", "10", "bar"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(try_from = "String", into = "String")]
#[ts(export)]
pub struct TableId(String);

impl TableId {
    /// Validates and wraps a table identifier (trimmed, non-empty, bounded).
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Required {
                field: "table_id".to_string(),
            });
        }

        if trimmed.chars().count() > MAX_TABLE_ID_LEN {
            return Err(ValidationError::TooLong {
                field: "table_id".to_string(),
                max: MAX_TABLE_ID_LEN,
            });
        }

        if trimmed.chars().any(char::is_control) {
            return Err(ValidationError::InvalidFormat {
                field: "table_id".to_string(),
                reason: "must not contain control characters".to_string(),
            });
        }

        Ok(TableId(trimmed.to_string()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_numeric(&self) -> bool {
        self.0.bytes().all(|b| b.is_ascii_digit())
    }
}

impl Ord for TableId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_numeric(), other.is_numeric()) {
            (true, true) => {
                // Compare digit strings as numbers without parsing, so ids
                // longer than u64 still order correctly.
                let a = self.0.trim_start_matches('0');
                let b = other.0.trim_start_matches('0');
                a.len()
                    .cmp(&b.len())
                    .then_with(|| a.cmp(b))
                    .then_with(|| self.0.cmp(&other.0))
            }
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for TableId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl TryFrom<String> for TableId {
    type Error = ValidationError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        TableId::parse(&raw)
    }
}

impl TryFrom<&str> for TableId {
    type Error = ValidationError;

    fn try_from(raw: &str) -> Result<Self, Self::Error> {
        TableId::parse(raw)
    }
}

impl From<TableId> for String {
    fn from(id: TableId) -> Self {
        id.0
    }
}

impl AsRef<str> for TableId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Seating
// =============================================================================

/// A table the registry has seen at least once.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Seating {
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub table_id: TableId,
    #[ts(as = "String")]
    pub first_seen_at: DateTime<Utc>,
    /// When the seating first sent an order to the kitchen.
    #[ts(as = "Option<String>")]
    pub first_confirmed_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Cart Line
// =============================================================================

/// An unconfirmed line in a seating's cart.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CartLine {
    pub id: i64,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub table_id: TableId,
    /// Menu item reference; unique within one cart.
    pub item_id: String,
    pub name: String,
    pub price_cents: i64,
    /// Always at least 1; zero means the line is deleted.
    pub quantity: i64,
    /// Carried over to the ticket on confirm. Always "preparing" in the cart.
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    #[ts(as = "String")]
    pub status: TicketStatus,
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Kitchen Ticket
// =============================================================================

/// One confirmed line waiting in the global kitchen queue.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct KitchenTicket {
    pub id: i64,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub table_id: TableId,
    pub item_id: String,
    pub name: String,
    pub price_cents: i64,
    pub quantity: i64,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    #[ts(as = "String")]
    pub status: TicketStatus,
    #[ts(as = "String")]
    pub queued_at: DateTime<Utc>,
}

// =============================================================================
// History Line
// =============================================================================

/// A confirmed line awaiting settlement; mirrors a kitchen ticket.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct HistoryLine {
    pub id: i64,
    /// Kitchen ticket this line mirrors. The ticket row is gone once done.
    pub ticket_id: i64,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub table_id: TableId,
    pub item_id: String,
    pub name: String,
    pub price_cents: i64,
    pub quantity: i64,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    #[ts(as = "String")]
    pub status: TicketStatus,
    /// Set at confirmation time.
    #[ts(as = "String")]
    pub served_at: DateTime<Utc>,
}

impl HistoryLine {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Payment Selection
// =============================================================================

/// A guest's payment channel choice, recorded before settlement.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PaymentSelection {
    pub id: i64,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub table_id: TableId,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    #[ts(as = "String")]
    pub method: PaymentMethod,
    #[ts(as = "String")]
    pub selected_at: DateTime<Utc>,
}

/// What the caller should do after a guest picks a payment channel.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SelectionOutcome {
    pub selection: PaymentSelection,
    /// True for QR code: the guest settles from the table right away.
    /// False means staff come to the table or the guest pays at the counter.
    pub self_service: bool,
}

// =============================================================================
// Sale Record
// =============================================================================

/// Immutable financial record written at settlement.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleRecord {
    /// UUID v4.
    pub id: String,
    /// `YYYYMMDD-T<table>-NNNN`, shown on the printed receipt.
    pub receipt_number: String,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub table_id: TableId,
    pub subtotal_cents: i64,
    pub surcharge_cents: i64,
    /// Surcharge-inclusive amount charged.
    pub total_cents: i64,
    /// Rate in effect when the sale was written.
    pub surcharge_bps: i64,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    #[ts(as = "String")]
    pub payment_method: PaymentMethod,
    /// Second precision.
    #[ts(as = "String")]
    pub paid_at: DateTime<Utc>,
    /// Loaded separately; empty in list views.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub items: Vec<SaleLineItem>,
}

impl SaleRecord {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Sale Line Item
// =============================================================================

/// A line of a sale, frozen from the history line it was settled from.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleLineItem {
    pub id: String,
    pub sale_id: String,
    /// Position within the sale, starting at 1.
    pub line_no: i64,
    pub item_id: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    /// unit_price × quantity.
    pub line_total_cents: i64,
}

// =============================================================================
// Bill Preview
// =============================================================================

/// Checkout view of a seating: what settling right now would charge.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Bill {
    pub table_id: TableId,
    pub lines: Vec<HistoryLine>,
    pub quote: SettlementQuote,
}

// =============================================================================
// Status Update Result
// =============================================================================

/// Outcome of applying a status to a kitchen ticket.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StatusUpdate {
    /// The ticket as it was before the update.
    pub ticket: KitchenTicket,
    #[ts(as = "String")]
    pub status: TicketStatus,
    /// Whether the ticket is still in the queue afterwards.
    pub still_queued: bool,
    /// History lines touched (deleted on cancel, relabelled otherwise).
    pub history_rows: u64,
}

// =============================================================================
// Cashier Board
// =============================================================================

/// Where a seating stands from the cashier's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CashierState {
    /// Served items and a chosen payment channel; ready to collect.
    AwaitingPayment,
    /// Served items but no payment channel chosen yet.
    NotReady,
    /// Nothing served and never settled.
    Unsettled,
}

/// One row of the cashier board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CashierEntry {
    pub table_id: TableId,
    pub state: CashierState,
    /// Latest pending method, only for `AwaitingPayment`.
    #[ts(as = "Option<String>")]
    pub method: Option<PaymentMethod>,
}

/// Per-seating facts the cashier board is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatingSnapshot {
    pub table_id: TableId,
    pub history_lines: i64,
    pub latest_method: Option<PaymentMethod>,
    pub has_sale: bool,
}

// =============================================================================
// Unit Tests
// =============================================================================
