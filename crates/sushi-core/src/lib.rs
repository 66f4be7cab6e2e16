//! # sushi-core: Pure Business Logic for Sushi POS
//!
//! This crate holds the rules of the order lifecycle as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Sushi POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Presentation layer (menu, kitchen, cashier)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 sushi-engine (OrderEngine)                      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ sushi-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ settlement │  │ validation│  │   │
//! │  │   │ CartLine  │  │   Money   │  │   Quote    │  │   rules   │  │   │
//! │  │   │ Ticket    │  │ Surcharge │  │  cashier   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    sushi-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (CartLine, KitchenTicket, SaleRecord, etc.)
//! - [`money`] - Money type with integer arithmetic and the surcharge rate
//! - [`status`] - Kitchen ticket statuses and what each one does to a ticket
//! - [`settlement`] - Bill arithmetic shared by checkout preview and settlement
//! - [`cashier`] - Deterministic cashier board aggregation
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use sushi_core::money::{Money, SurchargeRate};
//!
//! let subtotal = Money::from_cents(25_000); // 250.00
//! let total = subtotal.with_surcharge(SurchargeRate::default());
//!
//! // 250.00 × 1.17 = 292.50
//! assert_eq!(total.cents(), 29_250);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cashier;
pub mod error;
pub mod money;
pub mod settlement;
pub mod status;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, SurchargeRate};
pub use settlement::SettlementQuote;
pub use status::{PaymentMethod, SelectedMethod, StatusAction, TicketStatus};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of distinct menu items in one seating's cart.
///
/// ## Business Reason
/// Guests order in small rounds; once five different dishes are waiting in
/// the cart they must confirm the round before adding a sixth. Incrementing
/// a dish already in the cart is always allowed.
pub const DEFAULT_DISTINCT_ITEM_CAP: usize = 5;

/// Default surcharge applied at settlement, in basis points (17%).
pub const DEFAULT_SURCHARGE_BPS: u32 = 1700;

/// Maximum length of a table identifier.
pub const MAX_TABLE_ID_LEN: usize = 32;
