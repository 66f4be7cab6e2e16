//! # Repository Module
//!
//! Database repository implementations for Sushi POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  OrderEngine (sushi-engine)                                             │
//! │       │                                                                 │
//! │       │  db.carts().add_item(&table, "salmon", "Salmon", 4000, 5)       │
//! │       ▼                                                                 │
//! │  CartRepository                                                         │
//! │  ├── add_item(...)        → Option<CartLine>   (None = cap reached)     │
//! │  ├── update_quantity(...) → rows affected                               │
//! │  └── list(...)            → Vec<CartLine>                               │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! │  Repositories report outcomes (Option, counts), never business          │
//! │  errors. The engine turns outcomes into CoreError.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`SeatingRepository`](seating::SeatingRepository) - Seating registry and cashier snapshots
//! - [`CartRepository`](cart::CartRepository) - Per-seating carts with the distinct-item cap
//! - [`KitchenRepository`](kitchen::KitchenRepository) - Queue, confirm, status transitions
//! - [`HistoryRepository`](history::HistoryRepository) - Served, unsettled lines
//! - [`PaymentRepository`](payment::PaymentRepository) - Pending payment selections
//! - [`SaleRepository`](sale::SaleRepository) - Settlement and sale records

pub mod cart;
pub mod history;
pub mod kitchen;
pub mod payment;
pub mod sale;
pub mod seating;
