//! # sushi-db: Database Layer for Sushi POS
//!
//! This crate provides database access for the order lifecycle.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Sushi POS Data Flow                              │
//! │                                                                         │
//! │  OrderEngine::confirm_order(table)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                     sushi-db (THIS CRATE)                       │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐    │    │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │    │    │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │    │    │
//! │  │   │               │    │ SeatingRepo   │    │              │    │    │
//! │  │   │ SqlitePool    │◄───│ CartRepo      │    │ 001_initial_ │    │    │
//! │  │   │ WAL, FK,      │    │ KitchenRepo   │    │   schema.sql │    │    │
//! │  │   │ busy timeout  │    │ HistoryRepo   │    │              │    │    │
//! │  │   │               │    │ PaymentRepo   │    │              │    │    │
//! │  │   │               │    │ SaleRepo      │    │              │    │    │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘    │    │
//! │  │                                                                 │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                     SQLite Database (sushi.db)                  │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sushi_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("sushi.db")).await?;
//! let line = db.carts().add_item(&table, "salmon", "Salmon", 4_000, 5).await?;
//! let tickets = db.kitchen().confirm_order(&table).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::cart::CartRepository;
pub use repository::history::HistoryRepository;
pub use repository::kitchen::KitchenRepository;
pub use repository::payment::PaymentRepository;
pub use repository::sale::SaleRepository;
pub use repository::seating::SeatingRepository;
