//! # sushi-engine: Order Lifecycle & Settlement Engine
//!
//! The entry point for the presentation layer (guest tablet pages, kitchen
//! screen, cashier screen). It wires [`sushi_core`] rules to [`sushi_db`]
//! storage and exposes one [`OrderEngine`] method per operation.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Guest / Kitchen / Cashier pages (not in this workspace)                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                  sushi-engine (THIS CRATE)                      │    │
//! │  │                                                                 │    │
//! │  │   OrderEngine ──► validate ──► sushi-db ──► outcome ──► result  │    │
//! │  │                                                                 │    │
//! │  │   EngineConfig    EngineError / ErrorResponse    init_tracing   │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  sushi-core (rules, money)          sushi-db (SQLite, transactions)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use sushi_engine::{init_tracing, EngineConfig, OrderEngine};
//!
//! let config = EngineConfig::load(None)?;
//! init_tracing(&config.log_filter);
//!
//! let engine = OrderEngine::new(&config).await?;
//! engine.add_item("4", "salmon", "Salmon Nigiri", 4_000).await?;
//! engine.confirm_order("4").await?;
//! let sale = engine.settle("4", "cash").await?;
//! println!("{} {}", sale.receipt_number, sale.total());
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod logging;

pub use config::{ConfigError, EngineConfig};
pub use engine::OrderEngine;
pub use error::{EngineError, EngineResult, ErrorCode, ErrorResponse};
pub use logging::init_tracing;

// The presentation layer only needs this crate
pub use sushi_core;
