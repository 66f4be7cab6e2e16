//! # Order Engine
//!
//! The façade the presentation layer calls. One method per logical
//! operation; every method takes raw caller input, validates it, runs the
//! store operation and maps the outcome to [`EngineError`].
//!
//! ## Item Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Where a dish lives                                   │
//! │                                                                         │
//! │  ┌──────────┐  confirm   ┌──────────────┐  done    ┌──────────────┐     │
//! │  │   Cart   │──────────► │ Kitchen queue│────────► │   (gone)     │     │
//! │  │ per table│            │   global     │  cancel  │              │     │
//! │  └──────────┘            └──────┬───────┘────────► └──────────────┘     │
//! │   add_item                      │ mirrored                              │
//! │   update_quantity               ▼                                       │
//! │   remove_item            ┌──────────────┐  settle  ┌──────────────┐     │
//! │                          │   History    │────────► │  SaleRecord  │     │
//! │                          │  per table   │          │  + items     │     │
//! │                          └──────────────┘          └──────────────┘     │
//! │                                                                         │
//! │  cancel deletes the history mirror; done keeps it until settlement.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Submodules
//! - `cart` - add / update / remove / list
//! - `kitchen` - confirm, status transitions, queue
//! - `checkout` - payment selection, bill preview, settlement, sales
//! - `cashier` - the cashier board

mod cart;
mod cashier;
mod checkout;
mod kitchen;

use tracing::{debug, info};

use sushi_core::validation::{validate_item_cap, validate_surcharge_bps, validate_table_id};
use sushi_core::{Seating, SurchargeRate, TableId};
use sushi_db::Database;

use crate::config::EngineConfig;
use crate::error::EngineResult;

/// Order lifecycle and settlement engine.
///
/// Cheap to clone; clones share the connection pool.
///
/// ## Usage
/// ```rust,ignore
/// let engine = OrderEngine::new(&EngineConfig::load(None)?).await?;
/// engine.add_item("4", "salmon", "Salmon Nigiri", 4_000).await?;
/// engine.confirm_order("4").await?;
/// ```
#[derive(Debug, Clone)]
pub struct OrderEngine {
    db: Database,
    item_cap: usize,
    surcharge: SurchargeRate,
}

impl OrderEngine {
    /// Opens the store described by `config` and builds an engine on it.
    pub async fn new(config: &EngineConfig) -> EngineResult<Self> {
        let db = Database::new(config.to_db_config()).await?;
        Self::from_database(db, config.distinct_item_cap, config.surcharge_rate())
    }

    /// Builds an engine on an already open database.
    pub fn from_database(
        db: Database,
        item_cap: usize,
        surcharge: SurchargeRate,
    ) -> EngineResult<Self> {
        validate_item_cap(item_cap)?;
        validate_surcharge_bps(surcharge.bps())?;

        info!(
            item_cap,
            surcharge_bps = surcharge.bps(),
            "Order engine ready"
        );

        Ok(OrderEngine {
            db,
            item_cap,
            surcharge,
        })
    }

    /// The underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn item_cap(&self) -> usize {
        self.item_cap
    }

    pub fn surcharge(&self) -> SurchargeRate {
        self.surcharge
    }

    // =========================================================================
    // Seating Registry
    // =========================================================================

    /// Registers a seating if it has not been seen before. Idempotent.
    ///
    /// Cart and kitchen operations call this themselves; calling it
    /// directly is only needed to make a table show up on the cashier
    /// board before anything is ordered.
    ///
    /// ## Returns
    /// The validated table id.
    pub async fn ensure_partitions(&self, table_id: &str) -> EngineResult<TableId> {
        let table_id = validate_table_id(table_id)?;
        let created = self.db.seatings().ensure(&table_id).await?;
        if created {
            info!(table_id = %table_id, "New seating registered");
        } else {
            debug!(table_id = %table_id, "Seating already registered");
        }
        Ok(table_id)
    }

    /// Every seating the registry has seen, ordered by table.
    pub async fn list_seatings(&self) -> EngineResult<Vec<Seating>> {
        Ok(self.db.seatings().list().await?)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Engine on a fresh in-memory store with default rules.
    pub(crate) async fn engine() -> OrderEngine {
        OrderEngine::new(&EngineConfig::in_memory()).await.unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::engine;
    use super::*;
    use crate::error::{EngineError, ErrorCode};
    use sushi_db::DbConfig;

    #[tokio::test]
    async fn test_ensure_partitions_is_idempotent() {
        let engine = engine().await;

        let first = engine.ensure_partitions(" 7 ").await.unwrap();
        let second = engine.ensure_partitions("7").await.unwrap();
        assert_eq!(first, second);

        let seatings = engine.list_seatings().await.unwrap();
        assert_eq!(seatings.len(), 1);
        assert_eq!(seatings[0].table_id.as_str(), "7");
    }

    #[tokio::test]
    async fn test_seatings_sorted_numerically() {
        let engine = engine().await;
        for table in ["10", "2", "1"] {
            engine.ensure_partitions(table).await.unwrap();
        }

        let tables: Vec<String> = engine
            .list_seatings()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.table_id.to_string())
            .collect();
        assert_eq!(tables, vec!["1", "2", "10"]);
    }

    #[tokio::test]
    async fn test_blank_table_rejected() {
        let engine = engine().await;
        let err = engine.ensure_partitions("   ").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_zero_cap_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let result = OrderEngine::from_database(db, 0, SurchargeRate::default());
        assert!(matches!(result, Err(EngineError::Core(_))));
    }
}
