//! # Sale Repository
//!
//! Settlement and the immutable sale records it produces.
//!
//! ## Settlement (one transaction)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │   1. DELETE history_lines for table RETURNING rows                      │
//! │        (claims the served lines and takes the write lock in one step)   │
//! │        └── no rows? → ROLLBACK, report nothing to settle                │
//! │   2. SettlementQuote::from_lines (sushi-core)                           │
//! │   3. INSERT sales        (UUID + receipt number YYYYMMDD-T<table>-NNNN) │
//! │   4. INSERT sale_items   (one per history line, frozen snapshot)        │
//! │   5. DELETE payment_selections for table                                │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Because the history is deleted in the same transaction that writes the
//! sale, a retried settlement after success finds no history and cannot
//! charge the table twice. A failure before COMMIT leaves everything as it
//! was.

use chrono::{SubsecRound, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::history::HISTORY_COLUMNS;
use sushi_core::settlement::{receipt_number, receipt_prefix};
use sushi_core::{
    HistoryLine, PaymentMethod, SaleLineItem, SaleRecord, SettlementQuote, SurchargeRate, TableId,
};

const SALE_COLUMNS: &str = "id, receipt_number, table_id, subtotal_cents, surcharge_cents, \
                            total_cents, surcharge_bps, payment_method, paid_at";

const SALE_ITEM_COLUMNS: &str =
    "id, sale_id, line_no, item_id, name, quantity, unit_price_cents, line_total_cents";

/// Repository for settlement and sale records.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Settles a seating's served history into a sale.
    ///
    /// ## Returns
    /// * `Some(sale)` - The sale with its line items
    /// * `None` - The seating has no history; nothing was written
    pub async fn settle(
        &self,
        table_id: &TableId,
        method: &PaymentMethod,
        rate: SurchargeRate,
    ) -> DbResult<Option<SaleRecord>> {
        let paid_at = Utc::now().trunc_subsecs(0);
        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        let claim = format!("DELETE FROM history_lines WHERE table_id = ?1 RETURNING {HISTORY_COLUMNS}");
        let mut lines = sqlx::query_as::<_, HistoryLine>(&claim)
            .bind(table_id.as_str())
            .fetch_all(&mut *tx)
            .await?;

        if lines.is_empty() {
            debug!(table_id = %table_id, "Settlement requested with no served items");
            return Ok(None);
        }
        lines.sort_by_key(|line| line.id);

        let quote = SettlementQuote::from_lines(&lines, rate);

        // The tail after the prefix must be all digits, so table "1" does
        // not count receipts of table "1-2".
        let prefix = receipt_prefix(paid_at, table_id);
        let earlier_today: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM sales
            WHERE substr(receipt_number, 1, length(?1)) = ?1
              AND substr(receipt_number, length(?1) + 1) NOT GLOB '*[^0-9]*'
            "#,
        )
        .bind(&prefix)
        .fetch_one(&mut *tx)
        .await?;

        let sale_id = Uuid::new_v4().to_string();
        let receipt = receipt_number(paid_at, table_id, earlier_today + 1);

        debug!(sale_id = %sale_id, receipt_number = %receipt, "Inserting sale");

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, receipt_number, table_id,
                subtotal_cents, surcharge_cents, total_cents, surcharge_bps,
                payment_method, paid_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&sale_id)
        .bind(&receipt)
        .bind(table_id.as_str())
        .bind(quote.subtotal.cents())
        .bind(quote.surcharge.cents())
        .bind(quote.total.cents())
        .bind(rate.bps() as i64)
        .bind(method.as_str())
        .bind(paid_at)
        .execute(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(lines.len());
        for (index, line) in lines.iter().enumerate() {
            let item = SaleLineItem {
                id: Uuid::new_v4().to_string(),
                sale_id: sale_id.clone(),
                line_no: index as i64 + 1,
                item_id: line.item_id.clone(),
                name: line.name.clone(),
                quantity: line.quantity,
                unit_price_cents: line.price_cents,
                line_total_cents: line.line_total().cents(),
            };

            sqlx::query(
                r#"
                INSERT INTO sale_items (
                    id, sale_id, line_no, item_id, name,
                    quantity, unit_price_cents, line_total_cents
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(&item.id)
            .bind(&item.sale_id)
            .bind(item.line_no)
            .bind(&item.item_id)
            .bind(&item.name)
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .bind(item.line_total_cents)
            .execute(&mut *tx)
            .await?;

            items.push(item);
        }

        let cleared = sqlx::query("DELETE FROM payment_selections WHERE table_id = ?1")
            .bind(table_id.as_str())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await.map_err(DbError::transaction)?;

        info!(
            table_id = %table_id,
            sale_id = %sale_id,
            receipt_number = %receipt,
            total_cents = quote.total.cents(),
            lines = items.len(),
            selections_cleared = cleared,
            "Seating settled"
        );

        Ok(Some(SaleRecord {
            id: sale_id,
            receipt_number: receipt,
            table_id: table_id.clone(),
            subtotal_cents: quote.subtotal.cents(),
            surcharge_cents: quote.surcharge.cents(),
            total_cents: quote.total.cents(),
            surcharge_bps: rate.bps() as i64,
            payment_method: method.clone(),
            paid_at,
            items,
        }))
    }

    /// Gets a sale with its line items.
    pub async fn get(&self, sale_id: &str) -> DbResult<Option<SaleRecord>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1");

        let sale = sqlx::query_as::<_, SaleRecord>(&sql)
            .bind(sale_id)
            .fetch_optional(&self.pool)
            .await?;

        match sale {
            Some(mut sale) => {
                sale.items = self.items(&sale.id).await?;
                Ok(Some(sale))
            }
            None => Ok(None),
        }
    }

    /// Line items of a sale, in line order.
    pub async fn items(&self, sale_id: &str) -> DbResult<Vec<SaleLineItem>> {
        let sql = format!(
            "SELECT {SALE_ITEM_COLUMNS} FROM sale_items WHERE sale_id = ?1 ORDER BY line_no"
        );

        let items = sqlx::query_as::<_, SaleLineItem>(&sql)
            .bind(sale_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// All sales, newest first. Line items are not loaded.
    pub async fn list(&self) -> DbResult<Vec<SaleRecord>> {
        let sql = format!(
            "SELECT {SALE_COLUMNS} FROM sales ORDER BY paid_at DESC, receipt_number DESC"
        );

        let sales = sqlx::query_as::<_, SaleRecord>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }
}
