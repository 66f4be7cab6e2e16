//! # Checkout Operations
//!
//! Payment selection, bill preview, settlement and the sales ledger.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Guest                              Cashier                             │
//! │  ─────                              ───────                             │
//! │  preview_bill("4")                                                      │
//! │    subtotal 250.00, +17% = 292.50                                       │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  select_method("4", "qr_code")                                          │
//! │    self_service = true ──► settle("4", "qr_code")                       │
//! │                                                                         │
//! │  select_method("4", "cash")                                             │
//! │    self_service = false ─────────► cashier_board() shows table 4        │
//! │                                    settle_at_counter("4")               │
//! │                                                                         │
//! │  settle: one transaction                                                │
//! │    claim history ─► sale + items ─► clear selections ─► commit          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use sushi_core::validation::{validate_label, validate_table_id};
use sushi_core::{
    Bill, CoreError, HistoryLine, PaymentMethod, SaleLineItem, SaleRecord, SelectedMethod,
    SelectionOutcome, SettlementQuote,
};

use super::OrderEngine;
use crate::error::EngineResult;

impl OrderEngine {
    // =========================================================================
    // Payment Selection
    // =========================================================================

    /// Records the guest's payment channel. Every call appends a row; the
    /// newest one wins.
    pub async fn select_method(&self, table_id: &str, method: &str) -> EngineResult<SelectionOutcome> {
        let table_id = validate_table_id(table_id)?;
        validate_label("payment_method", method)?;
        let method = PaymentMethod::from(method);

        let selection = self.db.payments().select(&table_id, &method).await?;
        let self_service = method.is_self_service();

        debug!(table_id = %table_id, method = %method, self_service, "Payment method selected");
        Ok(SelectionOutcome {
            selection,
            self_service,
        })
    }

    /// The newest pending selection, or `Unselected`.
    pub async fn latest_selection(&self, table_id: &str) -> EngineResult<SelectedMethod> {
        let table_id = validate_table_id(table_id)?;
        let latest = self.db.payments().latest(&table_id).await?;
        Ok(SelectedMethod::from(latest.map(|selection| selection.method)))
    }

    // =========================================================================
    // History & Bill
    // =========================================================================

    /// Confirmed, unsettled lines of a seating in confirmation order.
    pub async fn list_history(&self, table_id: &str) -> EngineResult<Vec<HistoryLine>> {
        let table_id = validate_table_id(table_id)?;
        Ok(self.db.history().list(&table_id).await?)
    }

    /// What settling now would charge. Writes nothing; an empty history
    /// gives an all-zero quote.
    pub async fn preview_bill(&self, table_id: &str) -> EngineResult<Bill> {
        let table_id = validate_table_id(table_id)?;
        let lines = self.db.history().list(&table_id).await?;
        let quote = SettlementQuote::from_lines(&lines, self.surcharge);

        Ok(Bill {
            table_id,
            lines,
            quote,
        })
    }

    // =========================================================================
    // Settlement
    // =========================================================================

    /// Turns the seating's history into a sale and clears the seating.
    ///
    /// ## Errors
    /// `NoServedItems` when the history is empty; nothing is written and
    /// pending selections are kept.
    pub async fn settle(&self, table_id: &str, method: &str) -> EngineResult<SaleRecord> {
        let table_id = validate_table_id(table_id)?;
        validate_label("payment_method", method)?;
        let method = PaymentMethod::from(method);

        let sale = self
            .db
            .sales()
            .settle(&table_id, &method, self.surcharge)
            .await?
            .ok_or_else(|| CoreError::NoServedItems {
                table_id: table_id.to_string(),
            })?;

        debug!(sale_id = %sale.id, total = %sale.total(), "Settlement returned");
        Ok(sale)
    }

    /// The cashier's "payment received" button: settles in cash.
    pub async fn settle_at_counter(&self, table_id: &str) -> EngineResult<SaleRecord> {
        self.settle(table_id, PaymentMethod::Cash.as_str()).await
    }

    // =========================================================================
    // Sales Ledger
    // =========================================================================

    /// All sales, newest first, without line items.
    pub async fn list_sales(&self) -> EngineResult<Vec<SaleRecord>> {
        Ok(self.db.sales().list().await?)
    }

    /// One sale with its line items.
    pub async fn get_sale(&self, sale_id: &str) -> EngineResult<SaleRecord> {
        Ok(self
            .db
            .sales()
            .get(sale_id)
            .await?
            .ok_or_else(|| CoreError::SaleNotFound(sale_id.to_string()))?)
    }

    /// Line items of a sale in line order.
    pub async fn list_sale_items(&self, sale_id: &str) -> EngineResult<Vec<SaleLineItem>> {
        // Distinguish "no such sale" from a sale with no lines
        let sale = self.get_sale(sale_id).await?;
        Ok(sale.items)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::engine;
    use crate::error::ErrorCode;
    use super::super::OrderEngine;
    use sushi_core::validation::{MAX_PRICE_CENTS, MAX_QUANTITY};
    use sushi_core::{PaymentMethod, SelectedMethod};

    /// Two plates at 100.00 and one at 50.00, confirmed and served.
    async fn served_table(engine: &OrderEngine, table: &str) {
        engine.add_item(table, "toro", "Otoro", 10_000).await.unwrap();
        engine.add_item(table, "toro", "Otoro", 10_000).await.unwrap();
        engine.add_item(table, "ebi", "Ebi Nigiri", 5_000).await.unwrap();
        let tickets = engine.confirm_order(table).await.unwrap();
        for ticket in tickets {
            engine.update_status(ticket.id, "done").await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_settle_applies_surcharge_and_clears_table() {
        let engine = engine().await;
        served_table(&engine, "4").await;
        engine.select_method("4", "cash").await.unwrap();

        let sale = engine.settle("4", "card").await.unwrap();
        assert_eq!(sale.subtotal_cents, 25_000);
        assert_eq!(sale.total_cents, 29_250);
        assert_eq!(sale.total().to_string(), "292.50");
        assert_eq!(sale.payment_method, PaymentMethod::Card);
        assert_eq!(sale.items.len(), 2);
        assert_eq!(sale.items[0].line_total_cents, 20_000);
        assert!(sale.receipt_number.ends_with("-T4-0001"));

        assert!(engine.list_history("4").await.unwrap().is_empty());
        assert!(engine.list_cart("4").await.is_empty());
        assert_eq!(
            engine.latest_selection("4").await.unwrap(),
            SelectedMethod::Unselected
        );

        let sales = engine.list_sales().await.unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].id, sale.id);
    }

    #[tokio::test]
    async fn test_settle_without_history_writes_nothing() {
        let engine = engine().await;
        engine.select_method("4", "qr_code").await.unwrap();

        let err = engine.settle("4", "qr_code").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NoServedItems);
        assert_eq!(err.table_id(), Some("4"));

        assert!(engine.list_sales().await.unwrap().is_empty());
        assert_eq!(
            engine.latest_selection("4").await.unwrap(),
            SelectedMethod::Chosen(PaymentMethod::QrCode)
        );
    }

    #[tokio::test]
    async fn test_second_settle_does_not_double_charge() {
        let engine = engine().await;
        served_table(&engine, "4").await;

        engine.settle_at_counter("4").await.unwrap();
        let err = engine.settle_at_counter("4").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NoServedItems);
        assert_eq!(engine.list_sales().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_settle_keeps_cart() {
        let engine = engine().await;
        served_table(&engine, "4").await;
        engine.add_item("4", "tamago", "Tamago", 2_000).await.unwrap();

        engine.settle_at_counter("4").await.unwrap();
        assert_eq!(engine.list_cart("4").await.len(), 1);
    }

    #[tokio::test]
    async fn test_preview_matches_settlement() {
        let engine = engine().await;

        let empty = engine.preview_bill("4").await.unwrap();
        assert!(empty.quote.is_empty());
        assert_eq!(empty.quote.total.cents(), 0);

        served_table(&engine, "4").await;
        let bill = engine.preview_bill("4").await.unwrap();
        assert_eq!(bill.lines.len(), 2);
        assert_eq!(bill.quote.total.cents(), 29_250);

        let sale = engine.settle_at_counter("4").await.unwrap();
        assert_eq!(sale.total_cents, bill.quote.total.cents());
        assert_eq!(sale.surcharge_cents, bill.quote.surcharge.cents());
    }

    #[tokio::test]
    async fn test_selection_outcome() {
        let engine = engine().await;
        assert_eq!(
            engine.latest_selection("4").await.unwrap().to_string(),
            "unselected"
        );

        let outcome = engine.select_method("4", "QR Code").await.unwrap();
        assert!(outcome.self_service);

        let outcome = engine.select_method("4", "cash").await.unwrap();
        assert!(!outcome.self_service);
        assert_eq!(
            engine.latest_selection("4").await.unwrap(),
            SelectedMethod::Chosen(PaymentMethod::Cash)
        );

        let err = engine.select_method("4", "").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_get_sale() {
        let engine = engine().await;
        served_table(&engine, "4").await;
        let sale = engine.settle("4", "qr_code").await.unwrap();

        let loaded = engine.get_sale(&sale.id).await.unwrap();
        assert_eq!(loaded.receipt_number, sale.receipt_number);
        assert_eq!(loaded.items.len(), 2);
        assert_eq!(engine.list_sale_items(&sale.id).await.unwrap().len(), 2);

        let err = engine.get_sale("missing").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_receipt_numbers_count_per_table_and_day() {
        let engine = engine().await;
        served_table(&engine, "4").await;
        engine.settle_at_counter("4").await.unwrap();
        served_table(&engine, "4").await;
        let second = engine.settle_at_counter("4").await.unwrap();
        served_table(&engine, "5").await;
        let other = engine.settle_at_counter("5").await.unwrap();

        assert!(second.receipt_number.ends_with("-T4-0002"));
        assert!(other.receipt_number.ends_with("-T5-0001"));
    }

    #[tokio::test]
    async fn test_settle_at_price_and_quantity_ceiling() {
        let engine = engine().await;
        let line = engine.add_item("1", "gold", "Gold Plate", MAX_PRICE_CENTS).await.unwrap();
        engine.update_quantity("1", line.id, MAX_QUANTITY).await.unwrap();
        engine.confirm_order("1").await.unwrap();

        let sale = engine.settle("1", "cash").await.unwrap();
        assert_eq!(sale.subtotal_cents, 99_900_000_000);
        assert_eq!(sale.surcharge_cents, 16_983_000_000);
        assert_eq!(sale.total_cents, 116_883_000_000);
    }
}
