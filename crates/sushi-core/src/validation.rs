//! # Validation Module
//!
//! Input validation for values arriving from the menu, kitchen and cashier
//! screens.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation layer                                            │
//! │  └── Basic format checks, immediate feedback                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: OrderEngine (Rust)                                            │
//! │  └── THIS MODULE: table ids, item data, quantities                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── NOT NULL / CHECK constraints                                       │
//! │  └── UNIQUE (table_id, item_id) on the cart                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use sushi_core::validation::{validate_item_id, validate_price_cents};
//!
//! validate_item_id("salmon-nigiri").unwrap();
//! validate_price_cents(12_000).unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::TableId;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of a menu item reference.
pub const MAX_ITEM_ID_LEN: usize = 64;

/// Maximum length of a dish name.
pub const MAX_ITEM_NAME_LEN: usize = 200;

/// Maximum length of a free-text status or payment method.
pub const MAX_LABEL_LEN: usize = 50;

/// Highest unit price a dish can carry: 1,000,000.00.
pub const MAX_PRICE_CENTS: i64 = Money::from_major_minor(1_000_000, 0).cents();

/// Highest quantity one cart line can hold.
///
/// With [`MAX_PRICE_CENTS`] this keeps every line total and bill far
/// inside `i64`.
pub const MAX_QUANTITY: i64 = 999;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a table identifier. See [`TableId::parse`].
pub fn validate_table_id(raw: &str) -> ValidationResult<TableId> {
    TableId::parse(raw)
}

/// Validates a menu item reference.
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
///
/// ```rust
/// use sushi_core::validation::validate_item_id;
///
/// assert!(validate_item_id("17").is_ok());
/// assert!(validate_item_id("").is_err());
/// ```
pub fn validate_item_id(item_id: &str) -> ValidationResult<()> {
    let item_id = item_id.trim();

    if item_id.is_empty() {
        return Err(ValidationError::Required {
            field: "item_id".to_string(),
        });
    }

    if item_id.chars().count() > MAX_ITEM_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "item_id".to_string(),
            max: MAX_ITEM_ID_LEN,
        });
    }

    Ok(())
}

/// Validates a dish name as shown in the cart, queue and receipt.
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_ITEM_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_ITEM_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a free-text label (kitchen status or payment method).
pub fn validate_label(field: &str, label: &str) -> ValidationResult<()> {
    let label = label.trim();

    if label.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if label.chars().count() > MAX_LABEL_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_LABEL_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit price in minor units.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (complimentary dishes)
/// - At most [`MAX_PRICE_CENTS`]
///
/// ```rust
/// use sushi_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// assert!(validate_price_cents(5_000_000_000_000_000_000).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a quantity set on an existing cart line.
///
/// Only positive quantities reach this check; zero or less means "remove
/// the line" and is handled before validation.
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if !(1..=MAX_QUANTITY).contains(&quantity) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a surcharge rate in basis points (0% to 100%).
pub fn validate_surcharge_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "surcharge_bps".to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

/// Validates a distinct-item cap.
pub fn validate_item_cap(cap: usize) -> ValidationResult<()> {
    if cap == 0 {
        return Err(ValidationError::MustBePositive {
            field: "distinct_item_cap".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_table_id() {
        assert_eq!(validate_table_id(" 4 ").unwrap().as_str(), "4");
        assert!(validate_table_id("").is_err());
    }

    #[test]
    fn test_validate_item_id() {
        assert!(validate_item_id("salmon").is_ok());
        assert!(validate_item_id("   ").is_err());
        assert!(validate_item_id(&"x".repeat(MAX_ITEM_ID_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_item_name() {
        assert!(validate_item_name("Salmon Nigiri").is_ok());
        assert!(validate_item_name("ซูชิแซลมอน").is_ok());
        assert!(validate_item_name("").is_err());
        assert!(validate_item_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_label() {
        assert!(validate_label("status", "plating").is_ok());
        let err = validate_label("status", " ").unwrap_err();
        assert_eq!(err.to_string(), "status is required");
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(12_000).is_ok());
        assert!(validate_price_cents(-1).is_err());
        assert!(validate_price_cents(MAX_PRICE_CENTS).is_ok());
        assert!(validate_price_cents(MAX_PRICE_CENTS + 1).is_err());
        assert_eq!(MAX_PRICE_CENTS, 100_000_000);
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_QUANTITY).is_ok());
        assert!(validate_quantity(0).is_err());
        let err = validate_quantity(MAX_QUANTITY + 1).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::OutOfRange { max: MAX_QUANTITY, .. }
        ));
    }

    #[test]
    fn test_largest_bill_stays_in_range() {
        // Every distinct dish at the ceiling, at the highest quantity
        let line = Money::from_cents(MAX_PRICE_CENTS).multiply_quantity(MAX_QUANTITY);
        let bill = line * crate::DEFAULT_DISTINCT_ITEM_CAP as i64;
        let total = bill.with_surcharge(crate::money::SurchargeRate::from_bps(10_000));
        assert_eq!(total.cents(), 999_000_000_000);
    }

    #[test]
    fn test_validate_config_values() {
        assert!(validate_surcharge_bps(1700).is_ok());
        assert!(validate_surcharge_bps(10_000).is_ok());
        assert!(validate_surcharge_bps(10_001).is_err());
        assert!(validate_item_cap(5).is_ok());
        assert!(validate_item_cap(0).is_err());
    }
}
