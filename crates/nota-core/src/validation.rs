//! # Validation Module
//!
//! Field-level validation applied at the store boundary, before any row is
//! written. The transport layer repeats cheap checks for fast feedback; the
//! database adds NOT NULL and UNIQUE constraints underneath. Derived
//! arithmetic (line subtotals, totals) is never validated here - it is
//! recomputed, not accepted.

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::types::{NewStoreProfile, NewTransaction, NewTransactionItem, TransactionItemPatch};

// =============================================================================
// Field Validators
// =============================================================================

/// Validates that a text field is non-empty after trimming.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// Deliberately loose: one `@` with non-empty local part and a domain
/// containing a dot. Deliverability is not our problem.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    validate_required("email", email)?;

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must look like name@domain.tld".to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.is_empty() || !domain.contains('.') || domain.contains('@') {
        return Err(invalid());
    }

    Ok(())
}

/// Validates an item quantity: strictly positive.
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates a monetary field that must be zero or greater
/// (unit price, discount, service value).
pub fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Input Validators
// =============================================================================

/// Validates a store profile creation input.
pub fn validate_new_store_profile(input: &NewStoreProfile) -> ValidationResult<()> {
    validate_required("name", &input.name)?;
    validate_required("address", &input.address)?;
    validate_required("phone", &input.phone)?;
    validate_email(&input.email)?;
    validate_required("npwp", &input.npwp)?;
    Ok(())
}

/// Validates a transaction creation input.
///
/// The counterparty NPWP stays optional here even when a tax toggle is on;
/// requiring it is a presentation-layer concern.
pub fn validate_new_transaction(input: &NewTransaction) -> ValidationResult<()> {
    validate_required("transaction_id", &input.transaction_id)?;
    validate_required("school_name", &input.school_name)?;
    validate_required("school_address", &input.school_address)?;
    validate_required("treasurer_name", &input.treasurer_name)?;
    validate_required("courier_name", &input.courier_name)?;
    if let Some(cents) = input.service_value_cents {
        validate_non_negative("service_value", Money::from_cents(cents))?;
    }
    Ok(())
}

/// Validates a line item creation input.
pub fn validate_new_item(input: &NewTransactionItem) -> ValidationResult<()> {
    validate_required("item_code", &input.item_code)?;
    validate_required("item_name", &input.item_name)?;
    validate_quantity(input.quantity)?;
    validate_non_negative("unit_price", Money::from_cents(input.unit_price_cents))?;
    validate_non_negative("discount", Money::from_cents(input.discount_cents))?;
    Ok(())
}

/// Validates the supplied fields of a line item patch.
pub fn validate_item_patch(patch: &TransactionItemPatch) -> ValidationResult<()> {
    if let Some(ref code) = patch.item_code {
        validate_required("item_code", code)?;
    }
    if let Some(ref name) = patch.item_name {
        validate_required("item_name", name)?;
    }
    if let Some(quantity) = patch.quantity {
        validate_quantity(quantity)?;
    }
    if let Some(cents) = patch.unit_price_cents {
        validate_non_negative("unit_price", Money::from_cents(cents))?;
    }
    if let Some(cents) = patch.discount_cents {
        validate_non_negative("discount", Money::from_cents(cents))?;
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
    fn test_required() {
        assert!(validate_required("name", "Toko Sumber Ilmu").is_ok());
        assert!(validate_required("name", "").is_err());
        assert!(validate_required("name", "   ").is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("toko@sumberilmu.co.id").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("@missing-local.com").is_err());
        assert!(validate_email("name@nodot").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn test_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
    }

    #[test]
    fn test_non_negative() {
        assert!(validate_non_negative("discount", Money::zero()).is_ok());
        assert!(validate_non_negative("discount", Money::from_rupiah(100)).is_ok());
        assert!(validate_non_negative("discount", Money::from_rupiah(-1)).is_err());
    }

    #[test]
    fn test_new_item() {
        let mut input = NewTransactionItem {
            transaction_id: "t".into(),
            item_code: "BK-01".into(),
            item_name: "Buku Tulis".into(),
            quantity: 10,
            unit_price_cents: 1_500_000,
            discount_cents: 0,
        };
        assert!(validate_new_item(&input).is_ok());

        input.quantity = 0;
        assert!(validate_new_item(&input).is_err());
    }

    #[test]
    fn test_item_patch_checks_only_supplied_fields() {
        let patch = TransactionItemPatch {
            quantity: Some(5),
            ..Default::default()
        };
        assert!(validate_item_patch(&patch).is_ok());

        let patch = TransactionItemPatch {
            unit_price_cents: Some(-1),
            ..Default::default()
        };
        assert!(validate_item_patch(&patch).is_err());
    }
}
