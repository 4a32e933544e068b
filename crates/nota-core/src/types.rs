//! # Domain Types
//!
//! Core domain types for the Nota ledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌───────────────────┐    │
//! │  │  StoreProfile   │   │   Transaction    │   │  TransactionItem  │    │
//! │  │  ─────────────  │   │  ──────────────  │   │  ───────────────  │    │
//! │  │  id (UUID)      │   │  id (UUID)       │   │  id (UUID)        │    │
//! │  │  name, address  │   │  transaction_id  │   │  transaction_id   │    │
//! │  │  npwp           │   │  tax toggles     │   │  qty, unit_price  │    │
//! │  │  (zero-or-one)  │   │  derived totals  │   │  discount         │    │
//! │  └─────────────────┘   └──────────────────┘   └───────────────────┘    │
//! │                                                                         │
//! │  ┌─────────────────┐                                                    │
//! │  │    TaxRate      │   PPN = 1100 bps, PPh22 = 150 bps, PPh23 = 200    │
//! │  │    bps (u32)    │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Transactions carry two identifiers:
//! - `id`: UUID v4 - immutable, used for database relations
//! - `transaction_id`: caller-supplied business number, unique, shown on
//!   every printed document
//!
//! ## Derived Fields
//! The `*_cents` totals on [`Transaction`] and the `subtotal_cents` on
//! [`TransactionItem`] are persisted columns written only by the store's
//! single recomputation routine. Nothing else assigns them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000, so 1.5% (PPh22) is an exact integer 150
/// instead of a lossy float.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Value-added tax (PPN): 11% of the item subtotal.
    pub const PPN: TaxRate = TaxRate(1100);

    /// Withholding tax art. 22 (PPh22): 1.5% of the item subtotal.
    pub const PPH22: TaxRate = TaxRate(150);

    /// Withholding tax art. 23 (PPh23): 2% of the service value.
    pub const PPH23: TaxRate = TaxRate(200);

    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Store Profile
// =============================================================================

/// The store's identity record, printed on every document.
///
/// Zero-or-one per database: created once through the settings screen and
/// updated in place. Lookups return an `Option` and never assume existence.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StoreProfile {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Store name.
    pub name: String,

    /// Street address.
    pub address: String,

    /// Contact phone.
    pub phone: String,

    /// Contact email.
    pub email: String,

    /// The store's taxpayer identification number.
    pub npwp: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Input for creating the store profile. All fields required non-empty;
/// email is format-checked.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewStoreProfile {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub npwp: String,
}

/// Partial update for the store profile. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StoreProfilePatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub npwp: Option<String>,
}

// =============================================================================
// Transaction
// =============================================================================

/// A sales transaction: the aggregate root owning its line items.
///
/// ## Derived Fields
/// `subtotal_cents`, the three `*_amount_cents` taxes, `total_amount_cents`
/// and `materai_required` are derived by the totals engine and persisted so
/// documents render from stored, stable numbers. They stay consistent with
/// the item set after every completed mutation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Transaction {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Caller-supplied business number, globally unique.
    pub transaction_id: String,

    /// Transaction date (printed on documents; list ordering key).
    #[ts(as = "String")]
    pub date: DateTime<Utc>,

    /// Counterparty: the purchasing school.
    pub school_name: String,
    pub school_address: String,

    /// The school's treasurer, who signs receipts.
    pub treasurer_name: String,

    /// Courier delivering the goods, who signs the handover report.
    pub courier_name: String,

    /// Free-text notes printed at the bottom of documents.
    pub additional_notes: Option<String>,

    /// Derived: sum of item subtotals, in sen.
    pub subtotal_cents: i64,

    /// Whether value-added tax applies.
    pub ppn_enabled: bool,
    /// Derived: PPN amount in sen (0 when disabled).
    pub ppn_amount_cents: i64,

    /// Whether withholding tax art. 22 applies.
    pub pph22_enabled: bool,
    /// Derived: PPh22 amount in sen (0 when disabled).
    pub pph22_amount_cents: i64,

    /// Whether withholding tax art. 23 applies.
    pub pph23_enabled: bool,
    /// Derived: PPh23 amount in sen (0 when disabled). Based on the
    /// service value, not the item subtotal.
    pub pph23_amount_cents: i64,

    /// Standalone service value in sen. Tax base for PPh23 and always
    /// added into the grand total when present.
    pub service_value_cents: Option<i64>,

    /// Kind of service rendered (only meaningful alongside PPh23).
    pub service_type: Option<String>,

    /// The school's taxpayer identification number.
    pub school_npwp: Option<String>,

    /// Derived: whether stamp duty is required (total >= Rp 5.000.000).
    pub materai_required: bool,

    /// Derived: grand total in sen.
    pub total_amount_cents: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    #[inline]
    pub fn ppn_amount(&self) -> Money {
        Money::from_cents(self.ppn_amount_cents)
    }

    #[inline]
    pub fn pph22_amount(&self) -> Money {
        Money::from_cents(self.pph22_amount_cents)
    }

    #[inline]
    pub fn pph23_amount(&self) -> Money {
        Money::from_cents(self.pph23_amount_cents)
    }

    /// The service value, or `None` when the transaction has none.
    #[inline]
    pub fn service_value(&self) -> Option<Money> {
        self.service_value_cents.map(Money::from_cents)
    }

    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }
}

/// Input for creating a transaction. Derived totals are not accepted from
/// callers; the store computes them.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewTransaction {
    pub transaction_id: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub school_name: String,
    pub school_address: String,
    pub treasurer_name: String,
    pub courier_name: String,
    pub additional_notes: Option<String>,
    #[serde(default)]
    pub ppn_enabled: bool,
    #[serde(default)]
    pub pph22_enabled: bool,
    #[serde(default)]
    pub pph23_enabled: bool,
    pub service_value_cents: Option<i64>,
    pub service_type: Option<String>,
    pub school_npwp: Option<String>,
}

/// Partial update for a transaction.
///
/// Outer `None` leaves the field untouched; for nullable columns,
/// `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub transaction_id: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub school_name: Option<String>,
    pub school_address: Option<String>,
    pub treasurer_name: Option<String>,
    pub courier_name: Option<String>,
    pub additional_notes: Option<Option<String>>,
    pub ppn_enabled: Option<bool>,
    pub pph22_enabled: Option<bool>,
    pub pph23_enabled: Option<bool>,
    pub service_value_cents: Option<Option<i64>>,
    pub service_type: Option<Option<String>>,
    pub school_npwp: Option<Option<String>>,
}

// =============================================================================
// Transaction Item
// =============================================================================

/// A line item owned by exactly one transaction.
///
/// `subtotal_cents` is derived: `quantity * unit_price - discount`. The
/// discount is a flat amount, not a percentage, and may exceed the gross
/// (the line then goes negative; the engine does not clamp).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct TransactionItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning transaction (UUID, not the business number).
    pub transaction_id: String,

    /// Catalog code of the item.
    pub item_code: String,

    /// Display name printed on documents.
    pub item_name: String,

    /// Quantity purchased (positive).
    pub quantity: i64,

    /// Unit price in sen (non-negative).
    pub unit_price_cents: i64,

    /// Flat discount in sen (non-negative).
    pub discount_cents: i64,

    /// Derived: quantity × unit price − discount, in sen.
    pub subtotal_cents: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl TransactionItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn discount(&self) -> Money {
        Money::from_cents(self.discount_cents)
    }

    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

/// Input for adding a line item to an existing transaction.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewTransactionItem {
    /// Owning transaction (UUID).
    pub transaction_id: String,
    pub item_code: String,
    pub item_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    #[serde(default)]
    pub discount_cents: i64,
}

/// Partial update for a line item. `None` fields keep their current value;
/// the line subtotal is always recomputed from the merged result.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TransactionItemPatch {
    pub item_code: Option<String>,
    pub item_name: Option<String>,
    pub quantity: Option<i64>,
    pub unit_price_cents: Option<i64>,
    pub discount_cents: Option<i64>,
}

// =============================================================================
// Composite Views
// =============================================================================

/// A transaction together with its items, as returned by detail queries
/// and consumed by document rendering.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TransactionWithItems {
    pub transaction: Transaction,
    pub items: Vec<TransactionItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_constants() {
        assert_eq!(TaxRate::PPN.bps(), 1100);
        assert_eq!(TaxRate::PPH22.bps(), 150);
        assert_eq!(TaxRate::PPH23.bps(), 200);
        assert_eq!(TaxRate::PPN.percentage(), 11.0);
    }

    #[test]
    fn test_new_transaction_toggle_defaults() {
        // Missing toggles deserialize as false
        let json = r#"{
            "transaction_id": "TRX-001",
            "date": "2024-05-01T00:00:00Z",
            "school_name": "SDN 1 Menteng",
            "school_address": "Jl. Besuki No. 4",
            "treasurer_name": "Ibu Sari",
            "courier_name": "Pak Budi",
            "additional_notes": null,
            "service_value_cents": null,
            "service_type": null,
            "school_npwp": null
        }"#;
        let input: NewTransaction = serde_json::from_str(json).unwrap();
        assert!(!input.ppn_enabled);
        assert!(!input.pph22_enabled);
        assert!(!input.pph23_enabled);
    }

    #[test]
    fn test_money_accessors() {
        let item = TransactionItem {
            id: "i".into(),
            transaction_id: "t".into(),
            item_code: "BK-01".into(),
            item_name: "Buku Tulis".into(),
            quantity: 10,
            unit_price_cents: 1_500_000,
            discount_cents: 50_000,
            subtotal_cents: 14_950_000,
            created_at: Utc::now(),
        };
        assert_eq!(item.unit_price(), Money::from_rupiah(15_000));
        assert_eq!(item.subtotal(), Money::from_rupiah(149_500));
    }
}
