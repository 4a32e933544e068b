//! # Totals Engine
//!
//! The single recomputation routine that keeps a transaction's derived
//! fields consistent with its current items and tax toggles.
//!
//! ## Why One Routine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Recompute-On-Write Pattern                           │
//! │                                                                         │
//! │  item add ─────┐                                                        │
//! │  item update ──┤                                                        │
//! │  item delete ──┼──► read current items ──► compute_totals ──► persist  │
//! │  txn create ───┤         (the store)        (THIS MODULE)    (atomic)  │
//! │  txn update ───┘                                                        │
//! │                                                                         │
//! │  Every mutation path converges on the same pure function, so the       │
//! │  order of operations, sign conventions and rounding can only exist     │
//! │  in one place. Re-deriving the rule per handler is how call sites      │
//! │  start disagreeing on the service value and the PPh23 base.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Rule
//! 1. `line_subtotal = quantity × unit_price − discount` (exact, no rounding)
//! 2. `subtotal = Σ line_subtotal` (zero for the empty set)
//! 3. `ppn    = ppn_enabled   ? round(subtotal × 11%)       : 0`
//! 4. `pph22  = pph22_enabled ? round(subtotal × 1.5%)      : 0`
//! 5. `pph23  = pph23_enabled ? round(service_value × 2%)   : 0`
//! 6. `total  = subtotal + ppn − pph22 − pph23 + service_value`
//! 7. `materai_required = total >= Rp 5.000.000`
//!
//! PPN and PPh22 are tax on the goods; PPh22 and PPh23 are withheld by the
//! buyer, hence the subtraction. The service value is not part of the item
//! subtotal: it is the PPh23 base and is added into the total directly,
//! on every path, whether or not PPh23 is enabled.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::TaxRate;

/// Stamp duty ("materai") is required once the grand total reaches this
/// threshold, inclusive.
pub const MATERAI_THRESHOLD: Money = Money::from_rupiah(5_000_000);

// =============================================================================
// Inputs
// =============================================================================

/// The per-line amounts the engine needs; identity fields are irrelevant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAmounts {
    pub quantity: i64,
    pub unit_price: Money,
    pub discount: Money,
}

impl LineAmounts {
    /// `quantity × unit_price − discount`, exact.
    ///
    /// May be negative when the flat discount exceeds the gross; the engine
    /// propagates the negative value arithmetically.
    #[inline]
    pub fn subtotal(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity) - self.discount
    }
}

/// The three independent tax toggles on a transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxToggles {
    pub ppn: bool,
    pub pph22: bool,
    pub pph23: bool,
}

// =============================================================================
// Output
// =============================================================================

/// The full set of derived fields for a transaction.
///
/// The store persists these verbatim; nothing else writes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Totals {
    pub subtotal: Money,
    pub ppn_amount: Money,
    pub pph22_amount: Money,
    pub pph23_amount: Money,
    pub total_amount: Money,
    pub materai_required: bool,
}

impl Totals {
    /// Totals of a transaction with no items and no service value.
    pub fn empty() -> Self {
        compute_totals(&[], TaxToggles::default(), None)
    }
}

// =============================================================================
// The Engine
// =============================================================================

/// Derives subtotal, the three tax amounts, grand total and the stamp-duty
/// flag from the current items, toggles and service value.
///
/// Pure and total: defined for every finite input, no clamping, no side
/// effects. Each tax is rounded to whole rupiah independently
/// (half away from zero); the total is an exact sum of the rounded parts
/// and is never re-rounded.
///
/// ## Example
/// ```rust
/// use nota_core::money::Money;
/// use nota_core::totals::{compute_totals, LineAmounts, TaxToggles};
///
/// let lines = [LineAmounts {
///     quantity: 10,
///     unit_price: Money::from_rupiah(15_000),
///     discount: Money::from_rupiah(500),
/// }];
/// let toggles = TaxToggles { ppn: true, pph22: true, pph23: false };
///
/// let totals = compute_totals(&lines, toggles, None);
/// assert_eq!(totals.subtotal, Money::from_rupiah(149_500));
/// assert_eq!(totals.ppn_amount, Money::from_rupiah(16_445));
/// assert_eq!(totals.pph22_amount, Money::from_rupiah(2_243));
/// assert_eq!(totals.total_amount, Money::from_rupiah(163_702));
/// ```
pub fn compute_totals(
    lines: &[LineAmounts],
    toggles: TaxToggles,
    service_value: Option<Money>,
) -> Totals {
    let subtotal: Money = lines.iter().map(LineAmounts::subtotal).sum();
    let service = service_value.unwrap_or_else(Money::zero);

    let ppn_amount = if toggles.ppn {
        subtotal.calculate_tax(TaxRate::PPN)
    } else {
        Money::zero()
    };

    let pph22_amount = if toggles.pph22 {
        subtotal.calculate_tax(TaxRate::PPH22)
    } else {
        Money::zero()
    };

    // PPh23 is withholding on services: its base is the service value,
    // never the item subtotal.
    let pph23_amount = if toggles.pph23 {
        service.calculate_tax(TaxRate::PPH23)
    } else {
        Money::zero()
    };

    // The service value is additive on every path, items or not.
    let total_amount = subtotal + ppn_amount - pph22_amount - pph23_amount + service;

    let materai_required = total_amount >= MATERAI_THRESHOLD;

    Totals {
        subtotal,
        ppn_amount,
        pph22_amount,
        pph23_amount,
        total_amount,
        materai_required,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
