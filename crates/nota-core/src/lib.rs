//! # nota-core: Pure Business Logic for the Nota Ledger
//!
//! This crate is the **heart** of Nota. It contains all business logic as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Nota Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (React)                             │   │
//! │  │    Transaction Form ──► Item Editor ──► Document Preview        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ RPC                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ nota-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  totals   │  │ documents │  │   │
//! │  │   │Transaction│  │   Money   │  │  engine   │  │ templates │  │   │
//! │  │   │   Item    │  │  TaxCalc  │  │  materai  │  │ terbilang │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    nota-db (Database Layer)                     │   │
//! │  │         SQLite repositories, totals consistency, migrations     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (StoreProfile, Transaction, TransactionItem)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`totals`] - The totals engine: the single derivation of subtotal,
//!   taxes, grand total and the stamp-duty flag
//! - [`validation`] - Field validation applied at the store boundary
//! - [`documents`] - The seven document templates
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, always
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are sen (i64), never floats
//! 4. **One derivation**: derived fields are computed by [`totals`] only
//!
//! ## Example Usage
//!
//! ```rust
//! use nota_core::money::Money;
//! use nota_core::totals::{compute_totals, LineAmounts, TaxToggles};
//!
//! let lines = [LineAmounts {
//!     quantity: 10,
//!     unit_price: Money::from_rupiah(15_000),
//!     discount: Money::from_rupiah(500),
//! }];
//!
//! let totals = compute_totals(
//!     &lines,
//!     TaxToggles { ppn: true, pph22: false, pph23: false },
//!     None,
//! );
//!
//! assert_eq!(totals.subtotal, Money::from_rupiah(149_500));
//! assert_eq!(totals.ppn_amount, Money::from_rupiah(16_445));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod documents;
pub mod error;
pub mod money;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use nota_core::Money` instead of
// `use nota_core::money::Money`

pub use error::{DocumentError, ValidationError};
pub use money::Money;
pub use totals::{compute_totals, LineAmounts, TaxToggles, Totals, MATERAI_THRESHOLD};
pub use types::*;
