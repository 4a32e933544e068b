//! # Document Rendering
//!
//! Pure HTML rendering for the seven commercial/legal document kinds a
//! transaction can be printed as. Rendering only reads finalized
//! transaction + item + store-profile state; it never computes or writes
//! totals - the numbers on the page are the persisted derived fields.
//!
//! Each template is a pure function
//! `(transaction, items, store profile, options) -> String`; the store
//! profile is optional because exactly zero-or-one exists.

pub mod format;
mod templates;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::DocumentError;
use crate::types::{StoreProfile, Transaction, TransactionItem};

// =============================================================================
// Document Type
// =============================================================================

/// The seven supported document kinds.
///
/// Wire names are kebab-case; the Indonesian titles are what the printed
/// page carries (nota penjualan, kwitansi, BAST, surat pesanan,
/// faktur pajak).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum DocumentType {
    SalesNote,
    Receipt,
    Invoice,
    HandoverReport,
    PurchaseOrder,
    TaxInvoice,
    ProformaInvoice,
}

impl DocumentType {
    /// The wire name, as accepted by [`FromStr`].
    pub const fn as_str(&self) -> &'static str {
        match self {
            DocumentType::SalesNote => "sales-note",
            DocumentType::Receipt => "receipt",
            DocumentType::Invoice => "invoice",
            DocumentType::HandoverReport => "handover-report",
            DocumentType::PurchaseOrder => "purchase-order",
            DocumentType::TaxInvoice => "tax-invoice",
            DocumentType::ProformaInvoice => "proforma-invoice",
        }
    }
}

impl FromStr for DocumentType {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sales-note" => Ok(DocumentType::SalesNote),
            "receipt" => Ok(DocumentType::Receipt),
            "invoice" => Ok(DocumentType::Invoice),
            "handover-report" => Ok(DocumentType::HandoverReport),
            "purchase-order" => Ok(DocumentType::PurchaseOrder),
            "tax-invoice" => Ok(DocumentType::TaxInvoice),
            "proforma-invoice" => Ok(DocumentType::ProformaInvoice),
            other => Err(DocumentError::UnsupportedType(other.to_string())),
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Render Options
// =============================================================================

/// Per-print overrides supplied by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RenderOptions {
    /// Date printed on the document instead of the transaction date.
    #[ts(as = "Option<String>")]
    pub override_date: Option<DateTime<Utc>>,

    /// City on the city/date line of signed documents. Defaults to Jakarta.
    pub document_city: Option<String>,

    /// Signer on the delivering side of the handover report.
    /// Defaults to the transaction's courier.
    pub courier_signer_name: Option<String>,

    /// Signer on the receiving side (handover report, receipt).
    /// Defaults to the treasurer / the store.
    pub receiver_signer_name: Option<String>,
}

/// A rendered document, ready to hand to the client for printing.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DocumentResponse {
    pub html_content: String,
    pub document_type: DocumentType,
    /// UUID of the transaction the document was rendered from.
    pub transaction_id: String,
}

// =============================================================================
// Dispatch
// =============================================================================

/// Renders the requested document kind from finalized transaction state.
///
/// Infallible once the type is known: every template is total over its
/// inputs (a missing store profile renders without the letterhead block).
pub fn render_document(
    document_type: DocumentType,
    transaction: &Transaction,
    items: &[TransactionItem],
    store: Option<&StoreProfile>,
    options: &RenderOptions,
) -> String {
    match document_type {
        DocumentType::SalesNote => templates::sales_note(transaction, items, store, options),
        DocumentType::Receipt => templates::receipt(transaction, items, store, options),
        DocumentType::Invoice => templates::invoice(transaction, items, store, options),
        DocumentType::HandoverReport => {
            templates::handover_report(transaction, items, store, options)
        }
        DocumentType::PurchaseOrder => {
            templates::purchase_order(transaction, items, store, options)
        }
        DocumentType::TaxInvoice => templates::tax_invoice(transaction, items, store, options),
        DocumentType::ProformaInvoice => {
            templates::proforma_invoice(transaction, items, store, options)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_types() {
        assert_eq!(
            "sales-note".parse::<DocumentType>().unwrap(),
            DocumentType::SalesNote
        );
        assert_eq!(
            "proforma-invoice".parse::<DocumentType>().unwrap(),
            DocumentType::ProformaInvoice
        );
    }

    #[test]
    fn test_parse_unknown_type() {
        let err = "delivery-manifest".parse::<DocumentType>().unwrap_err();
        assert_eq!(
            err,
            DocumentError::UnsupportedType("delivery-manifest".to_string())
        );
    }

    #[test]
    fn test_roundtrip_wire_names() {
        for ty in [
            DocumentType::SalesNote,
            DocumentType::Receipt,
            DocumentType::Invoice,
            DocumentType::HandoverReport,
            DocumentType::PurchaseOrder,
            DocumentType::TaxInvoice,
            DocumentType::ProformaInvoice,
        ] {
            assert_eq!(ty.as_str().parse::<DocumentType>().unwrap(), ty);
        }
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        let json = serde_json::to_string(&DocumentType::HandoverReport).unwrap();
        assert_eq!(json, "\"handover-report\"");
    }
}
