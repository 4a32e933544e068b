//! # Document Generation
//!
//! Orchestration between storage and the pure renderers in `nota-core`:
//! load the transaction with its items and the store profile, then hand
//! finalized state to the template. No totals are computed here - the
//! numbers on the page are the persisted derived fields.

use tracing::info;

use nota_core::documents::{render_document, DocumentResponse, DocumentType, RenderOptions};

use crate::error::{DbError, DbResult};
use crate::pool::Database;

/// Renders the requested document for a transaction.
///
/// Fails with [`crate::DbError::NotFound`] when the transaction does not
/// exist. A missing store profile is not an error: the page renders
/// without the letterhead block.
pub async fn generate_document(
    db: &Database,
    transaction_id: &str,
    document_type: DocumentType,
    options: &RenderOptions,
) -> DbResult<DocumentResponse> {
    let detail = db
        .transactions()
        .get_by_id(transaction_id)
        .await?
        .ok_or_else(|| DbError::not_found("Transaction", transaction_id))?;
    let store = db.store_profiles().get().await?;

    let html_content = render_document(
        document_type,
        &detail.transaction,
        &detail.items,
        store.as_ref(),
        options,
    );

    info!(
        transaction = %detail.transaction.transaction_id,
        document = %document_type,
        "Document rendered"
    );

    Ok(DocumentResponse {
        html_content,
        document_type,
        transaction_id: detail.transaction.id,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use chrono::{TimeZone, Utc};
    use nota_core::{NewStoreProfile, NewTransaction, NewTransactionItem};

    async fn seeded_db() -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        db.store_profiles()
            .create(NewStoreProfile {
                name: "Toko Sumber Ilmu".to_string(),
                address: "Jl. Pendidikan No. 12, Jakarta".to_string(),
                phone: "021-5551234".to_string(),
                email: "toko@sumberilmu.co.id".to_string(),
                npwp: "01.234.567.8-901.000".to_string(),
            })
            .await
            .unwrap();

        let txn = db
            .transactions()
            .create(NewTransaction {
                transaction_id: "TRX-2024-001".to_string(),
                date: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
                school_name: "SDN 1 Menteng".to_string(),
                school_address: "Jl. Besuki No. 4, Jakarta".to_string(),
                treasurer_name: "Ibu Sari".to_string(),
                courier_name: "Pak Budi".to_string(),
                additional_notes: None,
                ppn_enabled: true,
                pph22_enabled: false,
                pph23_enabled: false,
                service_value_cents: None,
                service_type: None,
                school_npwp: None,
            })
            .await
            .unwrap();

        db.transactions()
            .add_item(NewTransactionItem {
                transaction_id: txn.id.clone(),
                item_code: "BK-01".to_string(),
                item_name: "Buku Tulis".to_string(),
                quantity: 10,
                unit_price_cents: 1_500_000,
                discount_cents: 50_000,
            })
            .await
            .unwrap();

        (db, txn.id)
    }

    #[tokio::test]
    async fn test_renders_from_persisted_state() {
        let (db, id) = seeded_db().await;

        let doc = generate_document(&db, &id, DocumentType::SalesNote, &RenderOptions::default())
            .await
            .unwrap();

        assert_eq!(doc.document_type, DocumentType::SalesNote);
        assert_eq!(doc.transaction_id, id);
        assert!(doc.html_content.contains("TRX-2024-001"));
        assert!(doc.html_content.contains("Toko Sumber Ilmu"));
        // Subtotal Rp 149.500 from the stored derived field
        assert!(doc.html_content.contains("Rp 149.500,00"));
    }

    #[tokio::test]
    async fn test_missing_transaction_is_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err =
            generate_document(&db, "no-such-id", DocumentType::Invoice, &RenderOptions::default())
                .await
                .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_renders_without_store_profile() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let txn = db
            .transactions()
            .create(NewTransaction {
                transaction_id: "TRX-NOPROFILE".to_string(),
                date: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
                school_name: "SDN 1 Menteng".to_string(),
                school_address: "Jl. Besuki No. 4".to_string(),
                treasurer_name: "Ibu Sari".to_string(),
                courier_name: "Pak Budi".to_string(),
                additional_notes: None,
                ppn_enabled: false,
                pph22_enabled: false,
                pph23_enabled: false,
                service_value_cents: None,
                service_type: None,
                school_npwp: None,
            })
            .await
            .unwrap();

        let doc = generate_document(&db, &txn.id, DocumentType::Receipt, &RenderOptions::default())
            .await
            .unwrap();
        assert!(doc.html_content.contains("TRX-NOPROFILE"));
    }

    #[tokio::test]
    async fn test_all_seven_document_types_render() {
        let (db, id) = seeded_db().await;

        for ty in [
            DocumentType::SalesNote,
            DocumentType::Receipt,
            DocumentType::Invoice,
            DocumentType::HandoverReport,
            DocumentType::PurchaseOrder,
            DocumentType::TaxInvoice,
            DocumentType::ProformaInvoice,
        ] {
            let doc = generate_document(&db, &id, ty, &RenderOptions::default())
                .await
                .unwrap();
            assert!(!doc.html_content.is_empty(), "{ty} rendered empty");
        }
    }
}
