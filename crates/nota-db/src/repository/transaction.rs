//! # Transaction Repository
//!
//! Persistence for sales transactions and their line items.
//!
//! ## Recompute-On-Write
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Every Mutation Path Converges                          │
//! │                                                                         │
//! │  create / update ──────┐                                                │
//! │  add_item ─────────────┤   BEGIN                                        │
//! │  update_item ──────────┼──►  write the change                           │
//! │  delete_item ──────────┘     read current items                         │
//! │                              compute_totals (nota-core)                 │
//! │                              persist derived fields on the parent       │
//! │                            COMMIT                                       │
//! │                                                                         │
//! │  The item write and the parent's derived fields land in one SQL        │
//! │  transaction: readers never observe a transaction whose stored totals  │
//! │  disagree with its stored items.                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Deletion removes items first, then the parent, also in one SQL
//! transaction, and is idempotent: deleting an absent id succeeds.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use nota_core::validation::{
    validate_item_patch, validate_new_item, validate_new_transaction, validate_non_negative,
    validate_required,
};
use nota_core::{
    compute_totals, LineAmounts, Money, NewTransaction, NewTransactionItem, TaxToggles, Totals,
    Transaction, TransactionItem, TransactionItemPatch, TransactionPatch, TransactionWithItems,
};

use crate::error::{DbError, DbResult};

const TRANSACTION_COLUMNS: &str = "id, transaction_id, date, school_name, school_address, \
     treasurer_name, courier_name, additional_notes, subtotal_cents, \
     ppn_enabled, ppn_amount_cents, pph22_enabled, pph22_amount_cents, \
     pph23_enabled, pph23_amount_cents, service_value_cents, service_type, \
     school_npwp, materai_required, total_amount_cents, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, transaction_id, item_code, item_name, quantity, \
     unit_price_cents, discount_cents, subtotal_cents, created_at";

/// Repository for transaction and line item operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    /// Creates a transaction with no items.
    ///
    /// Derived fields are computed here, not accepted from the caller: the
    /// item subtotal is zero, but a service value already contributes to the
    /// total (and to PPh23 when toggled).
    pub async fn create(&self, input: NewTransaction) -> DbResult<Transaction> {
        validate_new_transaction(&input)?;

        let toggles = TaxToggles {
            ppn: input.ppn_enabled,
            pph22: input.pph22_enabled,
            pph23: input.pph23_enabled,
        };
        let totals = compute_totals(&[], toggles, input.service_value_cents.map(Money::from_cents));

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, transaction_id, date, school_name, school_address,
                treasurer_name, courier_name, additional_notes,
                subtotal_cents,
                ppn_enabled, ppn_amount_cents,
                pph22_enabled, pph22_amount_cents,
                pph23_enabled, pph23_amount_cents,
                service_value_cents, service_type, school_npwp,
                materai_required, total_amount_cents,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&input.transaction_id)
        .bind(input.date)
        .bind(&input.school_name)
        .bind(&input.school_address)
        .bind(&input.treasurer_name)
        .bind(&input.courier_name)
        .bind(&input.additional_notes)
        .bind(totals.subtotal.cents())
        .bind(input.ppn_enabled)
        .bind(totals.ppn_amount.cents())
        .bind(input.pph22_enabled)
        .bind(totals.pph22_amount.cents())
        .bind(input.pph23_enabled)
        .bind(totals.pph23_amount.cents())
        .bind(input.service_value_cents)
        .bind(&input.service_type)
        .bind(&input.school_npwp)
        .bind(totals.materai_required)
        .bind(totals.total_amount.cents())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => {
                DbError::duplicate("transaction_id", &input.transaction_id)
            }
            other => other,
        })?;

        info!(
            id = %id,
            transaction_id = %input.transaction_id,
            "Transaction created"
        );

        Ok(Transaction {
            id,
            transaction_id: input.transaction_id,
            date: input.date,
            school_name: input.school_name,
            school_address: input.school_address,
            treasurer_name: input.treasurer_name,
            courier_name: input.courier_name,
            additional_notes: input.additional_notes,
            subtotal_cents: totals.subtotal.cents(),
            ppn_enabled: toggles.ppn,
            ppn_amount_cents: totals.ppn_amount.cents(),
            pph22_enabled: toggles.pph22,
            pph22_amount_cents: totals.pph22_amount.cents(),
            pph23_enabled: toggles.pph23,
            pph23_amount_cents: totals.pph23_amount.cents(),
            service_value_cents: input.service_value_cents,
            service_type: input.service_type,
            school_npwp: input.school_npwp,
            materai_required: totals.materai_required,
            total_amount_cents: totals.total_amount.cents(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Fetches a transaction together with its items, or `None` when the
    /// id is unknown.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<TransactionWithItems>> {
        let Some(transaction) = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let items = self.get_items(id).await?;

        Ok(Some(TransactionWithItems { transaction, items }))
    }

    /// Lists all transactions, newest date first.
    pub async fn list(&self) -> DbResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions ORDER BY date DESC, created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Partially updates a transaction and recomputes its derived fields
    /// from the items on disk plus the merged toggles and service value.
    pub async fn update(&self, id: &str, patch: TransactionPatch) -> DbResult<Transaction> {
        let mut tx = self.pool.begin().await?;

        let mut merged = fetch_transaction(&mut tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Transaction", id))?;

        if let Some(v) = patch.transaction_id {
            merged.transaction_id = v;
        }
        if let Some(v) = patch.date {
            merged.date = v;
        }
        if let Some(v) = patch.school_name {
            merged.school_name = v;
        }
        if let Some(v) = patch.school_address {
            merged.school_address = v;
        }
        if let Some(v) = patch.treasurer_name {
            merged.treasurer_name = v;
        }
        if let Some(v) = patch.courier_name {
            merged.courier_name = v;
        }
        // Some(None) on the nullable fields clears the stored value
        if let Some(v) = patch.additional_notes {
            merged.additional_notes = v;
        }
        if let Some(v) = patch.ppn_enabled {
            merged.ppn_enabled = v;
        }
        if let Some(v) = patch.pph22_enabled {
            merged.pph22_enabled = v;
        }
        if let Some(v) = patch.pph23_enabled {
            merged.pph23_enabled = v;
        }
        if let Some(v) = patch.service_value_cents {
            merged.service_value_cents = v;
        }
        if let Some(v) = patch.service_type {
            merged.service_type = v;
        }
        if let Some(v) = patch.school_npwp {
            merged.school_npwp = v;
        }
        merged.updated_at = Utc::now();

        validate_required("transaction_id", &merged.transaction_id)?;
        validate_required("school_name", &merged.school_name)?;
        validate_required("school_address", &merged.school_address)?;
        validate_required("treasurer_name", &merged.treasurer_name)?;
        validate_required("courier_name", &merged.courier_name)?;
        if let Some(cents) = merged.service_value_cents {
            validate_non_negative("service_value", Money::from_cents(cents))?;
        }

        let items = fetch_items(&mut tx, id).await?;
        let totals = compute_totals(
            &line_amounts(&items),
            TaxToggles {
                ppn: merged.ppn_enabled,
                pph22: merged.pph22_enabled,
                pph23: merged.pph23_enabled,
            },
            merged.service_value(),
        );
        apply_totals(&mut merged, &totals);

        let conflict_value = merged.transaction_id.clone();
        sqlx::query(
            r#"
            UPDATE transactions
            SET transaction_id = ?, date = ?, school_name = ?, school_address = ?,
                treasurer_name = ?, courier_name = ?, additional_notes = ?,
                subtotal_cents = ?,
                ppn_enabled = ?, ppn_amount_cents = ?,
                pph22_enabled = ?, pph22_amount_cents = ?,
                pph23_enabled = ?, pph23_amount_cents = ?,
                service_value_cents = ?, service_type = ?, school_npwp = ?,
                materai_required = ?, total_amount_cents = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&merged.transaction_id)
        .bind(merged.date)
        .bind(&merged.school_name)
        .bind(&merged.school_address)
        .bind(&merged.treasurer_name)
        .bind(&merged.courier_name)
        .bind(&merged.additional_notes)
        .bind(merged.subtotal_cents)
        .bind(merged.ppn_enabled)
        .bind(merged.ppn_amount_cents)
        .bind(merged.pph22_enabled)
        .bind(merged.pph22_amount_cents)
        .bind(merged.pph23_enabled)
        .bind(merged.pph23_amount_cents)
        .bind(merged.service_value_cents)
        .bind(&merged.service_type)
        .bind(&merged.school_npwp)
        .bind(merged.materai_required)
        .bind(merged.total_amount_cents)
        .bind(merged.updated_at)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => {
                DbError::duplicate("transaction_id", conflict_value)
            }
            other => other,
        })?;

        tx.commit().await?;

        debug!(id = %id, total = merged.total_amount_cents, "Transaction updated");

        Ok(merged)
    }

    /// Deletes a transaction and its items: items first, then the parent,
    /// in one SQL transaction. Idempotent - an absent id succeeds.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM transaction_items WHERE transaction_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM transactions WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        if result.rows_affected() > 0 {
            info!(id = %id, "Transaction deleted");
        }
        Ok(())
    }

    // =========================================================================
    // Line Items
    // =========================================================================

    /// Lists a transaction's items in insertion order.
    pub async fn get_items(&self, transaction_id: &str) -> DbResult<Vec<TransactionItem>> {
        let items = sqlx::query_as::<_, TransactionItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM transaction_items \
             WHERE transaction_id = ? ORDER BY created_at, id"
        ))
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Adds a line item and recomputes the parent's derived fields, both in
    /// one SQL transaction.
    pub async fn add_item(&self, input: NewTransactionItem) -> DbResult<TransactionItem> {
        validate_new_item(&input)?;

        let mut tx = self.pool.begin().await?;

        let parent = fetch_transaction(&mut tx, &input.transaction_id)
            .await?
            .ok_or_else(|| DbError::not_found("Transaction", &input.transaction_id))?;

        let subtotal = Money::from_cents(input.unit_price_cents)
            .multiply_quantity(input.quantity)
            - Money::from_cents(input.discount_cents);

        let item = TransactionItem {
            id: Uuid::new_v4().to_string(),
            transaction_id: input.transaction_id,
            item_code: input.item_code,
            item_name: input.item_name,
            quantity: input.quantity,
            unit_price_cents: input.unit_price_cents,
            discount_cents: input.discount_cents,
            subtotal_cents: subtotal.cents(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO transaction_items (
                id, transaction_id, item_code, item_name,
                quantity, unit_price_cents, discount_cents, subtotal_cents, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&item.id)
        .bind(&item.transaction_id)
        .bind(&item.item_code)
        .bind(&item.item_name)
        .bind(item.quantity)
        .bind(item.unit_price_cents)
        .bind(item.discount_cents)
        .bind(item.subtotal_cents)
        .bind(item.created_at)
        .execute(&mut *tx)
        .await?;

        recompute_parent(&mut tx, &parent).await?;

        tx.commit().await?;

        debug!(
            item_id = %item.id,
            transaction = %item.transaction_id,
            "Line item added"
        );

        Ok(item)
    }

    /// Partially updates a line item, re-deriving its subtotal and the
    /// parent's totals in one SQL transaction.
    pub async fn update_item(
        &self,
        item_id: &str,
        patch: TransactionItemPatch,
    ) -> DbResult<TransactionItem> {
        validate_item_patch(&patch)?;

        let mut tx = self.pool.begin().await?;

        let mut merged = fetch_item(&mut tx, item_id)
            .await?
            .ok_or_else(|| DbError::not_found("TransactionItem", item_id))?;

        if let Some(v) = patch.item_code {
            merged.item_code = v;
        }
        if let Some(v) = patch.item_name {
            merged.item_name = v;
        }
        if let Some(v) = patch.quantity {
            merged.quantity = v;
        }
        if let Some(v) = patch.unit_price_cents {
            merged.unit_price_cents = v;
        }
        if let Some(v) = patch.discount_cents {
            merged.discount_cents = v;
        }
        // The line subtotal is always re-derived from the merged fields.
        merged.subtotal_cents = (Money::from_cents(merged.unit_price_cents)
            .multiply_quantity(merged.quantity)
            - Money::from_cents(merged.discount_cents))
        .cents();

        sqlx::query(
            r#"
            UPDATE transaction_items
            SET item_code = ?, item_name = ?, quantity = ?,
                unit_price_cents = ?, discount_cents = ?, subtotal_cents = ?
            WHERE id = ?
            "#,
        )
        .bind(&merged.item_code)
        .bind(&merged.item_name)
        .bind(merged.quantity)
        .bind(merged.unit_price_cents)
        .bind(merged.discount_cents)
        .bind(merged.subtotal_cents)
        .bind(item_id)
        .execute(&mut *tx)
        .await?;

        let parent = fetch_transaction(&mut tx, &merged.transaction_id)
            .await?
            .ok_or_else(|| DbError::not_found("Transaction", &merged.transaction_id))?;
        recompute_parent(&mut tx, &parent).await?;

        tx.commit().await?;

        debug!(item_id = %item_id, "Line item updated");

        Ok(merged)
    }

    /// Deletes a line item and recomputes the parent's derived fields in
    /// one SQL transaction. Unlike transaction deletion this is not
    /// idempotent: an unknown id is [`DbError::NotFound`].
    pub async fn delete_item(&self, item_id: &str) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let item = fetch_item(&mut tx, item_id)
            .await?
            .ok_or_else(|| DbError::not_found("TransactionItem", item_id))?;

        sqlx::query("DELETE FROM transaction_items WHERE id = ?")
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        let parent = fetch_transaction(&mut tx, &item.transaction_id)
            .await?
            .ok_or_else(|| DbError::not_found("Transaction", &item.transaction_id))?;
        recompute_parent(&mut tx, &parent).await?;

        tx.commit().await?;

        debug!(item_id = %item_id, "Line item deleted");
        Ok(())
    }
}

// =============================================================================
// Shared Helpers (within an open SQL transaction)
// =============================================================================

async fn fetch_transaction(
    conn: &mut SqliteConnection,
    id: &str,
) -> DbResult<Option<Transaction>> {
    let row = sqlx::query_as::<_, Transaction>(&format!(
        "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

async fn fetch_item(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<TransactionItem>> {
    let row = sqlx::query_as::<_, TransactionItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM transaction_items WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

async fn fetch_items(
    conn: &mut SqliteConnection,
    transaction_id: &str,
) -> DbResult<Vec<TransactionItem>> {
    let rows = sqlx::query_as::<_, TransactionItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM transaction_items \
         WHERE transaction_id = ? ORDER BY created_at, id"
    ))
    .bind(transaction_id)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}

fn line_amounts(items: &[TransactionItem]) -> Vec<LineAmounts> {
    items
        .iter()
        .map(|i| LineAmounts {
            quantity: i.quantity,
            unit_price: i.unit_price(),
            discount: i.discount(),
        })
        .collect()
}

fn apply_totals(transaction: &mut Transaction, totals: &Totals) {
    transaction.subtotal_cents = totals.subtotal.cents();
    transaction.ppn_amount_cents = totals.ppn_amount.cents();
    transaction.pph22_amount_cents = totals.pph22_amount.cents();
    transaction.pph23_amount_cents = totals.pph23_amount.cents();
    transaction.total_amount_cents = totals.total_amount.cents();
    transaction.materai_required = totals.materai_required;
}

/// Re-derives the parent's totals from its items on disk and persists them.
/// Must run inside the same SQL transaction as the item write it follows.
async fn recompute_parent(
    conn: &mut SqliteConnection,
    parent: &Transaction,
) -> DbResult<()> {
    let items = fetch_items(conn, &parent.id).await?;
    let totals = compute_totals(
        &line_amounts(&items),
        TaxToggles {
            ppn: parent.ppn_enabled,
            pph22: parent.pph22_enabled,
            pph23: parent.pph23_enabled,
        },
        parent.service_value(),
    );

    sqlx::query(
        r#"
        UPDATE transactions
        SET subtotal_cents = ?,
            ppn_amount_cents = ?, pph22_amount_cents = ?, pph23_amount_cents = ?,
            materai_required = ?, total_amount_cents = ?,
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(totals.subtotal.cents())
    .bind(totals.ppn_amount.cents())
    .bind(totals.pph22_amount.cents())
    .bind(totals.pph23_amount.cents())
    .bind(totals.materai_required)
    .bind(totals.total_amount.cents())
    .bind(Utc::now())
    .bind(&parent.id)
    .execute(conn)
    .await?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::TimeZone;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn new_transaction(transaction_id: &str) -> NewTransaction {
        NewTransaction {
            transaction_id: transaction_id.to_string(),
            date: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
            school_name: "SDN 1 Menteng".to_string(),
            school_address: "Jl. Besuki No. 4, Jakarta".to_string(),
            treasurer_name: "Ibu Sari".to_string(),
            courier_name: "Pak Budi".to_string(),
            additional_notes: None,
            ppn_enabled: false,
            pph22_enabled: false,
            pph23_enabled: false,
            service_value_cents: None,
            service_type: None,
            school_npwp: None,
        }
    }

    fn new_item(parent_id: &str, qty: i64, price_rupiah: i64, discount_rupiah: i64) -> NewTransactionItem {
        NewTransactionItem {
            transaction_id: parent_id.to_string(),
            item_code: "BK-01".to_string(),
            item_name: "Buku Tulis".to_string(),
            quantity: qty,
            unit_price_cents: price_rupiah * 100,
            discount_cents: discount_rupiah * 100,
        }
    }

    #[tokio::test]
    async fn test_create_starts_with_empty_totals() {
        let db = test_db().await;
        let txn = db
            .transactions()
            .create(new_transaction("TRX-001"))
            .await
            .unwrap();

        assert_eq!(txn.subtotal_cents, 0);
        assert_eq!(txn.total_amount_cents, 0);
        assert!(!txn.materai_required);
    }

    #[tokio::test]
    async fn test_create_with_service_value_and_pph23() {
        let db = test_db().await;
        let mut input = new_transaction("TRX-002");
        input.pph23_enabled = true;
        input.service_value_cents = Some(100_000_000); // Rp 1.000.000
        input.service_type = Some("Instalasi".to_string());

        let txn = db.transactions().create(input).await.unwrap();

        // PPh23 = 2% of the service value; total = 0 - 20.000 + 1.000.000
        assert_eq!(txn.pph23_amount_cents, 2_000_000);
        assert_eq!(txn.total_amount_cents, 98_000_000);
    }

    #[tokio::test]
    async fn test_duplicate_transaction_id_is_conflict() {
        let db = test_db().await;
        let repo = db.transactions();
        repo.create(new_transaction("TRX-DUP")).await.unwrap();

        let err = repo.create(new_transaction("TRX-DUP")).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_add_item_recomputes_parent() {
        let db = test_db().await;
        let repo = db.transactions();
        let mut input = new_transaction("TRX-003");
        input.ppn_enabled = true;
        input.pph22_enabled = true;
        let txn = repo.create(input).await.unwrap();

        repo.add_item(new_item(&txn.id, 10, 15_000, 500))
            .await
            .unwrap();

        let detail = repo.get_by_id(&txn.id).await.unwrap().unwrap();
        let t = detail.transaction;
        assert_eq!(t.subtotal_cents, 14_950_000); // Rp 149.500
        assert_eq!(t.ppn_amount_cents, 1_644_500); // Rp 16.445
        assert_eq!(t.pph22_amount_cents, 224_300); // Rp 2.243
        assert_eq!(t.total_amount_cents, 16_370_200); // Rp 163.702
        assert_eq!(detail.items.len(), 1);
        assert_eq!(detail.items[0].subtotal_cents, 14_950_000);
    }

    #[tokio::test]
    async fn test_add_item_to_missing_transaction() {
        let db = test_db().await;
        let err = db
            .transactions()
            .add_item(new_item("no-such-id", 1, 1_000, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_invalid_item_leaves_parent_untouched() {
        let db = test_db().await;
        let repo = db.transactions();
        let txn = repo.create(new_transaction("TRX-004")).await.unwrap();

        let bad = new_item(&txn.id, 0, 1_000, 0); // zero quantity
        assert!(repo.add_item(bad).await.is_err());

        let detail = repo.get_by_id(&txn.id).await.unwrap().unwrap();
        assert!(detail.items.is_empty());
        assert_eq!(detail.transaction.subtotal_cents, 0);
    }

    #[tokio::test]
    async fn test_update_item_recomputes_both_levels() {
        let db = test_db().await;
        let repo = db.transactions();
        let txn = repo.create(new_transaction("TRX-005")).await.unwrap();
        let item = repo
            .add_item(new_item(&txn.id, 10, 15_000, 500))
            .await
            .unwrap();

        let updated = repo
            .update_item(
                &item.id,
                TransactionItemPatch {
                    quantity: Some(5),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // 5 × 15.000 − 500 = 74.500
        assert_eq!(updated.subtotal_cents, 7_450_000);

        let detail = repo.get_by_id(&txn.id).await.unwrap().unwrap();
        assert_eq!(detail.transaction.subtotal_cents, 7_450_000);
        assert_eq!(detail.transaction.total_amount_cents, 7_450_000);
    }

    #[tokio::test]
    async fn test_delete_item_recomputes_parent() {
        let db = test_db().await;
        let repo = db.transactions();
        let mut input = new_transaction("TRX-006");
        input.service_value_cents = Some(50_000_000); // Rp 500.000
        let txn = repo.create(input).await.unwrap();
        let item = repo
            .add_item(new_item(&txn.id, 2, 100_000, 0))
            .await
            .unwrap();

        repo.delete_item(&item.id).await.unwrap();

        // Deleting the last item leaves the service value contribution
        let detail = repo.get_by_id(&txn.id).await.unwrap().unwrap();
        assert!(detail.items.is_empty());
        assert_eq!(detail.transaction.subtotal_cents, 0);
        assert_eq!(detail.transaction.total_amount_cents, 50_000_000);
    }

    #[tokio::test]
    async fn test_delete_missing_item_is_not_found() {
        let db = test_db().await;
        let err = db
            .transactions()
            .delete_item("no-such-item")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_toggles_recompute_totals() {
        let db = test_db().await;
        let repo = db.transactions();
        let txn = repo.create(new_transaction("TRX-007")).await.unwrap();
        repo.add_item(new_item(&txn.id, 10, 15_000, 500))
            .await
            .unwrap();

        let updated = repo
            .update(
                &txn.id,
                TransactionPatch {
                    ppn_enabled: Some(true),
                    pph22_enabled: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.ppn_amount_cents, 1_644_500);
        assert_eq!(updated.pph22_amount_cents, 224_300);
        assert_eq!(updated.total_amount_cents, 16_370_200);

        // Toggling back off zeroes the amounts again
        let reverted = repo
            .update(
                &txn.id,
                TransactionPatch {
                    ppn_enabled: Some(false),
                    pph22_enabled: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(reverted.ppn_amount_cents, 0);
        assert_eq!(reverted.total_amount_cents, 14_950_000);
    }

    #[tokio::test]
    async fn test_update_clears_nullable_field() {
        let db = test_db().await;
        let repo = db.transactions();
        let mut input = new_transaction("TRX-008");
        input.service_value_cents = Some(100_000_000);
        input.pph23_enabled = true;
        let txn = repo.create(input).await.unwrap();
        assert_eq!(txn.total_amount_cents, 98_000_000);

        // Some(None) clears the stored service value; PPh23 base vanishes
        let updated = repo
            .update(
                &txn.id,
                TransactionPatch {
                    service_value_cents: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.service_value_cents, None);
        assert_eq!(updated.pph23_amount_cents, 0);
        assert_eq!(updated.total_amount_cents, 0);
    }

    #[tokio::test]
    async fn test_update_transaction_id_conflict() {
        let db = test_db().await;
        let repo = db.transactions();
        repo.create(new_transaction("TRX-A")).await.unwrap();
        let second = repo.create(new_transaction("TRX-B")).await.unwrap();

        let err = repo
            .update(
                &second.id,
                TransactionPatch {
                    transaction_id: Some("TRX-A".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_materai_follows_recomputed_total() {
        let db = test_db().await;
        let repo = db.transactions();
        let txn = repo.create(new_transaction("TRX-009")).await.unwrap();

        repo.add_item(new_item(&txn.id, 1, 4_999_999, 0))
            .await
            .unwrap();
        let detail = repo.get_by_id(&txn.id).await.unwrap().unwrap();
        assert!(!detail.transaction.materai_required);

        repo.add_item(new_item(&txn.id, 1, 1, 0)).await.unwrap();
        let detail = repo.get_by_id(&txn.id).await.unwrap().unwrap();
        assert!(detail.transaction.materai_required);
    }

    #[tokio::test]
    async fn test_delete_removes_items_and_is_idempotent() {
        let db = test_db().await;
        let repo = db.transactions();
        let txn = repo.create(new_transaction("TRX-010")).await.unwrap();
        repo.add_item(new_item(&txn.id, 1, 1_000, 0)).await.unwrap();

        repo.delete(&txn.id).await.unwrap();
        assert!(repo.get_by_id(&txn.id).await.unwrap().is_none());
        assert!(repo.get_items(&txn.id).await.unwrap().is_empty());

        // Second delete of the same id still succeeds
        repo.delete(&txn.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_rollback_leaves_no_partial_state() {
        let db = test_db().await;
        let repo = db.transactions();
        let txn = repo.create(new_transaction("TRX-ATOMIC")).await.unwrap();

        // Write an item inside an explicit SQL transaction, then drop it
        // without committing. Neither the item nor any totals change may
        // be visible afterwards.
        {
            let mut tx = db.pool().begin().await.unwrap();
            sqlx::query(
                "INSERT INTO transaction_items (id, transaction_id, item_code, item_name, \
                 quantity, unit_price_cents, discount_cents, subtotal_cents, created_at) \
                 VALUES (?, ?, 'BK-01', 'Buku Tulis', 1, 100, 0, 100, ?)",
            )
            .bind("item-rollback")
            .bind(&txn.id)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await
            .unwrap();
            // tx dropped here, which rolls back
        }

        let detail = repo.get_by_id(&txn.id).await.unwrap().unwrap();
        assert!(detail.items.is_empty());
        assert_eq!(detail.transaction.subtotal_cents, 0);
        assert_eq!(detail.transaction.total_amount_cents, 0);
    }

    #[tokio::test]
    async fn test_list_orders_by_date_descending() {
        let db = test_db().await;
        let repo = db.transactions();

        let mut older = new_transaction("TRX-OLD");
        older.date = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        repo.create(older).await.unwrap();

        let mut newer = new_transaction("TRX-NEW");
        newer.date = Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap();
        repo.create(newer).await.unwrap();

        let listed = repo.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].transaction_id, "TRX-NEW");
        assert_eq!(listed[1].transaction_id, "TRX-OLD");
    }

    #[tokio::test]
    async fn test_items_listed_in_insertion_order() {
        let db = test_db().await;
        let repo = db.transactions();
        let txn = repo.create(new_transaction("TRX-011")).await.unwrap();

        for (code, price) in [("BK-01", 1_000), ("BK-02", 2_000), ("BK-03", 3_000)] {
            let mut item = new_item(&txn.id, 1, price, 0);
            item.item_code = code.to_string();
            repo.add_item(item).await.unwrap();
        }

        let items = repo.get_items(&txn.id).await.unwrap();
        let codes: Vec<_> = items.iter().map(|i| i.item_code.as_str()).collect();
        assert_eq!(codes, ["BK-01", "BK-02", "BK-03"]);
    }
}
