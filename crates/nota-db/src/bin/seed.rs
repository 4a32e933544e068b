//! Seeds a database with demo data: one store profile and a few
//! transactions with items, covering the tax toggle combinations.
//!
//! ## Usage
//! ```bash
//! NOTA_DB_PATH=nota.db cargo run --bin seed
//! ```
//!
//! Idempotent at the coarse level: a database that already holds
//! transactions is left untouched.

use chrono::{Duration, Utc};
use tracing::{info, warn};

use nota_core::{NewStoreProfile, NewTransaction, NewTransactionItem};
use nota_db::{Database, DbConfig, DbResult};

#[tokio::main]
async fn main() -> DbResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let path = std::env::var("NOTA_DB_PATH").unwrap_or_else(|_| "nota.db".to_string());
    info!(path = %path, "Seeding database");

    let db = Database::new(DbConfig::new(&path)).await?;

    if !db.transactions().list().await?.is_empty() {
        warn!("Database already contains transactions, nothing to do");
        return Ok(());
    }

    if db.store_profiles().get().await?.is_none() {
        db.store_profiles()
            .create(NewStoreProfile {
                name: "Toko Sumber Ilmu".to_string(),
                address: "Jl. Pendidikan No. 12, Jakarta Pusat".to_string(),
                phone: "021-5551234".to_string(),
                email: "toko@sumberilmu.co.id".to_string(),
                npwp: "01.234.567.8-901.000".to_string(),
            })
            .await?;
        info!("Store profile created");
    }

    let now = Utc::now();

    // Plain sale, no taxes
    let plain = db
        .transactions()
        .create(NewTransaction {
            transaction_id: "TRX-2024-001".to_string(),
            date: now - Duration::days(14),
            school_name: "SDN 1 Menteng".to_string(),
            school_address: "Jl. Besuki No. 4, Jakarta".to_string(),
            treasurer_name: "Ibu Sari".to_string(),
            courier_name: "Pak Budi".to_string(),
            additional_notes: Some("Pengiriman tahap pertama".to_string()),
            ppn_enabled: false,
            pph22_enabled: false,
            pph23_enabled: false,
            service_value_cents: None,
            service_type: None,
            school_npwp: None,
        })
        .await?;
    db.transactions()
        .add_item(NewTransactionItem {
            transaction_id: plain.id.clone(),
            item_code: "BK-01".to_string(),
            item_name: "Buku Tulis 38 Lembar".to_string(),
            quantity: 100,
            unit_price_cents: 350_000,
            discount_cents: 0,
        })
        .await?;

    // Taxed sale: PPN + PPh22, big enough to require materai
    let taxed = db
        .transactions()
        .create(NewTransaction {
            transaction_id: "TRX-2024-002".to_string(),
            date: now - Duration::days(7),
            school_name: "SMPN 5 Kebayoran".to_string(),
            school_address: "Jl. Sisingamangaraja No. 1, Jakarta".to_string(),
            treasurer_name: "Pak Darmawan".to_string(),
            courier_name: "Pak Budi".to_string(),
            additional_notes: None,
            ppn_enabled: true,
            pph22_enabled: true,
            pph23_enabled: false,
            service_value_cents: None,
            service_type: None,
            school_npwp: Some("02.345.678.9-012.000".to_string()),
        })
        .await?;
    db.transactions()
        .add_item(NewTransactionItem {
            transaction_id: taxed.id.clone(),
            item_code: "MJ-12".to_string(),
            item_name: "Meja Siswa".to_string(),
            quantity: 40,
            unit_price_cents: 45_000_000,
            discount_cents: 5_000_000,
        })
        .await?;
    db.transactions()
        .add_item(NewTransactionItem {
            transaction_id: taxed.id.clone(),
            item_code: "KR-07".to_string(),
            item_name: "Kursi Siswa".to_string(),
            quantity: 40,
            unit_price_cents: 27_500_000,
            discount_cents: 0,
        })
        .await?;

    // Service sale: PPh23 withheld from the installation fee
    let service = db
        .transactions()
        .create(NewTransaction {
            transaction_id: "TRX-2024-003".to_string(),
            date: now - Duration::days(2),
            school_name: "SMAN 8 Bukit Duri".to_string(),
            school_address: "Jl. Taman Bukit Duri, Jakarta".to_string(),
            treasurer_name: "Ibu Ratna".to_string(),
            courier_name: "Pak Joko".to_string(),
            additional_notes: None,
            ppn_enabled: true,
            pph22_enabled: false,
            pph23_enabled: true,
            service_value_cents: Some(150_000_000),
            service_type: Some("Instalasi jaringan".to_string()),
            school_npwp: Some("03.456.789.0-123.000".to_string()),
        })
        .await?;
    db.transactions()
        .add_item(NewTransactionItem {
            transaction_id: service.id.clone(),
            item_code: "RT-01".to_string(),
            item_name: "Router Sekolah".to_string(),
            quantity: 4,
            unit_price_cents: 85_000_000,
            discount_cents: 0,
        })
        .await?;

    let count = db.transactions().list().await?.len();
    info!(transactions = count, "Seed complete");

    db.close().await;
    Ok(())
}
