//! # nota-db: Database Layer
//!
//! SQLite persistence for the Nota ledger: connection pooling, embedded
//! migrations, and repositories for the store profile, transactions and
//! line items, plus document generation on top of stored state.
//!
//! ## Module Organization
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          nota-db                                        │
//! │                                                                         │
//! │  pool.rs        ← DbConfig, Database handle, WAL + FK options          │
//! │  migrations.rs  ← Embedded SQL migrations                              │
//! │  error.rs       ← DbError: NotFound / conflict / FK categorization     │
//! │  repository/    ← StoreProfileRepository, TransactionRepository        │
//! │  documents.rs   ← Load state, render via nota-core templates           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use nota_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("nota.db")).await?;
//! let txn = db.transactions().create(input).await?;
//! ```

pub mod documents;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use documents::generate_document;
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::{StoreProfileRepository, TransactionRepository};
