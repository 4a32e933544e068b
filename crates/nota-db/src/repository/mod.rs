//! # Repository Module
//!
//! Repository pattern implementations for the ledger's entities.
//!
//! ## Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Repository Pattern                                │
//! │                                                                         │
//! │  RPC handler                                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Repository (this module) ← validates input, owns the SQL              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  compute_totals (nota-core) ← pure derivation, shared by every path    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite ← item writes and parent totals in one SQL transaction         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories hold a cloned pool handle and are cheap to construct per
//! call via [`crate::Database`] accessors.

pub mod store_profile;
pub mod transaction;

pub use store_profile::StoreProfileRepository;
pub use transaction::TransactionRepository;
