//! # Store Profile Repository
//!
//! Persistence for the store's identity record.
//!
//! Zero-or-one profile exists per database. Should more than one row ever
//! appear (a legacy import, a race before the UNIQUE-less schema settled),
//! the oldest row by `(created_at, id)` is the canonical one: `get` returns
//! it deterministically instead of picking per call. Updates target an
//! explicit id.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use nota_core::validation::{validate_email, validate_new_store_profile, validate_required};
use nota_core::{NewStoreProfile, StoreProfile, StoreProfilePatch};

use crate::error::{DbError, DbResult};

/// Repository for store profile operations.
#[derive(Debug, Clone)]
pub struct StoreProfileRepository {
    pool: SqlitePool,
}

impl StoreProfileRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StoreProfileRepository { pool }
    }

    /// Returns the canonical store profile, or `None` when not yet set up.
    pub async fn get(&self) -> DbResult<Option<StoreProfile>> {
        let profile = sqlx::query_as::<_, StoreProfile>(
            r#"
            SELECT id, name, address, phone, email, npwp, created_at, updated_at
            FROM store_profiles
            ORDER BY created_at, id
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Creates the store profile.
    ///
    /// Multiple creates are not rejected; the canonical-row rule above keeps
    /// reads stable regardless.
    pub async fn create(&self, input: NewStoreProfile) -> DbResult<StoreProfile> {
        validate_new_store_profile(&input)?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO store_profiles (id, name, address, phone, email, npwp, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&input.name)
        .bind(&input.address)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.npwp)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        info!(profile_id = %id, name = %input.name, "Store profile created");

        Ok(StoreProfile {
            id,
            name: input.name,
            address: input.address,
            phone: input.phone,
            email: input.email,
            npwp: input.npwp,
            created_at: now,
            updated_at: now,
        })
    }

    /// Partially updates the profile with the given id.
    ///
    /// `None` fields keep their stored value. Fails with [`DbError::NotFound`]
    /// for an unknown id.
    pub async fn update(&self, id: &str, patch: StoreProfilePatch) -> DbResult<StoreProfile> {
        let current = sqlx::query_as::<_, StoreProfile>(
            r#"
            SELECT id, name, address, phone, email, npwp, created_at, updated_at
            FROM store_profiles
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("StoreProfile", id))?;

        let merged = StoreProfile {
            id: current.id,
            name: patch.name.unwrap_or(current.name),
            address: patch.address.unwrap_or(current.address),
            phone: patch.phone.unwrap_or(current.phone),
            email: patch.email.unwrap_or(current.email),
            npwp: patch.npwp.unwrap_or(current.npwp),
            created_at: current.created_at,
            updated_at: Utc::now(),
        };

        // The merged record must satisfy the same rules as a fresh one.
        validate_required("name", &merged.name)?;
        validate_required("address", &merged.address)?;
        validate_required("phone", &merged.phone)?;
        validate_email(&merged.email)?;
        validate_required("npwp", &merged.npwp)?;

        sqlx::query(
            r#"
            UPDATE store_profiles
            SET name = ?, address = ?, phone = ?, email = ?, npwp = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&merged.name)
        .bind(&merged.address)
        .bind(&merged.phone)
        .bind(&merged.email)
        .bind(&merged.npwp)
        .bind(merged.updated_at)
        .bind(&merged.id)
        .execute(&self.pool)
        .await?;

        debug!(profile_id = %merged.id, "Store profile updated");

        Ok(merged)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
