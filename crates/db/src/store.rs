//! The persistence seam used by the intake handler.
//!
//! The handler only needs "insert one registration, durable on success,
//! error on failure". [`PgRegistrationStore`] is the production backend;
//! tests substitute an in-memory implementation.

use async_trait::async_trait;
use intake_core::types::DbId;

use crate::models::registration::CreateRegistration;
use crate::repositories::RegistrationRepo;
use crate::DbPool;

/// Create-only storage for registrations.
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Persist one registration and return its new ID.
    async fn insert(&self, input: &CreateRegistration) -> Result<DbId, sqlx::Error>;

    /// Whether the backing store is reachable.
    async fn health_check(&self) -> Result<(), sqlx::Error>;
}

/// [`RegistrationStore`] backed by the `registrations` table.
#[derive(Clone)]
pub struct PgRegistrationStore {
    pool: DbPool,
}

impl PgRegistrationStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl RegistrationStore for PgRegistrationStore {
    async fn insert(&self, input: &CreateRegistration) -> Result<DbId, sqlx::Error> {
        let row = RegistrationRepo::create(&self.pool, input).await?;
        tracing::debug!(registration_id = row.id, "Registration row inserted");
        Ok(row.id)
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        crate::health_check(&self.pool).await
    }
}
