//! Repository for the `registrations` table.

use intake_core::types::DbId;
use sqlx::PgPool;

use crate::models::registration::{CreateRegistration, Registration};

/// Column list for `registrations` queries.
const COLUMNS: &str = "\
    id, name, father_name, age, dob, mobile, email, address, \
    membership, date, payment_mode, amount, payment_screenshot, created_at";

/// Insert and lookup for registrations. There is no update or delete.
pub struct RegistrationRepo;

impl RegistrationRepo {
    /// Insert a new registration, returning the full row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateRegistration,
    ) -> Result<Registration, sqlx::Error> {
        let query = format!(
            "INSERT INTO registrations \
                (name, father_name, age, dob, mobile, email, address, \
                 membership, date, payment_mode, amount, payment_screenshot) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Registration>(&query)
            .bind(&input.name)
            .bind(&input.father_name)
            .bind(input.age)
            .bind(input.dob)
            .bind(&input.mobile)
            .bind(&input.email)
            .bind(&input.address)
            .bind(&input.membership)
            .bind(input.date)
            .bind(&input.payment_mode)
            .bind(input.amount)
            .bind(&input.payment_screenshot)
            .fetch_one(pool)
            .await
    }

    /// Find a registration by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Registration>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM registrations WHERE id = $1");
        sqlx::query_as::<_, Registration>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Count all stored registrations.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM registrations")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
