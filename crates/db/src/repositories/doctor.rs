use crate::models::DbDoctor;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Registers a doctor, returning the existing record when already present.
pub async fn upsert_doctor(pool: &Pool<Postgres>, id: Uuid) -> Result<DbDoctor> {
    let now = Utc::now();

    let doctor = sqlx::query_as::<_, DbDoctor>(
        r#"
        INSERT INTO doctors (id, created_at)
        VALUES ($1, $2)
        ON CONFLICT (id)
        DO UPDATE SET id = EXCLUDED.id
        RETURNING id, created_at
        "#,
    )
    .bind(id)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(doctor)
}

pub async fn get_doctor_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbDoctor>> {
    let doctor = sqlx::query_as::<_, DbDoctor>(
        r#"
        SELECT id, created_at
        FROM doctors
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(doctor)
}
