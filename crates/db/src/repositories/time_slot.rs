use crate::models::DbTimeSlot;
use chrono::{NaiveDate, Utc};
use docslot_core::models::time_slot::NewTimeSlot;
use eyre::Result;
use sqlx::{Pool, Postgres, QueryBuilder};
use uuid::Uuid;

const SLOT_COLUMNS: &str = "id, doctor_id, slot_date, slot_time, duration_minutes, is_booked, \
                            appointment_id, is_recurring, last_updated";

pub async fn get_time_slots_by_doctor_and_date(
    pool: &Pool<Postgres>,
    doctor_id: Uuid,
    date: NaiveDate,
) -> Result<Vec<DbTimeSlot>> {
    let time_slots = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        SELECT {SLOT_COLUMNS}
        FROM time_slots
        WHERE doctor_id = $1 AND slot_date = $2
        ORDER BY slot_time ASC
        "#
    ))
    .bind(doctor_id)
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(time_slots)
}

pub async fn get_time_slot_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbTimeSlot>> {
    let time_slot = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        SELECT {SLOT_COLUMNS}
        FROM time_slots
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(time_slot)
}

/// Builds the bulk insert. Rows that collide with an existing
/// `(doctor_id, slot_date, slot_time)` are skipped, not failed.
fn insert_query(slots: &[NewTimeSlot]) -> QueryBuilder<'static, Postgres> {
    let now = Utc::now();
    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
        "INSERT INTO time_slots ({SLOT_COLUMNS}) "
    ));

    builder.push_values(slots, |mut row, slot| {
        row.push_bind(slot.id)
            .push_bind(slot.doctor_id)
            .push_bind(slot.date)
            .push_bind(slot.time)
            .push_bind(slot.duration)
            .push_bind(false)
            .push_bind(None::<Uuid>)
            .push_bind(slot.is_recurring)
            .push_bind(now);
    });
    builder.push(" ON CONFLICT (doctor_id, slot_date, slot_time) DO NOTHING");

    builder
}

/// Inserts every slot in one statement and returns the number of rows
/// actually written.
pub async fn insert_time_slots(pool: &Pool<Postgres>, slots: &[NewTimeSlot]) -> Result<u64> {
    if slots.is_empty() {
        return Ok(0);
    }

    let result = insert_query(slots).build().execute(pool).await?;

    Ok(result.rows_affected())
}

/// Replaces the unbooked slots of one doctor and date with `slots` in a
/// single transaction. Booked slots are kept; on any failure nothing
/// changes. Returns the number of rows inserted.
pub async fn replace_unbooked_time_slots(
    pool: &Pool<Postgres>,
    doctor_id: Uuid,
    date: NaiveDate,
    slots: &[NewTimeSlot],
) -> Result<u64> {
    let mut tx = pool.begin().await?;

    let removed = sqlx::query(
        r#"
        DELETE FROM time_slots
        WHERE doctor_id = $1 AND slot_date = $2 AND is_booked = FALSE
        "#,
    )
    .bind(doctor_id)
    .bind(date)
    .execute(&mut *tx)
    .await?;
    tracing::debug!(
        "Removing {} unbooked slots for doctor {} on {}",
        removed.rows_affected(),
        doctor_id,
        date
    );

    let inserted = if slots.is_empty() {
        0
    } else {
        insert_query(slots)
            .build()
            .execute(&mut *tx)
            .await?
            .rows_affected()
    };

    tx.commit().await?;

    Ok(inserted)
}

/// Flips the booking state only when it currently differs from `booked`.
///
/// Returns the updated row, or `None` when the slot is missing or was
/// already in the requested state.
pub async fn set_booking_state(
    pool: &Pool<Postgres>,
    id: Uuid,
    booked: bool,
    appointment_id: Option<Uuid>,
) -> Result<Option<DbTimeSlot>> {
    let now = Utc::now();

    let time_slot = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        UPDATE time_slots
        SET is_booked = $2, appointment_id = $3, last_updated = $4
        WHERE id = $1 AND is_booked <> $2
        RETURNING {SLOT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(booked)
    .bind(appointment_id)
    .bind(now)
    .fetch_optional(pool)
    .await?;

    Ok(time_slot)
}

/// Deletes the slot only while it is unbooked.
pub async fn delete_unbooked_time_slot(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM time_slots
        WHERE id = $1 AND is_booked = FALSE
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
