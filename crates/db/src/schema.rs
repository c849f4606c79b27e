use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create doctors table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS doctors (
            id UUID PRIMARY KEY,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create time_slots table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS time_slots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            doctor_id UUID NOT NULL REFERENCES doctors(id),
            slot_date DATE NOT NULL,
            slot_time TIME NOT NULL,
            duration_minutes INTEGER NOT NULL,
            is_booked BOOLEAN NOT NULL DEFAULT FALSE,
            appointment_id UUID NULL,
            is_recurring BOOLEAN NOT NULL DEFAULT FALSE,
            last_updated TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT unique_doctor_date_time UNIQUE (doctor_id, slot_date, slot_time),
            CONSTRAINT valid_duration CHECK (duration_minutes >= 15),
            CONSTRAINT booked_has_appointment CHECK (is_booked = (appointment_id IS NOT NULL))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_time_slots_doctor_date ON time_slots(doctor_id, slot_date);
        CREATE INDEX IF NOT EXISTS idx_time_slots_appointment_id ON time_slots(appointment_id);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
