use sqlx::SqlitePool;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::db::now_utc;
use crate::workouts::repo_types::{DeleteOutcome, NewWorkout, Workout};

const WORKOUT_COLUMNS: &str =
    "id, user_id, workout_date, workout_type, duration_minutes, notes, image, entry_kind, created_at";

pub async fn insert(db: &SqlitePool, user_id: Uuid, new: &NewWorkout) -> sqlx::Result<Workout> {
    insert_at(db, user_id, new, now_utc()).await
}

/// Insert with an explicit clock; template entries are dated `now`.
pub async fn insert_at(
    db: &SqlitePool,
    user_id: Uuid,
    new: &NewWorkout,
    now: OffsetDateTime,
) -> sqlx::Result<Workout> {
    let (workout_date, duration_minutes, notes, image) = match new {
        NewWorkout::Full {
            date,
            duration_minutes,
            notes,
            image,
            ..
        } => (
            date.midnight().assume_utc(),
            *duration_minutes,
            notes.clone(),
            image.clone(),
        ),
        NewWorkout::Template { .. } => (now, None, None, None),
    };

    sqlx::query_as::<_, Workout>(&format!(
        r#"
        INSERT INTO workouts ({WORKOUT_COLUMNS})
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {WORKOUT_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(workout_date)
    .bind(new.workout_type())
    .bind(duration_minutes)
    .bind(notes)
    .bind(image)
    .bind(new.kind())
    .bind(now)
    .fetch_one(db)
    .await
}

/// Delete a workout only if it belongs to `user_id`.
pub async fn delete_owned(
    db: &SqlitePool,
    user_id: Uuid,
    workout_id: Uuid,
) -> sqlx::Result<DeleteOutcome> {
    let row: Option<(Option<String>,)> = sqlx::query_as(
        r#"
        DELETE FROM workouts
        WHERE id = ? AND user_id = ?
        RETURNING image
        "#,
    )
    .bind(workout_id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    Ok(match row {
        Some((image,)) => DeleteOutcome::Deleted { image },
        None => DeleteOutcome::NothingDeleted,
    })
}

pub async fn list_recent(db: &SqlitePool, user_id: Uuid, limit: i64) -> sqlx::Result<Vec<Workout>> {
    sqlx::query_as::<_, Workout>(&format!(
        r#"
        SELECT {WORKOUT_COLUMNS}
        FROM workouts
        WHERE user_id = ?
        ORDER BY workout_date DESC, created_at DESC
        LIMIT ?
        "#
    ))
    .bind(user_id)
    .bind(limit)
    .fetch_all(db)
    .await
}

pub async fn count_total(db: &SqlitePool, user_id: Uuid) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM workouts WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(db)
        .await
}

pub async fn count_on_day(db: &SqlitePool, user_id: Uuid, day: Date) -> sqlx::Result<i64> {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM workouts WHERE user_id = ? AND date(workout_date) = ?",
    )
    .bind(user_id)
    .bind(day)
    .fetch_one(db)
    .await
}

/// Per-day counts within `[from, to]`, one row per day that has workouts.
/// Row order is whatever the store returns.
pub async fn daily_counts(
    db: &SqlitePool,
    user_id: Uuid,
    from: Date,
    to: Date,
) -> sqlx::Result<Vec<(String, i64)>> {
    sqlx::query_as(
        r#"
        SELECT date(workout_date) AS day, COUNT(*) AS count
        FROM workouts
        WHERE user_id = ? AND date(workout_date) BETWEEN ? AND ?
        GROUP BY date(workout_date)
        "#,
    )
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(db)
    .await
}
