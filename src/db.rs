use std::str::FromStr;

use anyhow::Context;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use time::OffsetDateTime;

/// Open the pool and bring the schema up to date.
pub async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    let in_memory = database_url.contains(":memory:");
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("parse database url {database_url}"))?
        .create_if_missing(true)
        .foreign_keys(true);

    // every connection to ":memory:" is its own database, so keep exactly one alive
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(10)
    };

    let db = pool_options
        .connect_with(options)
        .await
        .context("connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .context("run migrations")?;

    Ok(db)
}

/// Current UTC time truncated to whole seconds, so stored timestamps share one text layout.
pub fn now_utc() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_nanosecond(0).unwrap_or(now)
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    connect("sqlite::memory:").await.expect("in-memory pool")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn migrations_create_tables() {
        let db = test_pool().await;
        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('users', 'workouts', 'sessions') ORDER BY name",
        )
        .fetch_all(&db)
        .await
        .unwrap();
        let names: Vec<_> = tables.into_iter().map(|(n,)| n).collect();
        assert_eq!(names, vec!["sessions", "users", "workouts"]);
    }

    #[test]
    fn now_utc_has_no_subseconds() {
        assert_eq!(now_utc().nanosecond(), 0);
    }
}
