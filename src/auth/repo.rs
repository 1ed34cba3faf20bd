use sqlx::SqlitePool;
use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::db::now_utc;

impl User {
    pub async fn find_by_username(db: &SqlitePool, username: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await
    }

    /// Insert a user. A taken username surfaces as the store's unique violation.
    pub async fn create(db: &SqlitePool, username: &str, password_hash: &str) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, password_hash, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(password_hash)
        .bind(now_utc())
        .fetch_one(db)
        .await
    }

    #[cfg(test)]
    pub(crate) async fn count_by_username(db: &SqlitePool, username: &str) -> sqlx::Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(db)
            .await
    }
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn create_and_find() {
        let db = test_pool().await;
        let created = User::create(&db, "anna", "hash").await.unwrap();

        let by_name = User::find_by_username(&db, "anna").await.unwrap().unwrap();
        assert_eq!(by_name.id, created.id);
        assert_eq!(by_name.username, "anna");
        assert!(User::find_by_username(&db, "nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_is_a_unique_violation() {
        let db = test_pool().await;
        User::create(&db, "anna", "hash").await.unwrap();
        let err = User::create(&db, "anna", "other").await.unwrap_err();
        assert!(is_unique_violation(&err));
        assert_eq!(User::count_by_username(&db, "anna").await.unwrap(), 1);
    }
}
