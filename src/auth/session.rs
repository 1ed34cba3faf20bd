//! Server-side sessions keyed by an opaque cookie token.

use axum::http::{header, HeaderMap};
use rand::distributions::{Alphanumeric, DistString};
use sqlx::{FromRow, SqlitePool};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::db::now_utc;

pub const SESSION_COOKIE: &str = "session";
const TOKEN_LEN: usize = 48;

#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: String,
    pub user_id: Uuid,
    pub username: String,
    /// Workout picked in the guided training flow.
    pub workout_type: Option<String>,
    pub expires_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= OffsetDateTime::now_utc()
    }

    pub async fn create(
        db: &SqlitePool,
        user_id: Uuid,
        username: &str,
        ttl_minutes: i64,
    ) -> sqlx::Result<Session> {
        let now = now_utc();
        let session = Session {
            id: Alphanumeric.sample_string(&mut rand::thread_rng(), TOKEN_LEN),
            user_id,
            username: username.to_string(),
            workout_type: None,
            expires_at: now + Duration::minutes(ttl_minutes),
            created_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, username, workout_type, expires_at, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&session.id)
        .bind(session.user_id)
        .bind(&session.username)
        .bind(&session.workout_type)
        .bind(session.expires_at)
        .bind(session.created_at)
        .execute(db)
        .await?;

        Ok(session)
    }

    /// Look up a live session. An expired one is removed and reported as absent.
    pub async fn find_active(db: &SqlitePool, id: &str) -> sqlx::Result<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, user_id, username, workout_type, expires_at, created_at
            FROM sessions
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        match session {
            Some(s) if s.is_expired() => {
                Session::delete(db, &s.id).await?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    pub async fn delete(db: &SqlitePool, id: &str) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }

    pub async fn set_workout_type(db: &SqlitePool, id: &str, workout_type: &str) -> sqlx::Result<()> {
        sqlx::query("UPDATE sessions SET workout_type = ? WHERE id = ?")
            .bind(workout_type)
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }

    pub async fn purge_expired(db: &SqlitePool) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE julianday(expires_at) <= julianday(?)")
            .bind(now_utc())
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}

/// Session token from the `Cookie` header, if any.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

pub fn set_cookie(session: &Session, ttl_minutes: i64) -> String {
    format!(
        "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        session.id,
        ttl_minutes * 60
    )
}

pub fn clear_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo_types::User;
    use crate::db::test_pool;
    use axum::http::HeaderValue;

    #[tokio::test]
    async fn create_find_delete() {
        let db = test_pool().await;
        let user = User::create(&db, "anna", "hash").await.unwrap();

        let session = Session::create(&db, user.id, "anna", 60).await.unwrap();
        assert_eq!(session.id.len(), TOKEN_LEN);

        let found = Session::find_active(&db, &session.id).await.unwrap().unwrap();
        assert_eq!(found.user_id, user.id);
        assert_eq!(found.username, "anna");
        assert!(found.workout_type.is_none());

        Session::delete(&db, &session.id).await.unwrap();
        assert!(Session::find_active(&db, &session.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_session_is_dropped() {
        let db = test_pool().await;
        let user = User::create(&db, "anna", "hash").await.unwrap();
        let session = Session::create(&db, user.id, "anna", -1).await.unwrap();

        assert!(Session::find_active(&db, &session.id).await.unwrap().is_none());
        let left: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
            .fetch_one(&db)
            .await
            .unwrap();
        assert_eq!(left, 0);
    }

    #[tokio::test]
    async fn purge_removes_only_expired() {
        let db = test_pool().await;
        let user = User::create(&db, "anna", "hash").await.unwrap();
        Session::create(&db, user.id, "anna", -5).await.unwrap();
        let live = Session::create(&db, user.id, "anna", 60).await.unwrap();

        assert_eq!(Session::purge_expired(&db).await.unwrap(), 1);
        assert!(Session::find_active(&db, &live.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn workout_type_is_remembered() {
        let db = test_pool().await;
        let user = User::create(&db, "anna", "hash").await.unwrap();
        let session = Session::create(&db, user.id, "anna", 60).await.unwrap();

        Session::set_workout_type(&db, &session.id, "yoga").await.unwrap();
        let found = Session::find_active(&db, &session.id).await.unwrap().unwrap();
        assert_eq!(found.workout_type.as_deref(), Some("yoga"));
    }

    #[test]
    fn reads_token_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session=abc123; lang=en"),
        );
        assert_eq!(token_from_headers(&headers).as_deref(), Some("abc123"));

        headers.insert(header::COOKIE, HeaderValue::from_static("session="));
        assert!(token_from_headers(&headers).is_none());
        assert!(token_from_headers(&HeaderMap::new()).is_none());
    }

    #[test]
    fn cookie_strings() {
        let session = Session {
            id: "tok".into(),
            user_id: Uuid::new_v4(),
            username: "anna".into(),
            workout_type: None,
            expires_at: OffsetDateTime::now_utc(),
            created_at: OffsetDateTime::now_utc(),
        };
        assert_eq!(
            set_cookie(&session, 2),
            "session=tok; Path=/; HttpOnly; SameSite=Lax; Max-Age=120"
        );
        assert!(clear_cookie().contains("Max-Age=0"));
    }
}
