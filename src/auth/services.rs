use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::auth::{
    password::{hash_password, verify_password},
    repo::is_unique_violation,
    repo_types::User,
};
use crate::error::AppError;

/// Create an account. Uniqueness is left to the `users.username` constraint.
pub async fn register(db: &SqlitePool, username: &str, password: &str) -> Result<User, AppError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Username and password must not be empty.".into(),
        ));
    }

    let hash = hash_password(password)?;

    match User::create(db, username, &hash).await {
        Ok(user) => {
            info!(user_id = %user.id, username = %user.username, "user registered");
            Ok(user)
        }
        Err(e) if is_unique_violation(&e) => {
            warn!(%username, "username already taken");
            Err(AppError::Conflict("A user with this name already exists.".into()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Check credentials. Unknown user and wrong password look the same to the caller.
pub async fn authenticate(db: &SqlitePool, username: &str, password: &str) -> Result<User, AppError> {
    let username = username.trim();
    let Some(user) = User::find_by_username(db, username).await? else {
        warn!(%username, "login unknown user");
        return Err(AppError::AuthenticationFailed);
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::AuthenticationFailed);
    }

    info!(user_id = %user.id, "user logged in");
    Ok(user)
}
