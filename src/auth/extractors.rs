use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;
use uuid::Uuid;

use super::session::{token_from_headers, Session};
use crate::{error::AppError, state::AppState};

/// Identity of the logged-in visitor, resolved from the session cookie.
///
/// Any protected handler takes this as an argument; without a live session the
/// request is redirected to `/login` before the handler runs.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub session_id: String,
    pub user_id: Uuid,
    pub username: String,
    pub workout_type: Option<String>,
}

impl From<Session> for CurrentUser {
    fn from(s: Session) -> Self {
        Self {
            session_id: s.id,
            user_id: s.user_id,
            username: s.username,
            workout_type: s.workout_type,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = token_from_headers(&parts.headers) else {
            debug!(uri = %parts.uri, "no session cookie");
            return Err(Redirect::to("/login").into_response());
        };

        match Session::find_active(&state.db, &token).await {
            Ok(Some(session)) => Ok(session.into()),
            Ok(None) => {
                debug!(uri = %parts.uri, "unknown or expired session");
                Err(Redirect::to("/login").into_response())
            }
            Err(e) => Err(AppError::from(e).into_response()),
        }
    }
}
