pub mod handlers;
pub mod mailer;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::feedback_routes()
}
