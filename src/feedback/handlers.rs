use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use tracing::instrument;

use crate::{
    feedback::services::{self, FeedbackForm},
    state::AppState,
    views,
};

pub fn feedback_routes() -> Router<AppState> {
    Router::new().route("/send_feedback", get(|| async { Redirect::to("/") }).post(send_feedback))
}

#[instrument(skip_all)]
pub async fn send_feedback(State(state): State<AppState>, Form(form): Form<FeedbackForm>) -> Response {
    match services::send(state.mailer.as_deref(), &form).await {
        Ok(()) => views::message(
            &state.templates,
            StatusCode::OK,
            "Thank you",
            "Thank you for your message! We will get back to you soon.",
        ),
        Err(e) if e.is_client_error() => {
            views::message(&state.templates, e.status(), "Feedback", &e.public_message())
        }
        Err(e) => views::message(
            &state.templates,
            e.status(),
            "Feedback",
            "Failed to send the message. Please try again.",
        ),
    }
    .into_response()
}
