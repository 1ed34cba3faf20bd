use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use tera::Context;
use tracing::instrument;

use crate::{
    auth::CurrentUser,
    state::AppState,
    views,
    workouts::{
        dto::{AddWorkoutForm, DeleteParams},
        services,
    },
};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/delete_workout", get(delete_workout))
}

pub fn write_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/add_workout", get(add_workout_page).post(add_workout))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

pub async fn add_workout_page(State(state): State<AppState>, _user: CurrentUser) -> Response {
    views::render_with_status(&state.templates, StatusCode::OK, "add_workout.html", &Context::new())
}

/// POST /add_workout (multipart: date, workout_type, duration, notes, image?)
#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn add_workout(
    State(state): State<AppState>,
    user: CurrentUser,
    mp: Multipart,
) -> Response {
    let form = AddWorkoutForm::from_multipart(mp).await;
    match services::create_full(&state, user.user_id, form).await {
        Ok(_) => Redirect::to("/dashboard").into_response(),
        Err(e) if e.is_client_error() => {
            let mut ctx = Context::new();
            ctx.insert("error", &e.public_message());
            views::render_with_status(&state.templates, e.status(), "add_workout.html", &ctx)
        }
        Err(e) => e.into_response(),
    }
}

/// GET /delete_workout?id=<uuid>. Always lands back on the dashboard.
#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn delete_workout(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<DeleteParams>,
) -> Response {
    let raw_id = params.id.unwrap_or_default();
    match services::delete(&state, user.user_id, &raw_id).await {
        Ok(_) => Redirect::to("/dashboard").into_response(),
        Err(e) => e.into_response(),
    }
}
