use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tera::Context;
use time::{macros::format_description, OffsetDateTime};
use tracing::instrument;

use crate::{
    auth::CurrentUser,
    dashboard::services,
    error::AppResult,
    state::AppState,
    training::catalog::TEMPLATES,
    views,
    workouts::{dto::WorkoutListItem, repo, repo_types::Workout},
};

const RECENT_LIMIT: i64 = 10;

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn dashboard(State(state): State<AppState>, user: CurrentUser) -> Response {
    match render(&state, &user).await {
        Ok(resp) => resp,
        Err(e) => e.into_response(),
    }
}

async fn render(state: &AppState, user: &CurrentUser) -> AppResult<Response> {
    let today = OffsetDateTime::now_utc().date();
    let summary = services::summary(&state.db, user.user_id, today).await?;
    let recent: Vec<WorkoutListItem> = repo::list_recent(&state.db, user.user_id, RECENT_LIMIT)
        .await?
        .into_iter()
        .map(|w| list_item(state, w))
        .collect();

    let mut ctx = Context::new();
    ctx.insert("username", &user.username);
    ctx.insert("summary", &summary);
    ctx.insert("labels_json", &serde_json::to_string(&summary.labels()).map_err(anyhow::Error::from)?);
    ctx.insert("counts_json", &serde_json::to_string(&summary.counts()).map_err(anyhow::Error::from)?);
    ctx.insert("templates", &TEMPLATES);
    ctx.insert("recent", &recent);

    let html = views::render(&state.templates, "dashboard.html", &ctx)?;
    Ok((StatusCode::OK, html).into_response())
}

fn list_item(state: &AppState, w: Workout) -> WorkoutListItem {
    WorkoutListItem {
        id: w.id.to_string(),
        date: w
            .workout_date
            .format(format_description!("[year]-[month]-[day]"))
            .unwrap_or_default(),
        workout_type: w.workout_type,
        duration_minutes: w.duration_minutes,
        notes: w.notes.unwrap_or_default(),
        image_url: w.image.as_deref().map(|key| state.storage.public_url(key)),
    }
}
