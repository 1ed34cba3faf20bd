use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use tera::Context;
use tracing::{error, instrument, warn};

use crate::{
    auth::{session::Session, CurrentUser},
    error::AppError,
    state::AppState,
    training::catalog::{self, TrainingTemplate, TIMER_SECONDS},
    views,
    workouts::services,
};

#[derive(Debug, Deserialize)]
pub struct TemplateQuery {
    pub workout_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FinishForm {
    pub finish_workout: Option<String>,
}

pub fn training_routes() -> Router<AppState> {
    Router::new().route("/training_template", get(show).post(finish))
}

/// GET /training_template[?workout_type=<slug>]
///
/// A given type is remembered in the session; without one the remembered
/// type is used. No type at all sends the visitor back to the dashboard.
#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn show(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(q): Query<TemplateQuery>,
) -> Response {
    let template = match q.workout_type.as_deref() {
        Some(requested) => {
            let Some(t) = catalog::find(requested) else {
                warn!(%requested, "unknown training template");
                return Redirect::to("/dashboard").into_response();
            };
            if let Err(e) = Session::set_workout_type(&state.db, &user.session_id, t.slug).await {
                return AppError::from(e).into_response();
            }
            t
        }
        None => match user.workout_type.as_deref().and_then(catalog::find) {
            Some(t) => t,
            None => return Redirect::to("/dashboard").into_response(),
        },
    };

    page(&state, StatusCode::OK, template, None, None)
}

/// POST /training_template. The countdown does not have to be finished.
#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn finish(
    State(state): State<AppState>,
    user: CurrentUser,
    Form(form): Form<FinishForm>,
) -> Response {
    let Some(template) = user.workout_type.as_deref().and_then(catalog::find) else {
        return Redirect::to("/dashboard").into_response();
    };
    if form.finish_workout.is_none() {
        return page(&state, StatusCode::OK, template, None, None);
    }

    match services::create_from_template(&state, user.user_id, template.title).await {
        Ok(_) => {
            let notice = format!("Workout \"{}\" added!", template.title);
            page(&state, StatusCode::OK, template, Some(notice), None)
        }
        Err(e) => {
            // raw driver text is shown on this page, unlike elsewhere
            error!(error = %e, "template workout insert failed");
            let text = format!("Error: {e}");
            page(&state, StatusCode::INTERNAL_SERVER_ERROR, template, None, Some(text))
        }
    }
}

fn page(
    state: &AppState,
    status: StatusCode,
    template: &TrainingTemplate,
    notice: Option<String>,
    error: Option<String>,
) -> Response {
    let mut ctx = Context::new();
    ctx.insert("workout", template);
    ctx.insert("timer_seconds", &TIMER_SECONDS);
    ctx.insert("timer_minutes", &format!("{:02}", TIMER_SECONDS / 60));
    if let Some(notice) = notice {
        ctx.insert("notice", &notice);
    }
    if let Some(error) = error {
        ctx.insert("error", &error);
    }
    views::render_with_status(&state.templates, status, "training_template.html", &ctx)
}
