use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use tera::Context;
use tracing::{error, info, instrument};

use crate::{
    auth::{
        dto::CredentialsForm,
        extractors::CurrentUser,
        repo_types::User,
        services,
        session::{clear_cookie, set_cookie, token_from_headers, Session},
    },
    error::AppError,
    state::AppState,
    views,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/register", get(register_page).post(register))
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout))
}

#[instrument(skip_all)]
pub async fn index(State(state): State<AppState>, user: Option<CurrentUser>) -> Response {
    if user.is_some() {
        return Redirect::to("/dashboard").into_response();
    }
    let mut ctx = Context::new();
    ctx.insert("contact_telegram", &state.config.contact_telegram);
    ctx.insert("contact_whatsapp", &state.config.contact_whatsapp);
    views::render_with_status(&state.templates, axum::http::StatusCode::OK, "index.html", &ctx)
}

pub async fn register_page(State(state): State<AppState>) -> Response {
    form_page(&state, "register.html", None, None)
}

pub async fn login_page(State(state): State<AppState>) -> Response {
    form_page(&state, "login.html", None, None)
}

#[instrument(skip_all, fields(username = %form.username))]
pub async fn register(State(state): State<AppState>, Form(form): Form<CredentialsForm>) -> Response {
    match services::register(&state.db, &form.username, &form.password).await {
        Ok(user) => start_session(&state, &user).await,
        Err(e) if e.is_client_error() => form_page(&state, "register.html", Some(&form.username), Some(e)),
        Err(e) => e.into_response(),
    }
}

#[instrument(skip_all, fields(username = %form.username))]
pub async fn login(State(state): State<AppState>, Form(form): Form<CredentialsForm>) -> Response {
    match services::authenticate(&state.db, &form.username, &form.password).await {
        Ok(user) => start_session(&state, &user).await,
        Err(e) if e.is_client_error() => form_page(&state, "login.html", Some(&form.username), Some(e)),
        Err(e) => e.into_response(),
    }
}

#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = token_from_headers(&headers) {
        if let Err(e) = Session::delete(&state.db, &token).await {
            error!(error = %e, "delete session failed");
            return AppError::from(e).into_response();
        }
        info!("session closed");
    }
    ([(header::SET_COOKIE, clear_cookie())], Redirect::to("/")).into_response()
}

async fn start_session(state: &AppState, user: &User) -> Response {
    let ttl = state.config.session_ttl_minutes;
    match Session::create(&state.db, user.id, &user.username, ttl).await {
        Ok(session) => (
            [(header::SET_COOKIE, set_cookie(&session, ttl))],
            Redirect::to("/dashboard"),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, user_id = %user.id, "create session failed");
            AppError::from(e).into_response()
        }
    }
}

fn form_page(state: &AppState, template: &str, username: Option<&str>, err: Option<AppError>) -> Response {
    let mut ctx = Context::new();
    if let Some(username) = username {
        ctx.insert("username", username);
    }
    let status = match &err {
        Some(e) => {
            ctx.insert("error", &e.public_message());
            e.status()
        }
        None => axum::http::StatusCode::OK,
    };
    views::render_with_status(&state.templates, status, template, &ctx)
}
