use anyhow::Context;

use fitlog::{app, auth::session::Session, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "fitlog=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    // an unreachable database ends the process here
    let state = AppState::init().await.context("initialise application state")?;

    match Session::purge_expired(&state.db).await {
        Ok(n) if n > 0 => tracing::info!(purged = n, "expired sessions removed"),
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "could not purge expired sessions"),
    }

    let (host, port) = (state.config.host.clone(), state.config.port);
    app::serve(app::build_app(state), &host, port).await
}
