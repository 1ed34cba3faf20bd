use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::state::AppState;
use crate::{auth, dashboard, feedback, training, workouts};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(workouts::router(state.config.max_upload_bytes))
        .merge(training::router())
        .merge(feedback::router())
        .route("/health", get(|| async { "ok" }))
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, ?latency, "response");
                        } else {
                            tracing::info!(%status, ?latency, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, host: &str, port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
