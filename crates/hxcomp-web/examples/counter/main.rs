//! Counter demo: `cargo run -p hxcomp-web --example counter --features axum`.
//!
//! Set `HXCOMP_SECRET` to keep tokens valid across restarts.

mod counter;

use axum::Router;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use counter::{Counter, CounterProps, CounterRoutes};
use hxcomp_web::adapters::axum::AxumComponentAdapter;
use hxcomp_web::flash::TOAST_CONTAINER;
use hxcomp_web::{Component, Context, Registry, RegistryConfig};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const HTMX_SCRIPT: &str = r#"<script src="https://unpkg.com/htmx.org@2.0.4"></script>"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = RegistryConfig::from_env();
    let registry = Registry::new(&config)?;
    let counter = Counter::new(&registry);
    registry.add_routed(counter.clone(), CounterRoutes)?;

    let adapter = AxumComponentAdapter::new(Arc::new(registry));
    let app = adapter.mount(Router::new().route("/", get(index)).with_state(Arc::new(counter)));

    let port = std::env::var("PORT").ok().and_then(|p| p.parse::<u16>().ok()).unwrap_or(3000);
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    println!("hxcomp counter");
    println!("URL:  http://localhost:{port}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn index(State(counter): State<Arc<Counter>>) -> Response {
    match counter.render(&Context::new(), &CounterProps::default()) {
        Ok(body) => Html(page(&body)).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to render counter page");
            (axum::http::StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
        }
    }
}

fn page(body: &str) -> String {
    format!(
        r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<title>hxcomp counter</title>
{HTMX_SCRIPT}
</head>
<body>
{TOAST_CONTAINER}
{body}
</body>
</html>
"#
    )
}
