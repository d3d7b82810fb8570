use crate::registry::Registry;
use crate::request::{ComponentRequest, ComponentResponse, Context};
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use std::sync::Arc;

/// Serves a [`Registry`] from axum.
#[derive(Clone)]
pub struct AxumComponentAdapter {
    registry: Arc<Registry>,
}

impl AxumComponentAdapter {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Router answering every method under the registry's base path.
    pub fn router<S>(&self) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        Router::new()
            .route(&route_pattern(self.registry.base_path()), any(serve_component))
            .with_state(self.registry.clone())
    }

    /// Merges the component routes into an existing application router.
    pub fn mount<S>(&self, app: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        app.merge(self.router::<S>())
    }

    pub async fn handle(&self, request: Request) -> Response {
        serve_component(State(self.registry.clone()), request).await
    }
}

/// Catch-all below `base`; a root mount (`""`) yields `/{*rest}`.
fn route_pattern(base: &str) -> String {
    format!("{base}/{{*rest}}")
}

async fn serve_component(State(registry): State<Arc<Registry>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, registry.max_body_bytes()).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(error = %err, path = %parts.uri.path(), "rejected component request body");
            return (StatusCode::PAYLOAD_TOO_LARGE, "request body too large").into_response();
        }
    };
    let req = ComponentRequest::from_parts(parts.method, &parts.uri, parts.headers, bytes.to_vec());
    let ctx = Context::from_extensions(parts.extensions);

    // Hydration and actions are synchronous and may block on I/O.
    match tokio::task::spawn_blocking(move || registry.handle(&ctx, &req)).await {
        Ok(response) => response.into_response(),
        Err(err) => {
            tracing::error!(error = %err, "component task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
        }
    }
}

impl IntoResponse for ComponentResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
