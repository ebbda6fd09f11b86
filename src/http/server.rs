//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the edge pipeline in front of the forwarder
//! - Wire up middleware (tracing, timeout, request ID)
//! - Forward allowed requests to the upstream renderer
//! - Serve until the shutdown coordinator fires

use std::str::FromStr;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{
        uri::{Authority, PathAndQuery, Scheme},
        Request, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::validation::ValidationError;
use crate::config::{ConfigError, EdgeConfig};
use crate::http::middleware::{with_edge_pipeline, EdgeState};
use crate::http::request::{UuidRequestId, X_REQUEST_ID};
use crate::lifecycle::shutdown::triggered;
use crate::observability::metrics;

/// State for the forwarding handler.
#[derive(Clone)]
pub struct ForwardState {
    pub client: Client<HttpConnector, Body>,
    pub upstream: Authority,
}

/// HTTP server for the edge gate.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Compile the pipeline and build the app. Fails on invalid config.
    pub fn new(config: EdgeConfig) -> Result<Self, ConfigError> {
        let edge = EdgeState::from_config(&config)?;
        let upstream = Authority::from_str(&config.upstream.address).map_err(|_| {
            ConfigError::Validation(vec![ValidationError::BadAddress {
                field: "upstream.address",
                value: config.upstream.address.clone(),
            }])
        })?;

        tracing::info!(
            upstream = %upstream,
            edition_enabled = edge.pipeline().edition_enabled(),
            default_locale = edge.pipeline().locales().default_locale(),
            "Edge pipeline compiled"
        );

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        let router = Self::build_router(&config, edge, ForwardState { client, upstream });
        Ok(Self { router })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &EdgeConfig, edge: EdgeState, forward: ForwardState) -> Router {
        let upstream = Router::new().fallback(forward_handler).with_state(forward);

        with_edge_pipeline(upstream, edge)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
            .layer(TraceLayer::new_for_http())
    }

    /// The assembled app, for serving elsewhere or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(triggered(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Forward the (possibly rewritten) request to the renderer.
async fn forward_handler(State(state): State<ForwardState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let (mut parts, body) = request.into_parts();

    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.scheme = Some(Scheme::HTTP);
    uri_parts.authority = Some(state.upstream.clone());
    if uri_parts.path_and_query.is_none() {
        uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    parts.uri = match Uri::from_parts(uri_parts) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!(error = %e, "Could not build upstream URI");
            metrics::record_request(method.as_str(), 502, start);
            return (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response();
        }
    };

    tracing::debug!(method = %method, uri = %parts.uri, "Forwarding request");

    match state.client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            let response: axum::http::Response<hyper::body::Incoming> = response;
            metrics::record_request(method.as_str(), response.status().as_u16(), start);
            response.map(Body::new)
        }
        Err(e) => {
            tracing::warn!(error = %e, upstream = %state.upstream, "Upstream error");
            metrics::record_request(method.as_str(), 502, start);
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}
