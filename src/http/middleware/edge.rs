//! Edge pipeline middleware.
//!
//! Runs the pipeline ahead of routing and turns its result into HTTP:
//! a 307 to the login page, an internal URI rewrite, or a pass-through. Both
//! forwarded variants carry the resolved locale in the context header.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, uri::PathAndQuery, HeaderName, HeaderValue, Request, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};

use crate::config::schema::BypassConfig;
use crate::config::{ConfigError, EdgeConfig};
use crate::config::validation::ValidationError;
use crate::observability::metrics;
use crate::pipeline::{EdgePipeline, EdgeRequest, PipelineResult};
use crate::routing::PrefixSet;

/// Static asset and infrastructure paths the pipeline never sees.
#[derive(Debug, Clone)]
pub struct BypassRule {
    prefixes: PrefixSet,
    skip_dotted_paths: bool,
}

impl BypassRule {
    pub fn from_config(config: &BypassConfig) -> Self {
        Self {
            prefixes: PrefixSet::new(config.prefixes.iter().cloned()),
            skip_dotted_paths: config.skip_dotted_paths,
        }
    }

    pub fn bypasses(&self, path: &str) -> bool {
        self.prefixes.matches(path) || (self.skip_dotted_paths && path.contains('.'))
    }
}

/// State shared by every invocation of the middleware.
#[derive(Clone)]
pub struct EdgeState {
    pipeline: Arc<EdgePipeline>,
    bypass: Arc<BypassRule>,
    locale_header: HeaderName,
}

impl EdgeState {
    pub fn new(pipeline: Arc<EdgePipeline>, bypass: BypassRule) -> Result<Self, ConfigError> {
        let locale_header = HeaderName::from_str(pipeline.locale_header()).map_err(|_| {
            ConfigError::Validation(vec![ValidationError::BadHeaderName(
                pipeline.locale_header().to_string(),
            )])
        })?;
        Ok(Self {
            pipeline,
            bypass: Arc::new(bypass),
            locale_header,
        })
    }

    pub fn from_config(config: &EdgeConfig) -> Result<Self, ConfigError> {
        let pipeline = Arc::new(EdgePipeline::from_config(config)?);
        Self::new(pipeline, BypassRule::from_config(&config.bypass))
    }

    pub fn pipeline(&self) -> &EdgePipeline {
        &self.pipeline
    }
}

/// Wrap `inner` so the pipeline runs before `inner` routes the request.
/// A rewritten request is routed exactly as if the client had asked for the
/// rewritten path.
pub fn with_edge_pipeline(inner: Router, state: EdgeState) -> Router {
    Router::new()
        .fallback_service(inner)
        .layer(middleware::from_fn_with_state(state, edge_middleware))
}

pub async fn edge_middleware(
    State(state): State<EdgeState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let edge_request = EdgeRequest::from_http(&request);

    // Everything downstream sees the resolved path, never the raw one.
    if edge_request.path != request.uri().path() {
        tracing::debug!(from = %request.uri().path(), to = %edge_request.path, "Resolved dot segments");
        if let Err(response) = set_path(&mut request, &edge_request.path) {
            return response;
        }
    }

    if state.bypass.bypasses(&edge_request.path) {
        metrics::record_decision("bypass");
        return next.run(request).await;
    }

    let result = state.pipeline.evaluate(&edge_request);
    metrics::record_decision(result.outcome());

    match result {
        PipelineResult::Redirect { location } => redirect(&location),
        PipelineResult::Rewrite { path, locale, .. } => {
            if let Err(response) = set_path(&mut request, &path) {
                return response;
            }
            stamp_locale(&mut request, &state.locale_header, &locale);
            next.run(request).await
        }
        PipelineResult::Continue { locale } => {
            stamp_locale(&mut request, &state.locale_header, &locale);
            next.run(request).await
        }
    }
}

fn set_path(request: &mut Request<Body>, path: &str) -> Result<(), Response> {
    match rewrite_uri(request.uri(), path) {
        Ok(uri) => {
            *request.uri_mut() = uri;
            Ok(())
        }
        Err(e) => {
            tracing::error!(path = %path, error = %e, "Rewritten path is not a valid URI");
            Err(StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
    }
}

fn redirect(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, value)]).into_response(),
        Err(_) => {
            tracing::error!(location = %location, "Login location is not a valid header value");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Replace the path of `uri`, keeping scheme, authority and query.
pub fn rewrite_uri(uri: &Uri, path: &str) -> Result<Uri, axum::http::Error> {
    let path_and_query = match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    };
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::from_str(&path_and_query)?);
    Ok(Uri::from_parts(parts)?)
}

fn stamp_locale(request: &mut Request<Body>, header: &HeaderName, locale: &str) {
    // Tags are checked as header values when the config is validated.
    match HeaderValue::from_str(locale) {
        Ok(value) => {
            request.headers_mut().insert(header.clone(), value);
        }
        Err(_) => tracing::warn!(locale = %locale, "Locale is not a valid header value; not stamped"),
    }
}
