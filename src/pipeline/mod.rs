//! Edge request pipeline.
//!
//! # Data Flow
//! ```text
//! EdgeRequest
//!     → routing::classify (protected? public?)
//!     → gate.rs        ── RedirectToLogin ──▶ Redirect        (terminal)
//!     → edition.rs     ── Rewrite ─┐
//!     → locale.rs  ◀───────────────┘
//!     → Rewrite { path, locale } | Continue { locale }
//! ```
//!
//! # Design Decisions
//! - Every stage is a pure function of the request and startup config
//! - A redirected request never reaches the rewriter or the resolver
//! - A rewritten request still gets a locale
//! - Exactly one `PipelineResult` per request

pub mod edition;
pub mod gate;
pub mod locale;
pub mod request;

use serde::Serialize;

use crate::config::{ConfigError, EdgeConfig};
use crate::config::validation::validate_config;
use crate::routing::{classify, RouteTable};

pub use edition::{EditionDecision, EditionRewriter};
pub use gate::{AuthGate, Credentials, GateDecision};
pub use locale::{resolve_locale, LocaleSet};
pub use request::EdgeRequest;

/// The single outbound action for a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PipelineResult {
    /// Send the client to `location` (login page with `next`).
    Redirect { location: String },
    /// Serve `path` internally; query and fragment are the original ones.
    Rewrite {
        path: String,
        query: Option<String>,
        fragment: Option<String>,
        locale: String,
    },
    /// Serve the original path.
    Continue { locale: String },
}

impl PipelineResult {
    /// Short label for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            PipelineResult::Redirect { .. } => "redirect",
            PipelineResult::Rewrite { .. } => "rewrite",
            PipelineResult::Continue { .. } => "continue",
        }
    }

    /// Locale to stamp on the forwarded request. Redirects carry none.
    pub fn locale(&self) -> Option<&str> {
        match self {
            PipelineResult::Redirect { .. } => None,
            PipelineResult::Rewrite { locale, .. } | PipelineResult::Continue { locale } => {
                Some(locale.as_str())
            }
        }
    }
}

/// The compiled, immutable pipeline shared by every request.
#[derive(Debug, Clone)]
pub struct EdgePipeline {
    routes: RouteTable,
    gate: AuthGate,
    edition: EditionRewriter,
    locales: LocaleSet,
    locale_cookie: String,
    locale_header: String,
}

impl EdgePipeline {
    /// Validate `config` and compile it.
    pub fn from_config(config: &EdgeConfig) -> Result<Self, ConfigError> {
        validate_config(config).map_err(ConfigError::Validation)?;
        let locales = LocaleSet::from_config(&config.locale)
            .map_err(|e| ConfigError::Validation(vec![e]))?;

        Ok(Self {
            routes: RouteTable::from_config(&config.routes),
            gate: AuthGate::from_config(&config.auth),
            edition: EditionRewriter::from_config(&config.edition, &config.routes),
            locales,
            locale_cookie: config.locale.cookie.clone(),
            locale_header: config.locale.context_header.clone(),
        })
    }

    /// Run classifier → gate → rewriter → resolver.
    pub fn evaluate(&self, request: &EdgeRequest) -> PipelineResult {
        let classification = classify(&request.path, &self.routes);
        let credentials = self.gate.credentials(request);

        if let GateDecision::RedirectToLogin { location } =
            self.gate.authorize(request, classification, credentials)
        {
            tracing::debug!(path = %request.path, location = %location, "Login required");
            return PipelineResult::Redirect { location };
        }

        let rewritten = match self.edition.rewrite_for_edition(&request.path) {
            EditionDecision::Rewrite { path } => Some(path),
            EditionDecision::NoRewrite => None,
        };

        let locale = resolve_locale(request.cookie(&self.locale_cookie), &self.locales).to_string();

        match rewritten {
            Some(path) => {
                tracing::debug!(from = %request.path, to = %path, locale = %locale, "Edition rewrite");
                PipelineResult::Rewrite {
                    path,
                    query: request.query.clone(),
                    fragment: request.fragment.clone(),
                    locale,
                }
            }
            None => PipelineResult::Continue { locale },
        }
    }

    pub fn locales(&self) -> &LocaleSet {
        &self.locales
    }

    pub fn locale_cookie(&self) -> &str {
        &self.locale_cookie
    }

    /// Request header the resolved locale is written to.
    pub fn locale_header(&self) -> &str {
        &self.locale_header
    }

    pub fn edition_enabled(&self) -> bool {
        self.edition.enabled()
    }
}
