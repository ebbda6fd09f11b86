//! Authentication gate.
//!
//! Presence-based triage only: a protected route needs *a* session cookie,
//! authenticated or anonymous. Whether the cookie is valid is the identity
//! provider's problem, checked later by the pages themselves.

use url::form_urlencoded;

use crate::config::AuthConfig;
use crate::pipeline::request::EdgeRequest;
use crate::routing::Classification;

/// Which session signals a request carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Credentials {
    pub session: bool,
    pub anonymous: bool,
}

impl Credentials {
    pub fn any(&self) -> bool {
        self.session || self.anonymous
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    RedirectToLogin { location: String },
}

/// Redirects unauthenticated requests for protected routes to the login page.
#[derive(Debug, Clone)]
pub struct AuthGate {
    login_path: String,
    next_param: String,
    session_cookie: String,
    anonymous_cookie: String,
}

impl AuthGate {
    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            login_path: config.login_path.clone(),
            next_param: config.next_param.clone(),
            session_cookie: config.session_cookie.clone(),
            anonymous_cookie: config.anonymous_cookie.clone(),
        }
    }

    /// Read the two session cookies. Empty values count as absent.
    pub fn credentials(&self, request: &EdgeRequest) -> Credentials {
        Credentials {
            session: request.cookie(&self.session_cookie).is_some(),
            anonymous: request.cookie(&self.anonymous_cookie).is_some(),
        }
    }

    pub fn authorize(
        &self,
        request: &EdgeRequest,
        classification: Classification,
        credentials: Credentials,
    ) -> GateDecision {
        if classification.requires_session() && !credentials.any() {
            GateDecision::RedirectToLogin {
                location: self.login_location(&request.full_path()),
            }
        } else {
            GateDecision::Allow
        }
    }

    /// `<login_path>?<next_param>=<form-encoded original target>`.
    pub fn login_location(&self, original: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair(&self.next_param, original)
            .finish();
        format!("{}?{}", self.login_path, query)
    }
}
