//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the edge
//! gate. All types derive Serde traits for deserialization from config files,
//! and every section defaults to the production route tables so an empty file
//! is a valid deployment.

use serde::{Deserialize, Serialize};

/// Root configuration for the edge gate.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EdgeConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Page renderer that allowed requests are forwarded to.
    pub upstream: UpstreamConfig,

    /// Protected, public and edition-only path prefixes.
    pub routes: RouteTableConfig,

    /// Login redirect and session cookie names.
    pub auth: AuthConfig,

    /// Edition feature flag and namespace.
    pub edition: EditionConfig,

    /// Supported locales and the locale cookie/header names.
    pub locale: LocaleConfig,

    /// Paths that skip the pipeline entirely.
    pub bypass: BypassConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream renderer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Renderer address (e.g., "127.0.0.1:3000").
    pub address: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Route prefix tables.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouteTableConfig {
    /// Prefixes that require a session cookie.
    pub protected: Vec<String>,

    /// Prefixes that never require a session cookie. Wins over `protected`.
    pub public: Vec<String>,

    /// Prefixes served from the edition namespace when the flag is on.
    pub edition_only: Vec<String>,
}

impl Default for RouteTableConfig {
    fn default() -> Self {
        Self {
            protected: strings(&["/app", "/admin", "/assistants", "/connector"]),
            public: strings(&["/auth", "/anonymous", "/_next", "/api"]),
            edition_only: strings(&[
                "/admin/groups",
                "/admin/performance/usage",
                "/admin/performance/query-history",
                "/admin/theme",
                "/admin/performance/custom-analytics",
                "/admin/standard-answer",
                "/assistants/stats",
            ]),
        }
    }
}

/// Authentication gate configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Where unauthenticated requests are sent.
    pub login_path: String,

    /// Query parameter carrying the original request on the login redirect.
    pub next_param: String,

    /// Cookie set by the identity provider for signed-in users.
    pub session_cookie: String,

    /// Cookie set for anonymous-access sessions.
    pub anonymous_cookie: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            login_path: "/auth/login".to_string(),
            next_param: "next".to_string(),
            session_cookie: "fastapiusersauth".to_string(),
            anonymous_cookie: "onyx_anonymous_user".to_string(),
        }
    }
}

/// Edition rewriting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EditionConfig {
    /// Whether the paid enterprise edition is deployed.
    /// Overridable via `ENABLE_PAID_ENTERPRISE_EDITION_FEATURES`.
    pub paid_enterprise_features_enabled: bool,

    /// Internal namespace edition routes are rewritten into.
    pub namespace: String,
}

impl Default for EditionConfig {
    fn default() -> Self {
        Self {
            paid_enterprise_features_enabled: false,
            namespace: "/ee".to_string(),
        }
    }
}

/// Locale negotiation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Supported locale tags, in display order.
    pub supported: Vec<String>,

    /// Tag used when the cookie is absent or unsupported.
    pub default: String,

    /// Cookie holding the user's locale preference.
    pub cookie: String,

    /// Request header the resolved locale is stamped into.
    pub context_header: String,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            supported: strings(&["en", "ko"]),
            default: "en".to_string(),
            cookie: "NEXT_LOCALE".to_string(),
            context_header: "x-next-intl-locale".to_string(),
        }
    }
}

/// Static asset and infrastructure paths that skip the pipeline.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BypassConfig {
    /// Prefixes forwarded untouched.
    pub prefixes: Vec<String>,

    /// Forward any path containing a `.` untouched (files).
    pub skip_dotted_paths: bool,
}

impl Default for BypassConfig {
    fn default() -> Self {
        Self {
            prefixes: strings(&["/_next", "/_vercel"]),
            skip_dotted_paths: true,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_yields_defaults() {
        let config: EdgeConfig = toml::from_str("").unwrap();
        assert_eq!(config.auth.login_path, "/auth/login");
        assert_eq!(config.locale.supported, vec!["en", "ko"]);
        assert_eq!(config.routes.edition_only.len(), 7);
        assert!(!config.edition.paid_enterprise_features_enabled);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: EdgeConfig = toml::from_str(
            r#"
            [edition]
            paid_enterprise_features_enabled = true

            [locale]
            supported = ["en", "ko", "ja"]
            "#,
        )
        .unwrap();
        assert!(config.edition.paid_enterprise_features_enabled);
        assert_eq!(config.edition.namespace, "/ee");
        assert_eq!(config.locale.supported.len(), 3);
        assert_eq!(config.locale.cookie, "NEXT_LOCALE");
    }
}
