//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate prefix shapes and locale membership
//! - Detect a login path that the gate itself would redirect (loop)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: EdgeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue};
use thiserror::Error;

use crate::config::schema::EdgeConfig;
use crate::routing::matcher::PrefixSet;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: prefix {prefix:?} must start with '/'")]
    BadPrefix { field: &'static str, prefix: String },

    #[error("auth.login_path {0:?} must start with '/'")]
    BadLoginPath(String),

    #[error("auth.login_path {0:?} is protected and not public; every login redirect would loop")]
    LoginPathGated(String),

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("locale.supported lists {0:?} more than once")]
    DuplicateLocale(String),

    #[error("locale.supported entry {0:?} is not a valid header value")]
    BadLocaleTag(String),

    #[error("locale.default {0:?} is not in locale.supported")]
    DefaultLocaleUnsupported(String),

    #[error("cookie name {0:?} is used for more than one purpose")]
    CookieCollision(String),

    #[error("edition.namespace {0:?} must start with '/' and not end with '/'")]
    BadNamespace(String),

    #[error("locale.context_header {0:?} is not a valid header name")]
    BadHeaderName(String),

    #[error("{field}: {value:?} is not a socket address")]
    BadAddress { field: &'static str, value: String },
}

/// Check a parsed configuration, collecting every problem.
pub fn validate_config(config: &EdgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_prefixes("routes.protected", &config.routes.protected, &mut errors);
    check_prefixes("routes.public", &config.routes.public, &mut errors);
    check_prefixes("routes.edition_only", &config.routes.edition_only, &mut errors);
    check_prefixes("bypass.prefixes", &config.bypass.prefixes, &mut errors);

    let login = &config.auth.login_path;
    if !login.starts_with('/') {
        errors.push(ValidationError::BadLoginPath(login.clone()));
    } else {
        let protected = PrefixSet::new(config.routes.protected.iter().cloned());
        let public = PrefixSet::new(config.routes.public.iter().cloned());
        if protected.matches(login) && !public.matches(login) {
            errors.push(ValidationError::LoginPathGated(login.clone()));
        }
    }
    if config.auth.next_param.is_empty() {
        errors.push(ValidationError::Empty("auth.next_param"));
    }

    if config.locale.supported.is_empty() {
        errors.push(ValidationError::Empty("locale.supported"));
    }
    let mut seen = HashSet::new();
    for tag in &config.locale.supported {
        if tag.is_empty() {
            errors.push(ValidationError::Empty("locale.supported entry"));
        } else if HeaderValue::from_str(tag).is_err() {
            errors.push(ValidationError::BadLocaleTag(tag.clone()));
        } else if !seen.insert(tag.as_str()) {
            errors.push(ValidationError::DuplicateLocale(tag.clone()));
        }
    }
    if !config.locale.supported.contains(&config.locale.default) {
        errors.push(ValidationError::DefaultLocaleUnsupported(
            config.locale.default.clone(),
        ));
    }
    if HeaderName::from_bytes(config.locale.context_header.as_bytes()).is_err() {
        errors.push(ValidationError::BadHeaderName(
            config.locale.context_header.clone(),
        ));
    }

    let cookies = [
        ("auth.session_cookie", &config.auth.session_cookie),
        ("auth.anonymous_cookie", &config.auth.anonymous_cookie),
        ("locale.cookie", &config.locale.cookie),
    ];
    let mut names = HashSet::new();
    for (field, name) in cookies {
        if name.is_empty() {
            errors.push(ValidationError::Empty(field));
        } else if !names.insert(name.as_str()) {
            errors.push(ValidationError::CookieCollision(name.clone()));
        }
    }

    let ns = &config.edition.namespace;
    if !ns.starts_with('/') || ns.ends_with('/') {
        errors.push(ValidationError::BadNamespace(ns.clone()));
    }

    check_address("listener.bind_address", &config.listener.bind_address, &mut errors);
    check_address("upstream.address", &config.upstream.address, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_prefixes(field: &'static str, prefixes: &[String], errors: &mut Vec<ValidationError>) {
    for prefix in prefixes {
        if !prefix.starts_with('/') {
            errors.push(ValidationError::BadPrefix {
                field,
                prefix: prefix.clone(),
            });
        }
    }
}

fn check_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BadAddress {
            field,
            value: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&EdgeConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = EdgeConfig::default();
        config.routes.protected.push("admin".into());
        config.locale.default = "fr".into();
        config.edition.namespace = "/ee/".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::DefaultLocaleUnsupported("fr".into())));
        assert!(errors.contains(&ValidationError::BadNamespace("/ee/".into())));
    }

    #[test]
    fn test_gated_login_path_rejected() {
        let mut config = EdgeConfig::default();
        config.auth.login_path = "/app/login".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::LoginPathGated("/app/login".into())]);

        // Protected but also public is fine: the gate lets it through.
        config.routes.public.push("/app/login".into());
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_duplicate_locale_and_cookie_collision() {
        let mut config = EdgeConfig::default();
        config.locale.supported = vec!["en".into(), "ko".into(), "en".into()];
        config.locale.cookie = "fastapiusersauth".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::DuplicateLocale("en".into())));
        assert!(errors.contains(&ValidationError::CookieCollision("fastapiusersauth".into())));
    }

    #[test]
    fn test_bad_context_header() {
        let mut config = EdgeConfig::default();
        config.locale.context_header = "x locale".into();
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::BadHeaderName("x locale".into())])
        );
    }

    #[test]
    fn test_locale_tag_must_be_header_value() {
        let mut config = EdgeConfig::default();
        config.locale.supported.push("ko\nx-injected: 1".into());
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::BadLocaleTag("ko\nx-injected: 1".into())])
        );
    }

    #[test]
    fn test_bad_upstream_address() {
        let mut config = EdgeConfig::default();
        config.upstream.address = "renderer".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(
            errors.as_slice(),
            [ValidationError::BadAddress { field: "upstream.address", .. }]
        ));
    }
}
