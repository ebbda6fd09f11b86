//! Locale negotiation.
//!
//! The locale never appears in the URL. The resolver reads the preference
//! cookie and the result is stamped into a request header for the renderer.
//! Writing the cookie belongs to the language switcher in the UI; the cookie
//! format it writes is described here so both sides agree on it.

use crate::config::validation::ValidationError;
use crate::config::LocaleConfig;

/// Seconds the preference cookie lives: one year.
pub const PREFERENCE_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 365;

/// The closed set of supported locale tags plus the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSet {
    supported: Vec<String>,
    default: String,
}

impl LocaleSet {
    pub fn new<I, S>(supported: I, default: impl Into<String>) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let supported: Vec<String> = supported.into_iter().map(Into::into).collect();
        let default = default.into();
        if supported.is_empty() {
            return Err(ValidationError::Empty("locale.supported"));
        }
        if !supported.contains(&default) {
            return Err(ValidationError::DefaultLocaleUnsupported(default));
        }
        Ok(Self { supported, default })
    }

    pub fn from_config(config: &LocaleConfig) -> Result<Self, ValidationError> {
        Self::new(config.supported.iter().cloned(), config.default.clone())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.supported.iter().any(|s| s == tag)
    }

    pub fn default_locale(&self) -> &str {
        &self.default
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.supported.iter().map(String::as_str)
    }

    /// The locale after `tag` in display order, wrapping around. Unknown tags
    /// start from the default. This is the language switcher's toggle.
    pub fn next_after(&self, tag: &str) -> &str {
        let current = self.resolve(Some(tag));
        let idx = self
            .supported
            .iter()
            .position(|s| s == current)
            .unwrap_or(0);
        &self.supported[(idx + 1) % self.supported.len()]
    }

    fn resolve(&self, cookie: Option<&str>) -> &str {
        match cookie {
            Some(value) => self
                .supported
                .iter()
                .find(|s| *s == value)
                .map(String::as_str)
                .unwrap_or(&self.default),
            None => &self.default,
        }
    }
}

/// The cookie value when it names a supported locale, the default otherwise.
pub fn resolve_locale<'a>(cookie: Option<&str>, locales: &'a LocaleSet) -> &'a str {
    locales.resolve(cookie)
}

/// `Set-Cookie` value the language switcher writes. `None` for unsupported tags.
pub fn preference_cookie(cookie_name: &str, tag: &str, locales: &LocaleSet) -> Option<String> {
    if !locales.contains(tag) {
        return None;
    }
    Some(format!(
        "{cookie_name}={tag}; Path=/; Max-Age={PREFERENCE_MAX_AGE_SECS}; SameSite=Lax"
    ))
}
