//! Inbound request descriptor.
//!
//! The pipeline never sees an axum request directly; it reads an
//! [`EdgeRequest`] built from one (or from a raw target string, for the CLI
//! and tests). Only the path, query, fragment, cookies and headers matter.
//!
//! The path is resolved the way a browser's URL parser resolves it before any
//! prefix is matched: `.` and `..` segments (including `%2e` spellings) are
//! collapsed, so `/auth/../app/chat` is classified as `/app/chat`.

use std::collections::HashMap;

use axum::http::{header, Request};
use url::Url;

/// Throwaway origin the path is resolved against.
const RESOLVE_BASE: &str = "http://edge.invalid";

/// Everything the pipeline is allowed to read about a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeRequest {
    /// Request path with dot segments resolved; otherwise as received.
    pub path: String,
    /// Query string without the leading `?`.
    pub query: Option<String>,
    /// Fragment without the leading `#`. Browsers do not send it, but a
    /// target reconstructed client-side or by a test may carry one.
    pub fragment: Option<String>,
    pub cookies: HashMap<String, String>,
    /// Header names are lowercased.
    pub headers: HashMap<String, String>,
}

impl EdgeRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Split a request target such as `/app/chat?x=1#y` into its parts.
    pub fn parse(target: &str) -> Self {
        let (rest, fragment) = match target.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment.to_string())),
            None => (target, None),
        };
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (rest, None),
        };
        Self {
            path: normalize_path(path),
            query,
            fragment,
            ..Self::default()
        }
    }

    /// Capture path, query, cookies and headers from an HTTP request.
    pub fn from_http<B>(request: &Request<B>) -> Self {
        let uri = request.uri();
        let mut cookies = HashMap::new();
        let mut headers = HashMap::new();

        for (name, value) in request.headers() {
            // Non-UTF-8 values are unreadable and treated as absent.
            let Ok(value) = value.to_str() else {
                continue;
            };
            if *name == header::COOKIE {
                parse_cookie_header(value, &mut cookies);
            } else {
                headers
                    .entry(name.as_str().to_string())
                    .or_insert_with(|| value.to_string());
            }
        }

        Self {
            path: normalize_path(uri.path()),
            query: uri.query().map(str::to_string),
            fragment: None,
            cookies,
            headers,
        }
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Cookie value, or `None` when the cookie is missing or empty.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Path plus `?query` and `#fragment`, each only when non-empty.
    pub fn full_path(&self) -> String {
        let mut full = self.path.clone();
        if let Some(query) = self.query.as_deref().filter(|q| !q.is_empty()) {
            full.push('?');
            full.push_str(query);
        }
        if let Some(fragment) = self.fragment.as_deref().filter(|f| !f.is_empty()) {
            full.push('#');
            full.push_str(fragment);
        }
        full
    }
}

/// Resolve dot segments in an absolute path the way WHATWG URL parsing does.
///
/// Paths that do not start with `/` (the empty path, `*`) are returned as is.
/// Only the path is given here, so a leading `//` stays part of the path and
/// is never read as an authority.
pub fn normalize_path(raw: &str) -> String {
    if !raw.starts_with('/') {
        return raw.to_string();
    }
    match Url::parse(&format!("{RESOLVE_BASE}{raw}")) {
        Ok(url) => url.path().to_string(),
        Err(e) => {
            tracing::warn!(path = %raw, error = %e, "Path could not be resolved; using it as received");
            raw.to_string()
        }
    }
}

/// Parse a `Cookie` header into `out`. The first occurrence of a name wins;
/// pairs without `=` or with an empty name are skipped.
pub fn parse_cookie_header(raw: &str, out: &mut HashMap<String, String>) {
    for pair in raw.split(';') {
        let Some((name, value)) = pair.split_once('=') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let value = value.trim().trim_matches('"');
        out.entry(name.to_string())
            .or_insert_with(|| value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::HeaderValue;

    #[test]
    fn test_parse_target() {
        let req = EdgeRequest::parse("/app/chat?x=1#y");
        assert_eq!(req.path, "/app/chat");
        assert_eq!(req.query.as_deref(), Some("x=1"));
        assert_eq!(req.fragment.as_deref(), Some("y"));
        assert_eq!(req.full_path(), "/app/chat?x=1#y");
    }

    #[test]
    fn test_fragment_may_contain_question_mark() {
        let req = EdgeRequest::parse("/app#a?b");
        assert_eq!(req.path, "/app");
        assert_eq!(req.query, None);
        assert_eq!(req.fragment.as_deref(), Some("a?b"));
    }

    #[test]
    fn test_full_path_drops_empty_parts() {
        let req = EdgeRequest::parse("/admin?#");
        assert_eq!(req.full_path(), "/admin");
    }

    #[test]
    fn test_dot_segments_resolved() {
        assert_eq!(normalize_path("/auth/../app/chat"), "/app/chat");
        assert_eq!(normalize_path("/auth/%2e%2e/app/chat"), "/app/chat");
        assert_eq!(normalize_path("/auth/.%2E/app"), "/app");
        assert_eq!(normalize_path("/api/../admin/users"), "/admin/users");
        assert_eq!(normalize_path("/app/./chat/"), "/app/chat/");
        assert_eq!(normalize_path("/../../app"), "/app");
    }

    #[test]
    fn test_plain_paths_unchanged() {
        assert_eq!(normalize_path("/admin/groups"), "/admin/groups");
        assert_eq!(normalize_path("/app/logo.png"), "/app/logo.png");
        assert_eq!(normalize_path("//app"), "//app");
        assert_eq!(normalize_path(""), "");
        assert_eq!(normalize_path("*"), "*");
    }

    #[test]
    fn test_parse_resolves_dot_segments() {
        let req = EdgeRequest::parse("/auth/../app/chat?x=1");
        assert_eq!(req.path, "/app/chat");
        assert_eq!(req.full_path(), "/app/chat?x=1");
    }

    #[test]
    fn test_cookie_header_parsing() {
        let mut cookies = HashMap::new();
        parse_cookie_header(
            "NEXT_LOCALE=ko; fastapiusersauth=abc; broken; =nameless; NEXT_LOCALE=en",
            &mut cookies,
        );
        assert_eq!(cookies.get("NEXT_LOCALE").map(String::as_str), Some("ko"));
        assert_eq!(cookies.get("fastapiusersauth").map(String::as_str), Some("abc"));
        assert_eq!(cookies.len(), 2);
    }

    #[test]
    fn test_empty_cookie_counts_as_absent() {
        let req = EdgeRequest::new("/app").with_cookie("fastapiusersauth", "");
        assert_eq!(req.cookie("fastapiusersauth"), None);
    }

    #[test]
    fn test_from_http() {
        let mut request = Request::builder()
            .uri("http://example.com/admin/groups?page=2")
            .header("Cookie", "fastapiusersauth=t1")
            .header("Cookie", "NEXT_LOCALE=ko")
            .header("X-Forwarded-For", "10.0.0.1")
            .body(Body::empty())
            .unwrap();
        request.headers_mut().append(
            "x-binary",
            HeaderValue::from_bytes(&[0xff, 0xfe]).unwrap(),
        );

        let req = EdgeRequest::from_http(&request);
        assert_eq!(req.path, "/admin/groups");
        assert_eq!(req.query.as_deref(), Some("page=2"));
        assert_eq!(req.cookie("fastapiusersauth"), Some("t1"));
        assert_eq!(req.cookie("NEXT_LOCALE"), Some("ko"));
        assert_eq!(req.header("X-Forwarded-For"), Some("10.0.0.1"));
        assert_eq!(req.header("x-binary"), None);
    }

    #[test]
    fn test_from_http_resolves_encoded_dot_segments() {
        let request = Request::builder()
            .uri("/auth/%2e%2e/app/chat?x=1")
            .body(Body::empty())
            .unwrap();
        let req = EdgeRequest::from_http(&request);
        assert_eq!(req.path, "/app/chat");
        assert_eq!(req.query.as_deref(), Some("x=1"));
    }
}
