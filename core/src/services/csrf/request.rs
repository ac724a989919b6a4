//! Framework-agnostic request view consumed by the CSRF engine
//!
//! The engine only needs the method, a handful of headers and the CSRF
//! cookie, so the adapter layer builds one of these per request instead of
//! the engine depending on a specific HTTP framework.

use std::collections::HashMap;

/// Minimal view of an inbound HTTP request
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: String,
    headers: HashMap<String, String>,
    cookies: HashMap<String, String>,
}

impl RequestContext {
    /// Create a context for the given HTTP method
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into().to_uppercase(),
            headers: HashMap::new(),
            cookies: HashMap::new(),
        }
    }

    /// Add a request header (names are matched case-insensitively)
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_lowercase(), value.into());
        self
    }

    /// Add a request cookie
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// The HTTP method, uppercased
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Look up a header value, case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Look up a cookie value
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_is_uppercased() {
        let req = RequestContext::new("post");
        assert_eq!(req.method(), "POST");
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let req = RequestContext::new("GET").with_header("X-CSRF-Token", "abc");
        assert_eq!(req.header("x-csrf-token"), Some("abc"));
        assert_eq!(req.header("X-Csrf-Token"), Some("abc"));
    }

    #[test]
    fn test_cookie_lookup() {
        let req = RequestContext::new("GET").with_cookie("csrf-token", "abc");
        assert_eq!(req.cookie("csrf-token"), Some("abc"));
        assert_eq!(req.cookie("other"), None);
    }
}
