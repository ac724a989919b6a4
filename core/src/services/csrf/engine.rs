//! CSRF protection engine implementation
//!
//! Issues and verifies per-request CSRF tokens backed by an injected token
//! store, provides the stateless double-submit HMAC variant, and validates
//! request origins. Every public operation is total: malformed input and
//! crypto failures are logged and reported as a negative result, never as a
//! panic or propagated error.

use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::config::CsrfConfig;
use super::request::RequestContext;
use super::store::{CsrfTokenStore, TokenRecord};

type HmacSha256 = Hmac<Sha256>;

/// Result of running a request through [`CsrfEngine::protect`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfProtection {
    /// Whether the request may proceed
    pub valid: bool,
    /// Fresh token for the client to use on its next unsafe request
    pub token: Option<String>,
    /// Rejection reason when `valid` is false
    pub error: Option<String>,
}

impl CsrfProtection {
    fn allowed(token: String) -> Self {
        Self {
            valid: true,
            token: Some(token),
            error: None,
        }
    }

    fn rejected(error: &str) -> Self {
        Self {
            valid: false,
            token: None,
            error: Some(error.to_string()),
        }
    }
}

/// Token/signature pair for the stateless double-submit scheme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoubleSubmitToken {
    /// Random token value
    pub token: String,
    /// Hex-encoded HMAC-SHA256 of the token under the server secret
    pub signature: String,
}

/// Response-side transport for an issued token: both a header and a cookie
/// are set so classic form posts (cookie) and fetch-based clients (header)
/// can echo the token back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAttachment {
    /// Response header name carrying the token
    pub header_name: String,
    /// The token value
    pub token: String,
    /// Rendered `Set-Cookie` header value
    pub set_cookie: String,
}

/// CSRF protection engine
pub struct CsrfEngine {
    store: Arc<dyn CsrfTokenStore>,
    config: CsrfConfig,
}

impl CsrfEngine {
    /// Create an engine over the given token store
    pub fn new(store: Arc<dyn CsrfTokenStore>, config: CsrfConfig) -> Self {
        Self { store, config }
    }

    /// Generate and store a fresh token, optionally bound to a user
    ///
    /// The token is 32 random bytes, hex-encoded. Issuance also triggers a
    /// lazy sweep of expired entries in the store.
    pub fn generate_token(&self, user_id: Option<&str>) -> String {
        let swept = self.store.remove_expired(self.config.token_lifetime);
        if swept > 0 {
            debug!(swept, "Removed expired CSRF tokens during issuance");
        }

        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        let token = hex::encode(bytes);

        self.store
            .put(&token, TokenRecord::new(user_id.map(str::to_string)));
        token
    }

    /// Verify a previously issued token
    ///
    /// Fails if the token is unknown, older than the configured lifetime
    /// (the expired entry is deleted as a side effect), or bound to a
    /// different user than the one supplied.
    pub fn verify_token(&self, token: &str, user_id: Option<&str>) -> bool {
        let Some(record) = self.store.get(token) else {
            return false;
        };

        let age = chrono::Utc::now() - record.issued_at;
        if age > self.config.token_lifetime {
            self.store.delete(token);
            debug!("Rejected expired CSRF token");
            return false;
        }

        if let Some(candidate) = user_id {
            if record.user_id.as_deref() != Some(candidate) {
                return false;
            }
        }

        true
    }

    /// Request-level CSRF gate
    ///
    /// Safe methods always pass and receive a freshly issued token. Unsafe
    /// methods must present a valid token in the configured header or cookie
    /// (header preferred); on success the token is rotated so each issued
    /// value is usable at most once.
    pub fn protect(&self, request: &RequestContext) -> CsrfProtection {
        self.protect_for_user(request, None)
    }

    /// [`protect`](Self::protect) with user binding on verification and
    /// re-issuance.
    pub fn protect_for_user(
        &self,
        request: &RequestContext,
        user_id: Option<&str>,
    ) -> CsrfProtection {
        if self.config.is_safe_method(request.method()) {
            return CsrfProtection::allowed(self.generate_token(user_id));
        }

        let candidate = request
            .header(&self.config.header_name)
            .or_else(|| request.cookie(&self.config.cookie_name));

        let Some(candidate) = candidate else {
            warn!(
                method = request.method(),
                "CSRF token missing from unsafe request"
            );
            return CsrfProtection::rejected("CSRF token required");
        };

        if !self.verify_token(candidate, user_id) {
            error!(
                severity = "high",
                event = "csrf_token_invalid",
                method = request.method(),
                "Rejected request with invalid CSRF token"
            );
            return CsrfProtection::rejected("Invalid CSRF token");
        }

        // Rotation-per-use: the verified token is retired and a new one
        // issued for the next request.
        self.store.delete(candidate);
        CsrfProtection::allowed(self.generate_token(user_id))
    }

    /// Build the response-side transport for a token: a header pair plus an
    /// `HttpOnly; SameSite=Strict` cookie whose max-age equals the token
    /// lifetime. `Secure` follows the runtime environment.
    pub fn attach_token(&self, token: &str) -> TokenAttachment {
        let mut cookie = format!(
            "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Strict",
            self.config.cookie_name,
            token,
            self.config.token_lifetime.num_seconds()
        );
        if self.config.secure_cookies {
            cookie.push_str("; Secure");
        }

        TokenAttachment {
            header_name: self.config.header_name.clone(),
            token: token.to_string(),
            set_cookie: cookie,
        }
    }

    /// Generate a stateless token/signature pair
    ///
    /// Nothing is stored server-side; validity is proven by recomputing the
    /// signature.
    pub fn generate_double_submit_token(&self) -> DoubleSubmitToken {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        let token = hex::encode(bytes);
        let signature = self.sign(&token).unwrap_or_default();

        DoubleSubmitToken { token, signature }
    }

    /// Verify a double-submit pair by recomputing the HMAC
    ///
    /// Comparison is constant-time; any failure while computing the
    /// signature is treated as invalid.
    pub fn verify_double_submit_token(&self, token: &str, signature: &str) -> bool {
        match self.sign(token) {
            Some(expected) => {
                constant_time_eq::constant_time_eq(expected.as_bytes(), signature.as_bytes())
            }
            None => false,
        }
    }

    fn sign(&self, token: &str) -> Option<String> {
        let Ok(mut mac) = HmacSha256::new_from_slice(self.config.secret.as_bytes()) else {
            error!("Failed to initialize HMAC for double-submit signature");
            return None;
        };
        mac.update(token.as_bytes());
        Some(hex::encode(mac.finalize().into_bytes()))
    }

    /// Validate the source origin of a request against an allow list
    ///
    /// The origin is taken from the `Origin` header, falling back to the
    /// origin component of `Referer`. Entries may be exact origins, `*`
    /// (allow-all), or `*.domain` (the domain and any subdomain).
    pub fn validate_origin(&self, request: &RequestContext, allowed_origins: &[String]) -> bool {
        let origin = request
            .header("origin")
            .map(str::to_string)
            .or_else(|| request.header("referer").and_then(referer_origin));

        let Some(origin) = origin else {
            warn!(
                severity = "medium",
                event = "origin_missing",
                method = request.method(),
                "Request carried neither Origin nor Referer header"
            );
            return false;
        };

        let matched = allowed_origins
            .iter()
            .any(|entry| origin_matches(&origin, entry));

        if !matched {
            warn!(
                severity = "medium",
                event = "origin_rejected",
                origin = %origin,
                "Request origin not in allow list"
            );
        }

        matched
    }
}

/// Extract the origin component (`scheme://host[:port]`) from a referer URL
fn referer_origin(referer: &str) -> Option<String> {
    let scheme_end = referer.find("://")?;
    let rest = &referer[scheme_end + 3..];
    if rest.is_empty() {
        return None;
    }
    let authority_end = rest.find('/').unwrap_or(rest.len());
    Some(referer[..scheme_end + 3 + authority_end].to_string())
}

/// Extract the host portion of an origin, dropping scheme and port
fn origin_host(origin: &str) -> &str {
    let without_scheme = origin
        .find("://")
        .map(|i| &origin[i + 3..])
        .unwrap_or(origin);
    without_scheme
        .split(':')
        .next()
        .unwrap_or(without_scheme)
}

/// Match one allow-list entry against a resolved origin
fn origin_matches(origin: &str, entry: &str) -> bool {
    if entry == "*" {
        return true;
    }
    if let Some(domain) = entry.strip_prefix("*.") {
        let host = origin_host(origin);
        return host == domain || host.ends_with(&format!(".{}", domain));
    }
    origin == entry
}
