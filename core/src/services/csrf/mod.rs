//! CSRF protection engine
//!
//! Request-level cross-site request forgery defenses:
//!
//! - **Stored tokens**: random tokens issued on safe requests, verified and
//!   rotated on unsafe requests, backed by an injected [`CsrfTokenStore`].
//! - **Double-submit variant**: stateless token + HMAC-SHA256 signature pair
//!   for deployments where a server-side store is undesirable.
//! - **Origin validation**: `Origin`/`Referer` checking against an allow
//!   list with wildcard subdomain support.

pub mod config;
pub mod engine;
pub mod request;
pub mod store;

pub use config::CsrfConfig;
pub use engine::{CsrfEngine, CsrfProtection, DoubleSubmitToken, TokenAttachment};
pub use request::RequestContext;
pub use store::{CsrfTokenStore, InMemoryTokenStore, TokenRecord};
