//! Transport kernel - exchange-agnostic HTTP plumbing.
//!
//! The kernel contains only transport logic and generic interfaces; nothing
//! in here knows about Korbit specifically.
//!
//! - [`RestClient`]: unified HTTP client interface (GET with query params,
//!   form-encoded POST), implemented by [`ReqwestRest`]
//! - [`BearerProvider`]: pluggable async token source; authenticated requests
//!   attach `Authorization: Bearer <token>` from it
//! - [`RetryPolicy`] / [`with_retry`]: fixed-delay retry wrapper applied by
//!   connectors around every network call

pub mod auth;
pub mod rest;
pub mod retry;

pub use auth::BearerProvider;
pub use rest::{ReqwestRest, RestClient, RestClientBuilder, RestClientConfig};
pub use retry::{with_retry, RetryPolicy};
