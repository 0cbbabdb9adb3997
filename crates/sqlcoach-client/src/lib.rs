//! # sqlcoach-client - Learning Backend Client
//!
//! REST client for the SQL learning service. All business logic (question
//! generation, answer evaluation, analytics, chat) lives in the backend; this
//! crate only maps operations onto HTTP requests and decodes the replies.
//!
//! Depends on [`sqlcoach_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! - [`Backend`] / [`LocalBackend`] - Backend operations (async trait)
//! - [`HttpBackend`] - reqwest implementation with per-request timeout
//! - [`Endpoint`] - Route table (method, path, query)
//! - `test_utils::FakeBackend` - Scripted backend (feature `test-helpers`)

pub mod backend;
pub mod endpoints;
pub mod http;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use backend::{Backend, LocalBackend};
pub use endpoints::{parse_base_url, Endpoint, Method};
pub use http::{HttpBackend, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
