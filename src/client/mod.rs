//! Fetching Lodestone pages
//!
//! The HTTP transport sits behind [`HttpClient`] so the lookups can run
//! against `reqwest` in production and against anything else in tests.
//! Connection handling, timeouts and cancellation belong to the client; this
//! module issues one request per call and never retries.

mod fetcher;
mod lookup;

pub use fetcher::{build_http_client, HttpClient, HttpResponse};
pub use lookup::{Lodestone, CHARACTER_CATEGORY, FREE_COMPANY_CATEGORY};
