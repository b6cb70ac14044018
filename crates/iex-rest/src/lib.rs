#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

//! IEX REST Client
//!
//! Thin client for the request/response endpoints of the IEX HTTPS API.
//! Responses are passed through with minimal interpretation: the body is
//! classified by the `content-type` header the server returned, parsed when
//! it claims JSON, and handed back verbatim otherwise.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// HTTP client and endpoint methods.
pub mod client;

/// Error types.
pub mod error;

/// Enumerated endpoint parameters.
pub mod types;

pub use client::{ApiBody, DEFAULT_ENDPOINT, IexClient};
pub use error::RestError;
pub use types::{ChartRange, DateRange, MarketList};
