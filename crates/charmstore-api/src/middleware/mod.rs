//! Tower middleware wrapped around the router by the binary.
//!
//! - [`RequestIdLayer`] assigns or propagates `x-request-id`
//! - [`RequestLoggingLayer`] writes one access log event per request

mod logging;
mod request_id;

pub use logging::RequestLoggingLayer;
pub use request_id::{RequestIdLayer, REQUEST_ID_HEADER};
