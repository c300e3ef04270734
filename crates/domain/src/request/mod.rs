//! Outgoing API request descriptors

mod api_request;
mod attempt;
mod method;

pub use api_request::{ApiRequest, AUTHORIZATION};
pub use attempt::Attempt;
pub use method::HttpMethod;
