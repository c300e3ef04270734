//! Adapters implementing application ports over external libraries.

mod reqwest_transport;

pub use reqwest_transport::ReqwestTransport;
