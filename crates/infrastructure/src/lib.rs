//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod reqwest_http_transport;
mod tracing_dispatch_logger;

pub use reqwest_http_transport::ReqwestHttpTransport;
pub use tracing_dispatch_logger::TracingDispatchLogger;
