//! Dispatch client service and the ports it depends on.

#![forbid(unsafe_code)]

mod client_config;
mod dispatch_client;
mod dispatch_ports;

pub use client_config::{ClientConfig, DEFAULT_PING_MARKER_KEY};
pub use dispatch_client::DispatchClient;
pub use dispatch_ports::{
    DispatchLogger, HttpRequest, HttpResponse, HttpTransport, NoopDispatchLogger,
};
