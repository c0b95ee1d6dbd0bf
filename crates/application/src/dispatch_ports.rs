mod logger;
mod transport;

pub use logger::{DispatchLogger, NoopDispatchLogger};
pub use transport::{HttpRequest, HttpResponse, HttpTransport};
