//! Dispatch request and response types.

#![forbid(unsafe_code)]

mod method;
mod request;
mod response;
mod transaction_body;

pub use method::HttpMethod;
pub use request::DispatchRequest;
pub use response::{DispatchResponse, ItemOutcome, ResponseItem};
pub use transaction_body::CreateTransactionBody;
