pub mod access_log;
pub mod cors;
pub mod request_trace;

pub use access_log::AccessLog;
pub use cors::cors_middleware;
pub use request_trace::{RequestTrace, TraceId};
