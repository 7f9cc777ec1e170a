pub mod cors;
pub mod tracing;

pub use self::cors::open_cors_layer;
pub use self::tracing::{REQUEST_ID_HEADER, RequestId, http_trace_layer, request_id_middleware};
