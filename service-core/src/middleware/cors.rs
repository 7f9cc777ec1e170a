use tower_http::cors::{Any, CorsLayer};

/// CORS policy that admits every origin, method and header.
pub fn open_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
