use service_core::error::AppError;

pub async fn metrics() -> Result<String, AppError> {
    crate::services::metrics::metrics()
        .gather()
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("Failed to encode metrics: {}", e)))
}
