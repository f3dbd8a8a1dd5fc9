//! URL construction for MDU backend endpoints

/// Batch record submission endpoint
pub fn batch_records_url(base_url: &str) -> String {
    format!("{}/api/v1/records/batch", base_url.trim_end_matches('/'))
}

/// Health check endpoint
pub fn health_url(base_url: &str) -> String {
    format!("{}/health", base_url.trim_end_matches('/'))
}
