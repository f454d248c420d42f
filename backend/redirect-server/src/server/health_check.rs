pub async fn health() -> &'static str {
    tracing::debug!("health_check request");
    "health is good"
}
