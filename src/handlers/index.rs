pub async fn health() -> &'static str {
    "social messenger api"
}
