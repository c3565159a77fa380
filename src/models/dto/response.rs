use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ImportResponse {
    pub imported: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PruneResponse {
    pub subject: String,
    pub removed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider: String,
}
