use std::env;

const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Where the matchup backend lives. The only environment-driven behavior
/// besides poll tuning in `main`.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let base_url = env::var("MATCHUP_API_BASE_URL")
            .ok()
            .as_deref()
            .and_then(normalize_base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self { base_url }
    }
}

fn normalize_base_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
