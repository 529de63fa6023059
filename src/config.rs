// src/config.rs - Runtime configuration from environment variables
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base path of the backend API, e.g. `http://localhost:5000/api`.
    pub api_base_url: String,
}

impl AppConfig {
    /// Read configuration from the environment (after `dotenvy::dotenv()`
    /// has been given a chance to populate it).
    pub fn from_env() -> Self {
        let api_base_url = std::env::var("TUBECHAT_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        Self { api_base_url }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_local_backend() {
        std::env::remove_var("TUBECHAT_API_URL");
        let config = AppConfig::from_env();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }
}
