//! Backend connection settings

/// Default address of the diagnosis backend
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Environment variable overriding [`DEFAULT_BASE_URL`]
pub const BACKEND_URL_ENV: &str = "CROPDOC_BACKEND_URL";

/// Configuration for the backend client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Base URL for the backend API (default: http://127.0.0.1:8000)
    pub base_url: String,
    /// Request timeout in seconds; `None` leaves requests unbounded
    pub timeout_secs: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
        }
    }
}

impl BackendConfig {
    /// Create config from the environment, falling back to defaults
    pub fn from_env() -> Self {
        match std::env::var(BACKEND_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self {
                base_url: url.trim().to_string(),
                ..Self::default()
            },
            _ => Self::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: Option<u64>) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Absolute URL for an endpoint path such as `/diagnose`
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_config_default() {
        let config = BackendConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.timeout_secs, None);
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let config = BackendConfig::default().with_base_url("http://plants.local:9000/");
        assert_eq!(
            config.endpoint("/diagnose"),
            "http://plants.local:9000/diagnose"
        );
        assert_eq!(
            config.endpoint("outbreak/data"),
            "http://plants.local:9000/outbreak/data"
        );
    }

    // Only test in the crate touching CROPDOC_BACKEND_URL
    #[test]
    fn test_from_env_reads_backend_url() {
        std::env::set_var(BACKEND_URL_ENV, " http://field-station:8080 ");
        assert_eq!(BackendConfig::from_env().base_url, "http://field-station:8080");

        std::env::set_var(BACKEND_URL_ENV, "   ");
        assert_eq!(BackendConfig::from_env().base_url, DEFAULT_BASE_URL);

        std::env::remove_var(BACKEND_URL_ENV);
        assert_eq!(BackendConfig::from_env(), BackendConfig::default());
    }
}
