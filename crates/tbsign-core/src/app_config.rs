use std::path::PathBuf;

/// Process-level configuration resolved from the environment.
///
/// Distinct from [`crate::Settings`]: this is operator configuration
/// (identity, endpoints, timeouts), not user preferences, and is never
/// written back.
#[derive(Clone)]
pub struct AppConfig {
    /// Session cookie for the forum site. Secret.
    pub cookie: String,
    /// Username the progress record is keyed under.
    pub username: String,
    /// Base URL of the web/listing pages.
    pub web_base_url: String,
    /// Base URL of the client API host (sign endpoint).
    pub api_base_url: String,
    /// Directory holding the settings and progress documents.
    pub data_dir: PathBuf,
    pub request_timeout_secs: u64,
    pub log_level: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("cookie", &"[redacted]")
            .field("username", &self.username)
            .field("web_base_url", &self.web_base_url)
            .field("api_base_url", &self.api_base_url)
            .field("data_dir", &self.data_dir)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("log_level", &self.log_level)
            .finish()
    }
}
