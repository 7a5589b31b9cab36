//! Transport configuration loading and resolution.

/// Environment variable overriding the request timeout, in milliseconds.
pub const TIMEOUT_ENV: &str = "HYPERWALK_TIMEOUT_MS";

/// Environment variable overriding the `User-Agent` header.
pub const USER_AGENT_ENV: &str = "HYPERWALK_USER_AGENT";

const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Settings for [`HttpTransport`](crate::transport::HttpTransport).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Value sent as the `User-Agent` header.
    pub user_agent: String,
    /// Maximum number of redirects followed per request.
    pub max_redirects: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: default_user_agent(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

impl TransportConfig {
    /// Resolve the configuration: explicit value, then environment, then default.
    pub fn resolve(explicit_timeout_ms: Option<u64>) -> Self {
        let mut config = Self::default();

        if let Some(timeout) = explicit_timeout_ms {
            config.timeout_ms = timeout;
        } else if let Some(timeout) = std::env::var(TIMEOUT_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            config.timeout_ms = timeout;
        }

        if let Ok(ua) = std::env::var(USER_AGENT_ENV) {
            if !ua.trim().is_empty() {
                config.user_agent = ua;
            }
        }

        config
    }
}

fn default_user_agent() -> String {
    format!("hyperwalk/{}", env!("CARGO_PKG_VERSION"))
}
