use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;

/// Link-in-bio client - authenticated session diagnostics
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Backend base URL
    #[arg(short = 'u', long, env = "API_URL", default_value = "http://localhost:8000")]
    pub api_url: String,

    /// Token refresh endpoint (relative to the API URL)
    #[arg(long, env = "REFRESH_PATH", default_value = "/auth/refresh")]
    pub refresh_path: String,

    /// Front-end login route
    #[arg(long, env = "LOGIN_PATH", default_value = "/login")]
    pub login_path: String,

    /// Route the session starts on
    #[arg(short = 'r', long, env = "START_ROUTE", default_value = "/")]
    pub route: String,

    /// Endpoint to request after the session check
    #[arg(short = 'e', long, env = "ENDPOINT")]
    pub endpoint: Option<String>,

    /// Refresh timeout in seconds (0 disables)
    #[arg(long, env = "REFRESH_TIMEOUT", default_value = "30")]
    pub refresh_timeout: u64,

    /// HTTP request timeout in seconds
    #[arg(long, env = "HTTP_REQUEST_TIMEOUT", default_value = "60")]
    pub http_timeout: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Settings for the authenticated client. Every path is relative to `api_url`.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_url: String,

    // Auth endpoints
    pub refresh_path: String,
    pub session_check_path: String,
    pub login_endpoint: String,
    pub logout_path: String,

    /// Requests whose endpoint contains this are auth checks
    pub auth_check_marker: String,

    /// Front-end login route
    pub login_path: String,

    /// Upper bound on a refresh call; `None` waits for the transport
    pub refresh_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            refresh_path: "/auth/refresh".to_string(),
            session_check_path: "/api/protected".to_string(),
            login_endpoint: "/api/auth/login".to_string(),
            logout_path: "/api/auth/logout".to_string(),
            auth_check_marker: "/protected".to_string(),
            login_path: "/login".to_string(),
            refresh_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl ClientConfig {
    /// Join a base-relative path onto the API URL
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url.trim_end_matches('/'), path)
    }

    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.api_url)
            .with_context(|| format!("API_URL is not a valid URL: {}", self.api_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("API_URL must use http or https: {}", self.api_url);
        }
        if self.auth_check_marker.is_empty() {
            anyhow::bail!("Auth check marker cannot be empty");
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub client: ClientConfig,

    // Session
    pub start_route: String,
    pub endpoint: Option<String>,

    // HTTP client
    pub http_max_connections: usize,
    pub http_connect_timeout: u64,
    pub http_request_timeout: u64,

    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with priority: CLI > ENV > defaults
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::load_from(CliArgs::parse())
    }

    /// Build from parsed arguments and reject unusable settings
    pub fn load_from(args: CliArgs) -> Result<Self> {
        let config = Self::from_args(args);
        config.validate()?;
        Ok(config)
    }

    pub fn from_args(args: CliArgs) -> Self {
        let client = ClientConfig {
            api_url: args.api_url.trim_end_matches('/').to_string(),
            refresh_path: normalize_path(&args.refresh_path),
            login_path: normalize_path(&args.login_path),
            refresh_timeout: parse_timeout(args.refresh_timeout),
            ..ClientConfig::default()
        };

        Config {
            client,
            start_route: normalize_path(&args.route),
            endpoint: args.endpoint,

            http_max_connections: std::env::var("HTTP_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(20),

            http_connect_timeout: std::env::var("HTTP_CONNECT_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),

            http_request_timeout: args.http_timeout,

            log_level: args.log_level,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.client.validate()
    }
}

/// Ensure a route or endpoint path starts with a slash
fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Zero means no bound
fn parse_timeout(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
