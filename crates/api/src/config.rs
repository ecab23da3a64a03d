//! Server configuration loaded from environment variables.

/// Server configuration.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// Ledger retention cap: keep only the newest N runs. `None`
    /// (the default) means unbounded growth for the process lifetime.
    pub retain_last_runs: Option<usize>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var            | Default                 |
    /// |--------------------|-------------------------|
    /// | `HOST`             | `0.0.0.0`               |
    /// | `PORT`             | `3000`                  |
    /// | `CORS_ORIGINS`     | `http://localhost:5173` |
    /// | `RETAIN_LAST_RUNS` | unset (unbounded)       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let retain_last_runs = std::env::var("RETAIN_LAST_RUNS")
            .ok()
            .map(|v| v.parse().expect("RETAIN_LAST_RUNS must be a valid usize"));

        Self {
            host,
            port,
            cors_origins,
            retain_last_runs,
        }
    }
}
