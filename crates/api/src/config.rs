use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// Defaults suit local development; override via the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `4000`).
    pub port: u16,
    /// Allowed CORS origins, from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// How long shutdown waits for background tasks to drain.
    pub shutdown_timeout_secs: u64,
    pub jwt: JwtConfig,
    /// PostgreSQL URL. When unset the in-memory store is used.
    pub database_url: Option<String>,
    /// Capacity of the integration event bus.
    pub event_bus_capacity: usize,
    pub seed: SeedConfig,
}

/// Demo account provisioned at startup.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub enabled: bool,
    pub email: String,
    pub password: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                  |
    /// |-------------------------|--------------------------|
    /// | `HOST`                  | `0.0.0.0`                |
    /// | `PORT`                  | `4000`                   |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`  |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                     |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `10`                     |
    /// | `DATABASE_URL`          | unset (in-memory store)  |
    /// | `EVENT_BUS_CAPACITY`    | `1024`                   |
    /// | `SEED_DEMO_ACCOUNT`     | `true`                   |
    /// | `DEMO_EMAIL`            | `demo@arcdraft.app`      |
    /// | `DEMO_PASSWORD`         | `password123`            |
    ///
    /// # Panics
    ///
    /// Panics on unparsable values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "4000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let event_bus_capacity: usize = std::env::var("EVENT_BUS_CAPACITY")
            .unwrap_or_else(|_| "1024".into())
            .parse()
            .expect("EVENT_BUS_CAPACITY must be a valid usize");

        let seed = SeedConfig {
            enabled: parse_bool(
                &std::env::var("SEED_DEMO_ACCOUNT").unwrap_or_else(|_| "true".into()),
            ),
            email: std::env::var("DEMO_EMAIL").unwrap_or_else(|_| "demo@arcdraft.app".into()),
            password: std::env::var("DEMO_PASSWORD").unwrap_or_else(|_| "password123".into()),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt: JwtConfig::from_env(),
            database_url,
            event_bus_capacity,
            seed,
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
