use liftguard_core::safety::SafetyThresholds;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables. Immutable after
/// startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Safety-rule thresholds used by the ingestion pipeline.
    pub thresholds: SafetyThresholds,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                    |
    /// |---------------------------|----------------------------|
    /// | `HOST`                    | `0.0.0.0`                  |
    /// | `PORT`                    | `8000`                     |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`   | `30`                       |
    /// | `IMPACT_THRESHOLD_G`      | `2.5`                      |
    /// | `DANGEROUS_SPEED_KMH`     | `25.0`                     |
    /// | `MAST_TILT_THRESHOLD_DEG` | `15.0`                     |
    /// | `BRAKING_FORCE_THRESHOLD_G` | `1.5`                    |
    /// | `PROXIMITY_DANGER_METERS` | `3.0`                      |
    /// | `WORK_START_HOUR`         | `6`                        |
    /// | `WORK_END_HOUR`           | `22`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_parsed("REQUEST_TIMEOUT_SECS", 30);
        let shutdown_timeout_secs: u64 = env_parsed("SHUTDOWN_TIMEOUT_SECS", 30);

        let defaults = SafetyThresholds::default();
        let thresholds = SafetyThresholds {
            impact_threshold_g: env_parsed("IMPACT_THRESHOLD_G", defaults.impact_threshold_g),
            speed_threshold_kmh: env_parsed("DANGEROUS_SPEED_KMH", defaults.speed_threshold_kmh),
            tilt_threshold_deg: env_parsed("MAST_TILT_THRESHOLD_DEG", defaults.tilt_threshold_deg),
            braking_threshold_g: env_parsed(
                "BRAKING_FORCE_THRESHOLD_G",
                defaults.braking_threshold_g,
            ),
            proximity_threshold_m: env_parsed(
                "PROXIMITY_DANGER_METERS",
                defaults.proximity_threshold_m,
            ),
            work_start_hour: env_parsed("WORK_START_HOUR", defaults.work_start_hour),
            work_end_hour: env_parsed("WORK_END_HOUR", defaults.work_end_hour),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            thresholds,
        }
    }
}

/// Read and parse an env var, falling back to `default` when unset.
///
/// Panics on a present-but-unparsable value; misconfiguration should
/// fail at startup, not at first use.
fn env_parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{name} must be a valid {}", std::any::type_name::<T>())),
        Err(_) => default,
    }
}
