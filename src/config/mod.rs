use crate::geocoder::GeocodeFunction;
use std::env;
use std::fmt;
use std::time::Duration;

/// Top-level configuration for the suggestion engine.
#[derive(Debug, Clone)]
pub struct SuggestConfig {
    pub cache: CacheConfig,
    pub dispatch: DispatchConfig,
    pub function: GeocodeFunction,
    pub telemetry: TelemetryConfig,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            dispatch: DispatchConfig::default(),
            function: GeocodeFunction::AddressPoint,
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl SuggestConfig {
    /// Load configuration from the environment, falling back to defaults for
    /// anything unset. `.env` files are honored.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let max_entries = parse_env("SUGGEST_CACHE_MAX_ENTRIES", 1000)?;
        let ttl_seconds: u64 = parse_env("SUGGEST_CACHE_TTL_SECONDS", 3600)?;
        let workers = parse_env("SUGGEST_WORKERS", 3)?;
        let interval_ms: u64 = parse_env("SUGGEST_PROBE_INTERVAL_MS", 0)?;

        let function = match env::var("SUGGEST_GEOCODE_FUNCTION") {
            Ok(raw) => GeocodeFunction::parse(&raw)
                .ok_or(ConfigError::UnknownGeocodeFunction { value: raw })?,
            Err(_) => GeocodeFunction::AddressPoint,
        };

        let log_level = env::var("SUGGEST_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            cache: CacheConfig {
                max_entries,
                ttl: Duration::from_secs(ttl_seconds),
            },
            dispatch: DispatchConfig {
                workers,
                min_probe_interval: Duration::from_millis(interval_ms),
            },
            function,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Bounds for the whole-query result cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub max_entries: usize,
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            ttl: Duration::from_secs(3600),
        }
    }
}

/// Probe dispatch controls: worker count for parallel fan-out and the
/// minimum spacing between consecutive geocoder calls (zero disables rate
/// limiting).
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    pub workers: usize,
    pub min_probe_interval: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            workers: 3,
            min_probe_interval: Duration::ZERO,
        }
    }
}

/// Logging controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

fn parse_env<T>(var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { var, value: raw }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidNumber { var: &'static str, value: String },
    UnknownGeocodeFunction { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidNumber { var, value } => {
                write!(f, "{var} must be a non-negative integer, got '{value}'")
            }
            ConfigError::UnknownGeocodeFunction { value } => {
                write!(f, "unknown geocode function '{value}', expected 'AP' or '1B'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
