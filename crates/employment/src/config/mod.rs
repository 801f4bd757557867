use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::compensation::MonthWindow;

const DEFAULT_MAX_CALLS_PER_REQUEST: u32 = 10_000;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub compensation: CompensationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let month_window = match env::var("APP_MONTH_WINDOW") {
            Ok(raw) => MonthWindow::parse(&raw).ok_or(ConfigError::InvalidMonthWindow(raw))?,
            Err(_) => MonthWindow::default(),
        };

        let max_calls_per_request = match env::var("APP_MAX_CALLS_PER_REQUEST") {
            Ok(raw) => match raw.trim().parse::<u32>() {
                Ok(limit) if limit >= 1 => limit,
                _ => return Err(ConfigError::InvalidCallLimit),
            },
            Err(_) => DEFAULT_MAX_CALLS_PER_REQUEST,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                ansi: environment == AppEnvironment::Development,
            },
            compensation: CompensationConfig {
                month_window,
                max_calls_per_request,
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

/// Accrual rules shared by the call processing engine and the service facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompensationConfig {
    pub month_window: MonthWindow,
    pub max_calls_per_request: u32,
}

impl Default for CompensationConfig {
    fn default() -> Self {
        Self {
            month_window: MonthWindow::default(),
            max_calls_per_request: DEFAULT_MAX_CALLS_PER_REQUEST,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidMonthWindow(String),
    InvalidCallLimit,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidMonthWindow(value) => write!(
                f,
                "APP_MONTH_WINDOW must be 'month_of_year' or 'calendar_month' (got '{}')",
                value
            ),
            ConfigError::InvalidCallLimit => {
                write!(f, "APP_MAX_CALLS_PER_REQUEST must be a positive u32")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidMonthWindow(_)
            | ConfigError::InvalidCallLimit => None,
        }
    }
}
