use std::env;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the tool.
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
    pub data: DataConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Reads configuration from the environment (and a `.env` file when
    /// present). Every key has a default, so loading never fails.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let sales_csv = env::var("APP_SALES_CSV")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/dublin-property.csv"));
        let street_trees_json = env::var("APP_STREET_TREES_JSON")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/dublin-trees.json"));

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            environment,
            data: DataConfig {
                sales_csv,
                street_trees_json,
            },
            telemetry: TelemetryConfig { log_level },
        }
    }
}

/// Default locations of the raw data exports.
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub sales_csv: PathBuf,
    pub street_trees_json: PathBuf,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}
