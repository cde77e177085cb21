//! Inspector configuration and run loop.

use crate::errors::AppError;
use crate::report::Report;
use std::path::Path;
use tracing::info;

/// Logging configuration.
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Builder for configuring and running the inspector.
pub struct App {
    logging: LoggingConfig,
    json: bool,
}

impl App {
    pub fn new() -> Self {
        Self {
            logging: LoggingConfig::default(),
            json: false,
        }
    }

    /// Configure logging.
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging = config;
        self
    }

    /// Emit JSON instead of the text report.
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Parse `path` and print its report to stdout.
    pub fn run(&self, path: &Path) -> Result<(), AppError> {
        self.init_logging();

        let cloud = plyprobe_data::parse(path)?;
        info!(
            "Loaded {} ({} vertices, {})",
            path.display(),
            cloud.vertex_count(),
            cloud.kind()
        );

        let report = Report::build(&cloud);
        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print!("{}", report);
        }
        Ok(())
    }

    fn init_logging(&self) {
        // Logs go to stderr; stdout carries only the report.
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&self.logging.level)),
            )
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
