//! Shared configuration and wire types for the ESL sync workspace.

pub mod app_config;
pub mod config;
pub mod records;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, EslSettings, PipelineSettings, PricingMode};
pub use config::{load_app_config, load_app_config_from_env, load_pipeline_settings_from_env};
pub use records::{IisCommand, UpdateRecord};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
