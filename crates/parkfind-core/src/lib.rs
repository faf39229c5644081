pub mod app_config;
pub mod carpark;
pub mod config;
pub mod geo;
pub mod page;

pub use app_config::AppConfig;
pub use carpark::{Carpark, Position};
pub use config::{load_app_config, load_app_config_from_env};
pub use page::{Page, PageError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
