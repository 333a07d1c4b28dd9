pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliArgs;

pub use crate::app::{build_app_state, build_app_state_with, build_router, AppState};
pub use crate::config::AppConfig;
pub use crate::core::{classifier::ModelArtifact, prediction::PredictionService};
pub use crate::utils::error::{PredictorError, Result};
