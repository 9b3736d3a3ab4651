//! Shared configuration and listing types for the FinnBil workspace.

pub mod app_config;
pub mod config;
pub mod listing;

use thiserror::Error;

pub use app_config::{AppConfig, CurveSelection, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use listing::{ListingAttributes, ScrapedListing, ScrapedPrice};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Reasons a scraped record cannot become a [`ListingAttributes`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ListingError {
    #[error("listing is missing {field}")]
    MissingField { field: &'static str },

    #[error("listing \"{name}\" is marked as sold")]
    Sold { name: String },

    #[error("listing \"{name}\" has unparseable price \"{raw}\"")]
    UnparseablePrice { name: String, raw: String },
}
