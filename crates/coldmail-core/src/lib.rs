pub mod app_config;
pub mod config;
pub mod profile;
pub mod reference;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use profile::{
    GenerationResult, IndividualProfile, OrganizationProfile, ProductContext, ProfileRecord,
    ProfileSummary, MAX_PRODUCT_CHARS,
};
pub use reference::{classify, Reference, ReferenceKind};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Rejections of caller-supplied product text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductError {
    #[error("product description is required")]
    Empty,

    #[error("product description must be {max} characters or less (got {len})")]
    TooLong { len: usize, max: usize },
}
