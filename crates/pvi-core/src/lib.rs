//! Domain types and configuration for the product-viability pipeline.
//!
//! Everything here is request-scoped and owned by exactly one pipeline
//! stage; no shared mutable state crosses requests.

use thiserror::Error;

mod app_config;
mod config;
mod country;
mod market;
mod signal;
mod verdict;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use country::{Country, CountryProfile};
pub use market::{PriceGuardrail, PriceReport, PriceSource, ScrapedProduct, TaxInfo};
pub use signal::Signal;
pub use verdict::{
    AdvicePoint, AnalysisOutcome, FinancialBreakdown, MarketEntry, PillarScore, Verdict,
};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unsupported country: {0}")]
    UnsupportedCountry(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
