//! Client for the Apify marketplace-scraper actor, the tier-A source of
//! real listing prices.

mod client;
mod error;
mod types;

pub use client::{marketplace_region, ApifyClient};
pub use error::ApifyError;
pub use types::MarketplaceListing;
