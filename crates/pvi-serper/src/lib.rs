//! Client for the Serper search API: general web search (demand and
//! sourcing text) and shopping search (tier-B price fallback).

mod client;
mod error;
mod price;
mod types;

pub use client::{normalize_shopping_geo, SerperClient};
pub use error::SerperError;
pub use price::parse_price_str;
pub use types::{OrganicResult, ShoppingItem};
