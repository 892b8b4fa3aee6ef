//! Client for the OpenAI-compatible text-generation service, plus the
//! tolerant JSON extraction used on every structured response.

mod client;
mod error;
pub mod extract;

pub use client::TextGenClient;
pub use error::TextGenError;
