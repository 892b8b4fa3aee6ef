//! The viability-scoring pipeline: calibration, signal collection,
//! financial computation, and verdict synthesis.
//!
//! Every stage owns its output and fails open to a documented fallback;
//! nothing in this crate raises past the pipeline boundary. External
//! services are reached through the seams in [`traits`], so tests
//! substitute mocks without any network.

mod calibrate;
mod finance;
mod pipeline;
mod pricing;
mod signals;
mod synthesize;
mod tax;
pub mod traits;

pub use calibrate::calibrate_guardrail;
pub use finance::compute_breakdown;
pub use pipeline::{run_analysis, PipelineClients};
pub use pricing::collect_price_report;
pub use signals::{collect_demand, collect_sourcing};
pub use synthesize::{confidence_score, synthesize_verdict};
pub use tax::{baseline_rate, resolve_tax};
