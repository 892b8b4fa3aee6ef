//! Request orchestration: the strictly ordered backbone (calibrate →
//! price → finance → verdict) with the three independent signal
//! collectors fanned out concurrently and joined before synthesis.

use std::future::Future;
use std::time::Duration;

use tracing::Instrument;
use uuid::Uuid;

use pvi_core::{AnalysisOutcome, Country, PriceGuardrail, Signal, TaxInfo};

use crate::calibrate::calibrate_guardrail;
use crate::finance::compute_breakdown;
use crate::pricing::collect_price_report;
use crate::signals::{collect_demand, collect_sourcing};
use crate::synthesize::synthesize_verdict;
use crate::tax::{baseline_info, resolve_tax};
use crate::traits::{Generator, MarketplaceSearch, ShoppingSearch, WebSearch};

/// The external collaborators one request needs, injected as a bundle
/// so tests can substitute any subset.
pub struct PipelineClients<G, W, S, M> {
    pub generator: G,
    pub web_search: W,
    pub shopping: S,
    pub marketplace: M,
}

/// Runs one full analysis for a product/country pair.
///
/// Every stage fails open to its documented fallback, so this function
/// always returns an outcome — worst case an error-state verdict with
/// synthetic price data. `signal_timeout` bounds each independent
/// collector (demand, sourcing, tax); a timed-out collector is treated
/// as a failed signal and the request proceeds with what completed.
pub async fn run_analysis<G, W, S, M>(
    clients: &PipelineClients<G, W, S, M>,
    product: &str,
    country: Country,
    signal_timeout: Duration,
) -> AnalysisOutcome
where
    G: Generator,
    W: WebSearch,
    S: ShoppingSearch,
    M: MarketplaceSearch,
{
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("analysis", %request_id, product, country = %country);

    async move {
        let profile = country.profile();

        // Stage 1: calibrate. The price collector needs the guardrail,
        // so this one stays sequential.
        let guardrail_signal = calibrate_guardrail(&clients.generator, product, &profile).await;
        let guardrail = guardrail_signal
            .value()
            .copied()
            .unwrap_or_else(PriceGuardrail::permissive_default);

        // Stage 2: fan out. Price discovery plus the three independent
        // signal collectors run concurrently; the independent ones are
        // individually bounded so one hung upstream cannot stall the
        // request.
        let price_fut = collect_price_report(
            &clients.marketplace,
            &clients.shopping,
            product,
            &profile,
            &guardrail,
        );
        let demand_fut = bounded_signal(
            "demand",
            signal_timeout,
            collect_demand(&clients.web_search, product, &profile),
        );
        let sourcing_fut = bounded_signal(
            "sourcing",
            signal_timeout,
            collect_sourcing(&clients.web_search, product, &profile),
        );
        let tax_fut = bounded_tax(
            signal_timeout,
            resolve_tax(&clients.generator, product, &profile),
            &profile,
        );

        let (price_report, demand, sourcing, tax_signal) =
            tokio::join!(price_fut, demand_fut, sourcing_fut, tax_fut);

        // Stage 3: deterministic arithmetic over the collected numbers.
        let tax_info = tax_signal
            .into_value()
            .unwrap_or_else(|| baseline_info(&profile));
        let financials = compute_breakdown(price_report.average_price, tax_info.rate);

        // Stage 4: synthesize.
        let verdict = synthesize_verdict(
            &clients.generator,
            product,
            &profile,
            &demand,
            &price_report,
            &sourcing,
            &tax_info,
            &financials,
        )
        .await;

        tracing::info!(
            final_score = verdict.final_score,
            confidence = verdict.confidence_score,
            price_source = %price_report.source,
            "analysis complete"
        );

        AnalysisOutcome {
            request_id,
            product: product.to_string(),
            country: profile.full_name.to_string(),
            verdict,
            price_report,
            completed_at: chrono::Utc::now(),
        }
    }
    .instrument(span)
    .await
}

/// Bounds a text-signal collector; a timeout becomes a failed signal.
async fn bounded_signal<F>(kind: &'static str, timeout: Duration, fut: F) -> Signal<String>
where
    F: Future<Output = Signal<String>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(signal) => signal,
        Err(_) => {
            tracing::warn!(kind, secs = timeout.as_secs(), "signal collector timed out");
            Signal::Failed(format!(
                "{kind} collector timed out after {}s",
                timeout.as_secs()
            ))
        }
    }
}

/// Bounds the tax resolver; a timeout degrades to the baseline rate so
/// the financial calculator always has a usable fraction.
async fn bounded_tax<F>(
    timeout: Duration,
    fut: F,
    profile: &pvi_core::CountryProfile,
) -> Signal<TaxInfo>
where
    F: Future<Output = Signal<TaxInfo>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(signal) => signal,
        Err(_) => {
            tracing::warn!(secs = timeout.as_secs(), "tax resolver timed out");
            Signal::Degraded(
                baseline_info(profile),
                format!("tax resolver timed out after {}s", timeout.as_secs()),
            )
        }
    }
}
