//! AWS Lambda handler for pricing a single loan
//!
//! Accepts the loan (and optional stresses) as JSON and returns the
//! annualized IRR, its convergence status and the projected schedule.
//! Assumption tables are read once at cold start from `ASSUMPTIONS_PATH`
//! (default: data/assumptions).

use std::path::PathBuf;
use std::sync::Arc;

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::info;
use serde::{Deserialize, Serialize};

use loan_irr::assumptions::DEFAULT_ASSUMPTIONS_PATH;
use loan_irr::projection::{PeriodRecord, ProjectionConfig, ProjectionSummary};
use loan_irr::{LoanParameters, ScenarioRunner, Stress};

/// Input for one pricing run
#[derive(Debug, Deserialize)]
pub struct PricingRequest {
    pub loan: LoanParameters,

    /// Earnout milestone months (default: 13 and 19)
    #[serde(default)]
    pub earnout_months: Option<Vec<u32>>,

    /// Additional multiplier stresses to price
    #[serde(default)]
    pub stresses: Vec<Stress>,

    /// Include the per-month schedule in the response (default: true)
    #[serde(default = "default_true")]
    pub include_schedule: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct StressResult {
    pub stress: Stress,
    pub annualized_irr_pct: Option<f64>,
    pub converged: Option<bool>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PricingResponse {
    pub annualized_irr_pct: f64,
    pub monthly_irr: f64,
    pub converged: bool,
    pub iterations: u32,
    pub summary: ProjectionSummary,
    pub stresses: Vec<StressResult>,
    pub schedule: Option<Vec<PeriodRecord>>,
    pub execution_time_ms: u64,
}

async fn handler(
    event: LambdaEvent<PricingRequest>,
    base: &ScenarioRunner,
) -> Result<PricingResponse, Error> {
    let start = std::time::Instant::now();
    let request = event.payload;

    let custom;
    let runner = match request.earnout_months {
        Some(months) => {
            let config = ProjectionConfig {
                earnout_months: months,
                ..Default::default()
            };
            custom = base.clone().with_config(config);
            &custom
        }
        None => base,
    };

    let valuation = runner.run(&request.loan)?;

    let stresses = request
        .stresses
        .iter()
        .zip(runner.run_stresses(&request.loan, &request.stresses))
        .map(|(stress, result)| match result {
            Ok(v) => StressResult {
                stress: *stress,
                annualized_irr_pct: Some(v.annualized_irr_pct),
                converged: Some(v.converged()),
                error: None,
            },
            Err(e) => StressResult {
                stress: *stress,
                annualized_irr_pct: None,
                converged: None,
                error: Some(e.to_string()),
            },
        })
        .collect();

    info!(
        "Priced {} in {:?}: {:.6}%",
        request.loan.product_key(),
        start.elapsed(),
        valuation.annualized_irr_pct
    );

    Ok(PricingResponse {
        annualized_irr_pct: valuation.annualized_irr_pct,
        monthly_irr: valuation.irr.periodic_rate,
        converged: valuation.irr.converged,
        iterations: valuation.irr.iterations,
        summary: valuation.projection.summary(),
        stresses,
        schedule: request.include_schedule.then(|| valuation.projection.records),
        execution_time_ms: start.elapsed().as_millis() as u64,
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let path = std::env::var("ASSUMPTIONS_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_ASSUMPTIONS_PATH));
    let runner = Arc::new(ScenarioRunner::from_csv_path(&path)?);
    info!("Loaded assumptions from {}", path.display());

    run(service_fn(move |event: LambdaEvent<PricingRequest>| {
        let runner = Arc::clone(&runner);
        async move { handler(event, &runner).await }
    }))
    .await
}
