//! Loan IRR CLI
//!
//! Prices one loan: projects its cash flows against the assumption tables
//! and reports the schedule and the annualized IRR.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use serde::Serialize;

use loan_irr::assumptions::DEFAULT_ASSUMPTIONS_PATH;
use loan_irr::loan::{load_loan, parse_issue_date};
use loan_irr::projection::{IrrSolution, PeriodRecord, ProjectionConfig, ProjectionSummary};
use loan_irr::{LoanParameters, LoanValuation, ScenarioRunner, Stress};

/// Project a consumer loan's cash flows and solve for its IRR
#[derive(Parser, Debug)]
#[command(name = "loan_irr", version, about)]
struct Cli {
    /// Read the loan from a CSV file instead of the flags below
    #[arg(long)]
    loan_file: Option<PathBuf>,

    /// Credit grade
    #[arg(long, default_value = "C4")]
    grade: String,

    /// Issue date (m/d/yyyy)
    #[arg(long, default_value = "8/24/2015", value_parser = parse_date)]
    issue_date: NaiveDate,

    /// Term in months
    #[arg(long, default_value_t = 36)]
    term: u32,

    /// Annual coupon rate
    #[arg(long, default_value_t = 0.280007632124385)]
    coupon_rate: f64,

    /// Invested amount
    #[arg(long, default_value_t = 7500.00)]
    invested: f64,

    /// Outstanding balance
    #[arg(long, default_value_t = 3228.61)]
    outstanding_balance: f64,

    /// Recovery rate on defaults
    #[arg(long, default_value_t = 0.08)]
    recovery_rate: f64,

    /// Purchase premium over par
    #[arg(long, default_value_t = 0.051422082)]
    purchase_premium: f64,

    /// Annual servicing fee
    #[arg(long, default_value_t = 0.025)]
    servicing_fee: f64,

    /// Total earnout fee
    #[arg(long, default_value_t = 0.025)]
    earnout_fee: f64,

    /// Default curve multiplier
    #[arg(long, default_value_t = 1.0)]
    default_multiplier: f64,

    /// Prepay curve multiplier
    #[arg(long, default_value_t = 1.0)]
    prepay_multiplier: f64,

    /// Months (1 = purchase) at which earnout installments are paid
    #[arg(long, value_delimiter = ',', default_values_t = [13, 19])]
    earnout_months: Vec<u32>,

    /// Directory holding prepay.csv and charged_off.csv
    #[arg(long, default_value = DEFAULT_ASSUMPTIONS_PATH)]
    assumptions: PathBuf,

    /// Write the full schedule to this CSV file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Additional stress run, repeatable
    #[arg(long = "stress", value_name = "DEFAULT,PREPAY")]
    stresses: Vec<Stress>,

    /// Print a JSON report instead of tables
    #[arg(long)]
    json: bool,
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    parse_issue_date(value).map_err(|e| e.to_string())
}

impl Cli {
    fn loan(&self) -> Result<LoanParameters> {
        if let Some(path) = &self.loan_file {
            return load_loan(path)
                .with_context(|| format!("Failed to load loan from {}", path.display()));
        }

        let loan = LoanParameters {
            issue_date: self.issue_date,
            term: self.term,
            grade: self.grade.clone(),
            coupon_rate: self.coupon_rate,
            invested: self.invested,
            outstanding_balance: self.outstanding_balance,
            recovery_rate: self.recovery_rate,
            purchase_premium: self.purchase_premium,
            servicing_fee: self.servicing_fee,
            earnout_fee: self.earnout_fee,
            default_multiplier: self.default_multiplier,
            prepay_multiplier: self.prepay_multiplier,
        };
        loan.validate()?;
        Ok(loan)
    }
}

#[derive(Serialize)]
struct StressReport {
    stress: Stress,
    annualized_irr_pct: Option<f64>,
    converged: Option<bool>,
    error: Option<String>,
}

#[derive(Serialize)]
struct Report<'a> {
    loan: &'a LoanParameters,
    annualized_irr_pct: f64,
    irr: IrrSolution,
    summary: ProjectionSummary,
    stresses: Vec<StressReport>,
    records: &'a [PeriodRecord],
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let loan = cli.loan()?;

    let config = ProjectionConfig {
        earnout_months: cli.earnout_months.clone(),
        ..Default::default()
    };
    let runner = ScenarioRunner::from_csv_path(&cli.assumptions)
        .with_context(|| format!("Failed to load assumptions from {}", cli.assumptions.display()))?
        .with_config(config);

    let valuation = runner
        .run(&loan)
        .with_context(|| format!("Failed to price loan {}", loan.product_key()))?;

    let stresses: Vec<StressReport> = cli
        .stresses
        .iter()
        .zip(runner.run_stresses(&loan, &cli.stresses))
        .map(|(stress, result)| match result {
            Ok(v) => StressReport {
                stress: *stress,
                annualized_irr_pct: Some(v.annualized_irr_pct),
                converged: Some(v.converged()),
                error: None,
            },
            Err(e) => StressReport {
                stress: *stress,
                annualized_irr_pct: None,
                converged: None,
                error: Some(e.to_string()),
            },
        })
        .collect();

    if let Some(path) = &cli.output {
        write_schedule(path, valuation.records())
            .with_context(|| format!("Failed to write schedule to {}", path.display()))?;
    }

    if cli.json {
        let report = Report {
            loan: &loan,
            annualized_irr_pct: valuation.annualized_irr_pct,
            irr: valuation.irr,
            summary: valuation.projection.summary(),
            stresses,
            records: valuation.records(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&loan, &valuation, &stresses);
    if let Some(path) = &cli.output {
        println!("\nFull schedule written to: {}", path.display());
    }

    Ok(())
}

fn write_schedule(path: &Path, records: &[PeriodRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

fn print_report(loan: &LoanParameters, valuation: &LoanValuation, stresses: &[StressReport]) {
    println!("Loan {} issued {}", loan.product_key(), loan.issue_date);
    println!("  Invested: ${:.2}", loan.invested);
    println!("  Purchase Price: ${:.2}", loan.purchase_price());
    println!("  Coupon: {:.6}%", loan.coupon_rate * 100.0);
    println!();

    println!(
        "{:>5} {:>10} {:>10} {:>10} {:>10} {:>7} {:>7} {:>9} {:>9} {:>10} {:>10} {:>9} {:>8} {:>8} {:>9} {:>10}",
        "Month", "Paydate", "SchedPrin", "SchedInt", "SchedBal", "Prepay%", "Dflt%",
        "Default", "Prepay", "Principal", "Balance", "Interest", "Recovery", "Servicing", "Earnout", "TotalCF"
    );
    println!("{}", "-".repeat(160));

    for row in valuation.records() {
        println!(
            "{:>5} {:>10} {:>10.2} {:>10.2} {:>10.2} {:>7.4} {:>7.4} {:>9.2} {:>9.2} {:>10.2} {:>10.2} {:>9.2} {:>8.2} {:>8.2} {:>9.2} {:>10.2}",
            row.month,
            row.payment_date.format("%Y-%m-%d"),
            row.scheduled_principal,
            row.scheduled_interest,
            row.scheduled_balance,
            row.prepay_rate * 100.0,
            row.default_rate * 100.0,
            row.default_amount,
            row.prepay_amount,
            row.principal_paid,
            row.balance,
            row.interest_cf,
            row.recovery,
            row.servicing_cf,
            row.earnout_cf,
            row.total_cf,
        );
    }

    let summary = valuation.projection.summary();
    println!("\nSummary:");
    println!("  Periods: {}", summary.total_periods);
    println!("  Principal: ${:.2}", summary.total_principal);
    println!("  Interest: ${:.2}", summary.total_interest);
    println!("  Defaults: ${:.2}", summary.total_default);
    println!("  Prepayments: ${:.2}", summary.total_prepay);
    println!("  Recoveries: ${:.2}", summary.total_recovery);
    println!("  Servicing: ${:.2}", summary.total_servicing);
    println!("  Earnout: ${:.2}", summary.total_earnout);
    println!("  Net Cashflow: ${:.2}", summary.total_net_cf);
    println!("  Final Balance: ${:.2}", summary.final_balance);

    println!("\nThe IRR is: {:.6}%", valuation.annualized_irr_pct);
    if !valuation.converged() {
        println!(
            "  WARNING: not converged after {} iterations (NPV {:e}); best-effort rate",
            valuation.irr.iterations, valuation.irr.npv
        );
    }

    if !stresses.is_empty() {
        println!("\nStress Scenarios:");
        for report in stresses {
            match (&report.error, report.annualized_irr_pct) {
                (Some(err), _) => println!("  {}: error: {}", report.stress, err),
                (None, Some(pct)) => println!(
                    "  {}: {:.6}%{}",
                    report.stress,
                    pct,
                    if report.converged == Some(false) { " (not converged)" } else { "" }
                ),
                (None, None) => {}
            }
        }
    }
}
