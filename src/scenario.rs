//! Scenario runner for stress-testing a loan's assumptions
//!
//! Pre-loads assumption tables once, then reprices the same loan under
//! different default/prepay multipliers without re-reading CSV files.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::assumptions::AssumptionTables;
use crate::error::LoanIrrResult;
use crate::loan::LoanParameters;
use crate::projection::{LoanValuation, ProjectionConfig, ProjectionEngine};

/// Multipliers applied to the assumption curves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stress {
    pub default_multiplier: f64,
    pub prepay_multiplier: f64,
}

impl Stress {
    pub fn new(default_multiplier: f64, prepay_multiplier: f64) -> Self {
        Self {
            default_multiplier,
            prepay_multiplier,
        }
    }

    /// Loan with this stress's multipliers
    pub fn apply(&self, loan: &LoanParameters) -> LoanParameters {
        loan.with_multipliers(self.default_multiplier, self.prepay_multiplier)
    }
}

impl fmt::Display for Stress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "default x{} / prepay x{}", self.default_multiplier, self.prepay_multiplier)
    }
}

/// Parses "DEFAULT,PREPAY", e.g. "1.5,0.8"
impl FromStr for Stress {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (default, prepay) = s
            .split_once(',')
            .ok_or_else(|| format!("expected DEFAULT,PREPAY multipliers, got '{}'", s))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .map_err(|e| format!("bad multiplier '{}': {}", v.trim(), e))
        };
        Ok(Stress::new(parse(default)?, parse(prepay)?))
    }
}

/// Pre-loaded scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_csv()?;
/// let stresses = [Stress::new(1.0, 1.0), Stress::new(1.5, 1.0)];
/// for (stress, result) in stresses.iter().zip(runner.run_stresses(&loan, &stresses)) {
///     println!("{}: {:.4}%", stress, result?.annualized_irr_pct);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    base_assumptions: AssumptionTables,
    config: ProjectionConfig,
}

impl ScenarioRunner {
    /// Create runner with pre-built assumptions
    pub fn with_assumptions(assumptions: AssumptionTables) -> Self {
        Self {
            base_assumptions: assumptions,
            config: ProjectionConfig::default(),
        }
    }

    /// Create runner by loading assumptions from CSV files
    pub fn from_csv() -> LoanIrrResult<Self> {
        Ok(Self::with_assumptions(AssumptionTables::from_csv()?))
    }

    /// Create runner from specific assumptions directory
    pub fn from_csv_path(path: &Path) -> LoanIrrResult<Self> {
        Ok(Self::with_assumptions(AssumptionTables::from_csv_path(path)?))
    }

    /// Replace the projection config used for every run
    pub fn with_config(mut self, config: ProjectionConfig) -> Self {
        self.config = config;
        self
    }

    /// Price the loan as given
    pub fn run(&self, loan: &LoanParameters) -> LoanIrrResult<LoanValuation> {
        ProjectionEngine::new(&self.base_assumptions, self.config.clone()).value_loan(loan)
    }

    /// Price the loan under each stress, results in input order
    ///
    /// Each stress is an independent projection with its own annuity
    /// schedule, so they run in parallel.
    pub fn run_stresses(
        &self,
        loan: &LoanParameters,
        stresses: &[Stress],
    ) -> Vec<LoanIrrResult<LoanValuation>> {
        let engine = ProjectionEngine::new(&self.base_assumptions, self.config.clone());
        stresses
            .par_iter()
            .map(|stress| engine.value_loan(&stress.apply(loan)))
            .collect()
    }

    /// Get reference to base assumptions for inspection
    pub fn assumptions(&self) -> &AssumptionTables {
        &self.base_assumptions
    }
}
