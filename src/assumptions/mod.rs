//! Prepayment and charged-off assumption curves
//!
//! Curves are period-indexed vectors keyed by column: prepayment by term
//! (e.g. "36") and charged-off by product (e.g. "36-C4"). Row `month - 1`
//! holds the rate for 1-based `month`.

pub mod loader;

pub use loader::{load_curve_table, load_curve_table_from_reader, DEFAULT_ASSUMPTIONS_PATH};

use std::collections::HashMap;
use std::path::Path;

use crate::error::LoanIrrResult;

/// Source of the monthly prepayment and default vectors
///
/// `None` means the table holds no value for the request; callers decide
/// whether that is fatal.
pub trait AssumptionProvider {
    /// Monthly prepayment rate for a term at a 1-based month
    fn prepay_rate(&self, term: u32, month: u32) -> Option<f64>;

    /// Monthly default rate for a term and grade at a 1-based month
    fn default_rate(&self, term: u32, grade: &str, month: u32) -> Option<f64>;
}

impl<T: AssumptionProvider + ?Sized> AssumptionProvider for &T {
    fn prepay_rate(&self, term: u32, month: u32) -> Option<f64> {
        (**self).prepay_rate(term, month)
    }

    fn default_rate(&self, term: u32, grade: &str, month: u32) -> Option<f64> {
        (**self).default_rate(term, grade, month)
    }
}

/// Column-oriented table of rate curves
#[derive(Debug, Clone, Default)]
pub struct CurveTable {
    columns: HashMap<String, Vec<Option<f64>>>,
}

impl CurveTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a column
    pub fn insert_column(&mut self, key: impl Into<String>, values: Vec<Option<f64>>) {
        self.columns.insert(key.into(), values);
    }

    /// Value at a 0-based row offset, `None` if the column, row or cell is absent
    pub fn get(&self, column: &str, row: usize) -> Option<f64> {
        self.columns.get(column)?.get(row).copied().flatten()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// Column keys in sorted order
    pub fn column_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.columns.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

/// Prepay and charged-off tables loaded together
#[derive(Debug, Clone, Default)]
pub struct AssumptionTables {
    pub prepay: CurveTable,
    pub charged_off: CurveTable,
}

impl AssumptionTables {
    pub fn new(prepay: CurveTable, charged_off: CurveTable) -> Self {
        Self { prepay, charged_off }
    }

    /// Load tables from CSV files in the default location (data/assumptions/)
    pub fn from_csv() -> LoanIrrResult<Self> {
        Self::from_csv_path(Path::new(DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load `prepay.csv` and `charged_off.csv` from a specific directory
    pub fn from_csv_path(path: &Path) -> LoanIrrResult<Self> {
        Ok(Self {
            prepay: load_curve_table(path.join(loader::PREPAY_FILE))?,
            charged_off: load_curve_table(path.join(loader::CHARGED_OFF_FILE))?,
        })
    }
}

impl AssumptionProvider for AssumptionTables {
    fn prepay_rate(&self, term: u32, month: u32) -> Option<f64> {
        // No prepayment in the first month
        if month == 1 {
            return Some(0.0);
        }
        let row = (month as usize).checked_sub(1)?;
        self.prepay.get(&term.to_string(), row)
    }

    fn default_rate(&self, term: u32, grade: &str, month: u32) -> Option<f64> {
        let row = (month as usize).checked_sub(1)?;
        self.charged_off.get(&format!("{}-{}", term, grade), row)
    }
}
