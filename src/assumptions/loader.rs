//! CSV-based assumption loader
//!
//! Loads rate curves from CSV files in data/assumptions/. Each column is one
//! curve; an optional leading `Month` column is skipped and empty cells are
//! kept as "no data".

use std::fs::File;
use std::path::Path;

use log::debug;

use super::CurveTable;
use crate::error::{LoanIrrError, LoanIrrResult};

/// Default path to assumptions directory
pub const DEFAULT_ASSUMPTIONS_PATH: &str = "data/assumptions";

/// Prepayment curves keyed by term
pub const PREPAY_FILE: &str = "prepay.csv";

/// Charged-off curves keyed by "{term}-{grade}"
pub const CHARGED_OFF_FILE: &str = "charged_off.csv";

/// Load a curve table from a CSV file
pub fn load_curve_table<P: AsRef<Path>>(path: P) -> LoanIrrResult<CurveTable> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let table = load_curve_table_from_reader(file)?;
    debug!("Loaded {} curve(s) from {}", table.column_keys().len(), path.display());
    Ok(table)
}

/// Load a curve table from any reader
pub fn load_curve_table_from_reader<R: std::io::Read>(reader: R) -> LoanIrrResult<CurveTable> {
    let mut reader = csv::Reader::from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let skip_first = headers
        .first()
        .map(|h| h.eq_ignore_ascii_case("month"))
        .unwrap_or(false);
    let first_curve = usize::from(skip_first);

    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::new(); headers.len()];

    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        for col in first_curve..headers.len() {
            let cell = record.get(col).map(str::trim).unwrap_or("");
            let value = if cell.is_empty() {
                None
            } else {
                let rate: f64 = cell.parse().map_err(|_| {
                    LoanIrrError::invalid_input(
                        &headers[col],
                        format!("row {} holds '{}', not a number", row_idx + 1, cell),
                    )
                })?;
                Some(rate)
            };
            columns[col].push(value);
        }
    }

    let mut table = CurveTable::new();
    for (key, values) in headers.into_iter().zip(columns).skip(first_curve) {
        table.insert_column(key, values);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::{AssumptionProvider, AssumptionTables};

    #[test]
    fn test_month_column_is_skipped() {
        let data = "Month,36,60\n1,0,0\n2,0.011,0.009\n3,,0.010\n";
        let table = load_curve_table_from_reader(data.as_bytes()).unwrap();

        assert_eq!(table.column_keys(), vec!["36", "60"]);
        assert!(!table.has_column("Month"));
        assert_eq!(table.get("36", 1), Some(0.011));
        assert_eq!(table.get("36", 2), None);
        assert_eq!(table.get("60", 2), Some(0.010));
    }

    #[test]
    fn test_table_without_month_column() {
        let data = "36-C4,36-A1\n0.002,0.0005\n0.003,0.0007\n";
        let table = load_curve_table_from_reader(data.as_bytes()).unwrap();
        assert_eq!(table.get("36-C4", 0), Some(0.002));
        assert_eq!(table.get("36-A1", 1), Some(0.0007));
    }

    #[test]
    fn test_non_numeric_cell_is_rejected() {
        let data = "Month,36\n1,0\n2,abc\n";
        match load_curve_table_from_reader(data.as_bytes()) {
            Err(LoanIrrError::InvalidInput { field, .. }) => assert_eq!(field, "36"),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_load_default_assumptions() {
        let result = AssumptionTables::from_csv();
        assert!(result.is_ok(), "Failed to load assumptions: {:?}", result.err());

        let tables = result.unwrap();

        // Every bundled curve covers term + 1 months
        for term in [36u32, 60] {
            for month in 1..=term + 1 {
                assert!(tables.prepay_rate(term, month).is_some(), "prepay {} m{}", term, month);
                assert!(
                    tables.default_rate(term, "C4", month).is_some(),
                    "default {}-C4 m{}",
                    term,
                    month
                );
            }
        }
    }
}
