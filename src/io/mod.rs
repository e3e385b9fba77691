//! CSV input and output: historical trends, rate tables, and report export.

use std::io::Read;

use crate::error::{ForecastError, Result};

/// Report export.
pub mod export;
/// Rate, penalty, and plant production tables.
pub mod rates;
/// Historical trend loading.
pub mod trend_csv;

/// Reads a headerless numeric CSV table where every row has `columns` fields.
///
/// Row count is left to the caller so that shape errors can be reported in
/// domain terms.
///
/// # Errors
///
/// Returns `Parse` with the offending line for malformed CSV, a wrong field
/// count, or a non-numeric cell.
pub(crate) fn read_numeric_rows<R: Read>(
    reader: R,
    source: &str,
    columns: usize,
) -> Result<Vec<Vec<f64>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (index, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| ForecastError::Parse {
            path: source.to_string(),
            line: index + 1,
            message: e.to_string(),
        })?;
        let line = record
            .position()
            .map_or(index + 1, |p| p.line() as usize);

        if record.len() != columns {
            return Err(ForecastError::Parse {
                path: source.to_string(),
                line,
                message: format!("expected {columns} columns, got {}", record.len()),
            });
        }

        let row = record
            .iter()
            .map(|field| {
                field.parse::<f64>().map_err(|e| ForecastError::Parse {
                    path: source.to_string(),
                    line,
                    message: format!("\"{field}\" is not a number: {e}"),
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }

    Ok(rows)
}
