//! CSV export for forecast reports.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::report::PredictionReport;

/// Exports a report to a CSV file at the given path.
///
/// Writes a `month,z1,...` header followed by one row per month.
/// Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(report: &PredictionReport, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(report, buf)
}

/// Writes a report as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(report: &PredictionReport, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    let header = std::iter::once("month").chain(report.zones.iter().map(String::as_str));
    wtr.write_record(header)?;

    for (label, row) in report.months.iter().zip(&report.rows) {
        let record = std::iter::once(label.clone()).chain(row.iter().map(|v| format!("{v:.4}")));
        wtr.write_record(record)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trend::MONTH_LABELS;

    fn make_report() -> PredictionReport {
        PredictionReport {
            year: 2019,
            zones: (1..=7).map(|z| format!("z{z}")).collect(),
            months: MONTH_LABELS.iter().map(|m| (*m).to_string()).collect(),
            rows: (0..12)
                .map(|m| (0..7).map(|z| 100.0 * m as f64 + z as f64).collect())
                .collect(),
        }
    }

    #[test]
    fn header_lists_zones() {
        let mut buf = Vec::new();
        write_csv(&make_report(), &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        let first_line = output.as_deref().unwrap_or("").lines().next().unwrap_or("");
        assert_eq!(first_line, "month,z1,z2,z3,z4,z5,z6,z7");
    }

    #[test]
    fn row_count_matches_months() {
        let mut buf = Vec::new();
        write_csv(&make_report(), &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        let lines: Vec<&str> = output.as_deref().unwrap_or("").lines().collect();
        // 1 header + 12 months
        assert_eq!(lines.len(), 13);
        assert_eq!(lines[2], "Feb,100.0000,101.0000,102.0000,103.0000,104.0000,105.0000,106.0000");
    }

    #[test]
    fn deterministic_output() {
        let report = make_report();
        let mut buf1 = Vec::new();
        let mut buf2 = Vec::new();
        write_csv(&report, &mut buf1).ok();
        write_csv(&report, &mut buf2).ok();
        assert_eq!(buf1, buf2);
    }

    #[test]
    fn parseable_by_csv_reader() {
        let mut buf = Vec::new();
        write_csv(&make_report(), &mut buf).ok();

        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let headers = rdr.headers().cloned().ok();
        assert_eq!(headers.as_ref().map(csv::StringRecord::len), Some(8));

        let mut row_count = 0;
        for record in rdr.records() {
            let rec = record.ok();
            assert!(rec.is_some(), "every row should parse");
            if let Some(rec) = rec {
                for i in 1..8 {
                    let val: Result<f64, _> = rec[i].parse();
                    assert!(val.is_ok(), "column {i} should parse as f64");
                }
            }
            row_count += 1;
        }
        assert_eq!(row_count, 12);
    }
}
