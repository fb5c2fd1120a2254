//! Output formatting utilities.

use serde::Serialize;

/// One canonical record in a dedup report.
#[derive(Debug, Serialize)]
pub struct CanonicalRow {
    pub fingerprint: String,
    pub first_line: usize,
    pub copies: u64,
}

/// Summary of a dedup run.
#[derive(Debug, Serialize)]
pub struct DedupReport {
    pub records: u64,
    pub canonical: usize,
    pub duplicates: u64,
    pub entries: Vec<CanonicalRow>,
}

/// Formats a report as pretty JSON.
pub fn format_json(report: &DedupReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}

/// Formats a canonical record as a simple table row.
pub fn format_table_row(row: &CanonicalRow) -> String {
    format!("{:<64} {:>10} {:>8}", row.fingerprint, row.first_line, row.copies)
}

/// Prints table header.
#[allow(clippy::print_literal)]
pub fn print_table_header() {
    println!("{:<64} {:>10} {:>8}", "FINGERPRINT", "FIRST_LINE", "COPIES");
    println!("{}", "-".repeat(84));
}

/// Formats the closing summary line.
pub fn format_summary(report: &DedupReport) -> String {
    format!(
        "{} records, {} canonical, {} duplicates",
        report.records, report.canonical, report.duplicates
    )
}
