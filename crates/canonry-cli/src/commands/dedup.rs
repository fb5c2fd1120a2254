//! Dedup command implementation.

use crate::input;
use crate::output::{self, CanonicalRow, DedupReport};
use crate::record::JsonRecord;
use canonry_content::{Canonicalizer, Fingerprint};
use canonry_registry::{Registry, RegistryOptions};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

pub struct DedupArgs {
    pub input: String,
    pub exclude: Vec<String>,
    pub json: bool,
    pub options: Option<String>,
    pub capacity: Option<usize>,
    pub shards: Option<usize>,
}

pub fn run(args: DedupArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = match &args.options {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read options file {}: {}", path, e))?;
            RegistryOptions::from_json(&text)?
        }
        None => RegistryOptions::default(),
    };
    if let Some(capacity) = args.capacity {
        options.initial_capacity = capacity;
    }
    if args.shards.is_some() {
        options.shard_amount = args.shards;
    }
    let registry = Registry::with_options(&options)?;

    let canonicalizer = Arc::new(Canonicalizer::excluding(args.exclude));
    let text = input::read_text(Some(args.input.as_str()))?;
    let records = input::parse_lines(&text)?;

    let mut copies: BTreeMap<Fingerprint, u64> = BTreeMap::new();
    for (line, value) in records {
        let record = JsonRecord::new(line, value, Arc::clone(&canonicalizer));
        let resolved = registry
            .try_resolve_with_outcome(record)
            .map_err(|e| format!("line {}: {}", line, e))?;
        *copies.entry(resolved.fingerprint).or_insert(0) += 1;
    }

    let mut entries: Vec<CanonicalRow> = copies
        .iter()
        .filter_map(|(fp, count)| {
            registry.get(fp).map(|canonical| CanonicalRow {
                fingerprint: fp.to_hex(),
                first_line: canonical.line,
                copies: *count,
            })
        })
        .collect();
    entries.sort_by_key(|row| row.first_line);

    let stats = registry.stats();
    info!(
        entries = stats.entries,
        hits = stats.hits,
        dedup_ratio = stats.dedup_ratio(),
        "dedup finished"
    );

    let report = DedupReport {
        records: stats.resolves,
        canonical: stats.entries,
        duplicates: stats.hits,
        entries,
    };

    if args.json {
        println!("{}", output::format_json(&report));
    } else {
        output::print_table_header();
        for row in &report.entries {
            println!("{}", output::format_table_row(row));
        }
        println!("{}", output::format_summary(&report));
    }
    Ok(())
}
