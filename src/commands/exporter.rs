// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::transactions::criteria_from;
use crate::coordinator::Coordinator;
use crate::ledger::TransactionFilter;
use crate::store::DocumentStore;
use crate::utils::required;
use anyhow::{Context, Result, bail};
use std::path::Path;

/// Column order shared with the importer.
pub const CSV_HEADER: [&str; 7] = [
    "date",
    "description",
    "amount",
    "category",
    "notebook_id",
    "recurring",
    "notes",
];

pub fn handle<S: DocumentStore + ?Sized>(
    ledger: &Coordinator<'_, S>,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let format = required(sub, "format")?.to_lowercase();
            let out = required(sub, "out")?;
            let n = export_transactions(ledger, &criteria_from(sub)?, &format, Path::new(out))?;
            println!("Exported {} transaction(s) to {}", n, out);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Writes matching transactions oldest first. Returns how many were written.
pub fn export_transactions<S: DocumentStore + ?Sized>(
    ledger: &Coordinator<'_, S>,
    criteria: &TransactionFilter,
    format: &str,
    out: &Path,
) -> Result<usize> {
    let mut txns = ledger.list_transactions(criteria)?;
    txns.reverse();

    match format {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Create {}", out.display()))?;
            wtr.write_record(CSV_HEADER)?;
            for t in &txns {
                wtr.write_record([
                    t.date.to_string(),
                    t.description.clone(),
                    t.amount.to_string(),
                    t.category.clone(),
                    t.notebook_id.clone().unwrap_or_default(),
                    t.recurring.to_string(),
                    t.notes.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&txns)?)
                .with_context(|| format!("Write {}", out.display()))?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    Ok(txns.len())
}
