// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::coordinator::Coordinator;
use crate::models::TransactionDraft;
use crate::store::DocumentStore;
use crate::utils::{non_blank, parse_date, parse_money, required};
use anyhow::{Context, Result, bail};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::path::Path;

pub fn handle<S: DocumentStore + ?Sized>(
    ledger: &Coordinator<'_, S>,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let path = required(sub, "path")?.trim();
            let n = import_transactions(ledger, Path::new(path))?;
            println!("Imported {} transaction(s) from {}", n, path);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Reads `date,description,amount,category[,notebook_id,recurring,notes]`.
///
/// Every row is parsed and validated before anything is written, and the rows
/// are then stored as one batch, so a failed import records nothing.
pub fn import_transactions<S: DocumentStore + ?Sized>(
    ledger: &Coordinator<'_, S>,
    path: &Path,
) -> Result<usize> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path.display()))?;

    let mut drafts = Vec::new();
    let mut notebooks: HashMap<String, bool> = HashMap::new();
    for (idx, result) in rdr.records().enumerate() {
        let line = idx + 2;
        let rec = result?;
        let date_raw = rec.get(0).context("date missing")?.trim();
        let description = rec.get(1).context("description missing")?.trim().to_string();
        let amount_raw = rec.get(2).context("amount missing")?.trim();
        let category = rec.get(3).context("category missing")?.trim().to_string();
        let notebook_id = non_blank(rec.get(4).map(str::to_string).as_ref());
        let recurring = match rec.get(5).map(str::trim).unwrap_or("") {
            "" => false,
            raw => parse_flag(raw)
                .with_context(|| format!("line {}: invalid recurring flag '{}'", line, raw))?,
        };
        let notes = non_blank(rec.get(6).map(str::to_string).as_ref());

        let draft = TransactionDraft {
            description,
            amount: parse_money(amount_raw).with_context(|| format!("line {}", line))?,
            category,
            date: parse_date(date_raw).with_context(|| format!("line {}", line))?,
            notebook_id,
            recurring,
            notes,
        };
        draft.validate().with_context(|| format!("line {}", line))?;

        if let Some(nb) = &draft.notebook_id {
            let exists = match notebooks.get(nb) {
                Some(known) => *known,
                None => {
                    let found = ledger.get_notebook(nb)?.is_some();
                    notebooks.insert(nb.clone(), found);
                    found
                }
            };
            if !exists {
                bail!("line {}: notebook '{}' does not exist", line, nb);
            }
        }
        drafts.push(draft);
    }

    Ok(ledger.import_transactions(drafts)?.len())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}
