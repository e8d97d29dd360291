// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::audit::Issue;
use crate::coordinator::Coordinator;
use crate::store::DocumentStore;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use serde_json::json;

pub fn handle<S: DocumentStore + ?Sized>(
    ledger: &Coordinator<'_, S>,
    m: &clap::ArgMatches,
) -> Result<()> {
    let json_flag = m.get_flag("json");
    let jsonl_flag = m.get_flag("jsonl");

    if m.get_flag("fix") {
        let repair = ledger.reconcile()?;
        if !maybe_print_json(json_flag, jsonl_flag, &repair)? {
            println!(
                "doctor --fix: removed {} dangling transaction(s), budget rewritten: {}, \
                 registered {} categor(ies)",
                repair.transactions_removed,
                if repair.budget_rewritten { "yes" } else { "no" },
                repair.categories_registered
            );
        }
        return Ok(());
    }

    let issues = ledger.audit()?;
    if maybe_print_json(json_flag, jsonl_flag, &json!({ "issues": issues }))? {
        return Ok(());
    }
    if issues.is_empty() {
        println!("doctor: no issues found");
    } else {
        let rows = issues
            .iter()
            .map(|issue| {
                let kind = match issue {
                    Issue::DanglingNotebookRef { .. } => "dangling_notebook_ref",
                    Issue::BudgetTotalMismatch { .. } => "budget_total_mismatch",
                    Issue::UnregisteredCategory { .. } => "unregistered_category",
                };
                vec![kind.to_string(), issue.to_string()]
            })
            .collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
        println!("Run `tallybook doctor --fix` to repair.");
    }
    Ok(())
}
