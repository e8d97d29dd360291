// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::coordinator::Coordinator;
use crate::error::LedgerError;
use crate::models::NotebookDraft;
use crate::store::DocumentStore;
use crate::utils::{
    maybe_print_json, non_blank, parse_date, parse_money, pretty_table, required, today, window,
};
use anyhow::{Result, bail};

pub fn handle<S: DocumentStore + ?Sized>(
    ledger: &Coordinator<'_, S>,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ledger, sub)?,
        Some(("edit", sub)) => edit(ledger, sub)?,
        Some(("rm", sub)) => remove(ledger, sub)?,
        Some(("list", sub)) => list(ledger, sub)?,
        Some(("summary", sub)) => summary(ledger, sub)?,
        _ => {}
    }
    Ok(())
}

/// Overlays whatever fields were given on `draft`.
fn apply_fields(draft: &mut NotebookDraft, sub: &clap::ArgMatches) -> Result<()> {
    if let Some(n) = sub.get_one::<String>("name") {
        draft.name = n.trim().to_string();
    }
    if let Some(c) = sub.get_one::<String>("category") {
        draft.category = c.trim().to_string();
    }
    if let Some(d) = sub.get_one::<String>("description") {
        draft.description = non_blank(Some(d));
    }
    if let Some(b) = sub.get_one::<String>("budget") {
        draft.budget = match non_blank(Some(b)) {
            Some(b) => Some(parse_money(&b)?),
            None => None,
        };
    }
    if let Some(s) = sub.get_one::<String>("start") {
        draft.start_date = Some(parse_date(s)?);
    }
    if let Some(e) = sub.get_one::<String>("end") {
        draft.end_date = Some(parse_date(e)?);
    }
    Ok(())
}

fn add<S: DocumentStore + ?Sized>(
    ledger: &Coordinator<'_, S>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let mut draft = NotebookDraft {
        name: required(sub, "name")?.trim().to_string(),
        description: None,
        category: String::new(),
        budget: None,
        start_date: None,
        end_date: None,
    };
    apply_fields(&mut draft, sub)?;
    let nb = ledger.save_notebook(draft, None)?;
    println!("Notebook '{}' created id={}", nb.name, nb.id);
    Ok(())
}

fn edit<S: DocumentStore + ?Sized>(
    ledger: &Coordinator<'_, S>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let id = required(sub, "id")?;
    let Some(existing) = ledger.get_notebook(id)? else {
        bail!("Notebook '{}' not found", id);
    };
    let mut draft = existing.to_draft();
    apply_fields(&mut draft, sub)?;
    let nb = ledger.save_notebook(draft, Some(id))?;
    println!("Updated notebook '{}'", nb.name);
    Ok(())
}

fn remove<S: DocumentStore + ?Sized>(
    ledger: &Coordinator<'_, S>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let id = required(sub, "id")?;
    match ledger.delete_notebook(id) {
        Ok(removed) => {
            println!("Deleted notebook {} and {} transaction(s)", id, removed);
            Ok(())
        }
        Err(err @ LedgerError::PartialCascadeFailure { .. }) => {
            eprintln!("Run `tallybook notebook rm {}` again to finish the delete.", id);
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}

fn list<S: DocumentStore + ?Sized>(
    ledger: &Coordinator<'_, S>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let data = ledger.list_notebooks()?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|n| {
                let dates = match (n.start_date, n.end_date) {
                    (Some(s), Some(e)) => format!("{} .. {}", s, e),
                    (Some(s), None) => format!("from {}", s),
                    (None, Some(e)) => format!("until {}", e),
                    (None, None) => String::new(),
                };
                vec![
                    n.name.clone(),
                    n.category.clone(),
                    n.budget.map(|b| b.to_string()).unwrap_or_default(),
                    dates,
                    n.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Name", "Category", "Budget", "Dates", "Id"], rows)
        );
    }
    Ok(())
}

fn summary<S: DocumentStore + ?Sized>(
    ledger: &Coordinator<'_, S>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let id = required(sub, "id")?;
    let Some(notebook) = ledger.get_notebook(id)? else {
        bail!("Notebook '{}' not found", id);
    };
    let summary = ledger.summary(Some(id), window(sub, today())?)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
        return Ok(());
    }
    let mut rows = vec![
        vec!["Transactions".to_string(), summary.count.to_string()],
        vec!["Expenses".to_string(), summary.total_expenses.to_string()],
        vec!["Earnings".to_string(), summary.total_earnings.to_string()],
        vec!["Net".to_string(), summary.net.to_string()],
    ];
    if let Some(budget) = notebook.budget {
        rows.push(vec![
            "Budget left".to_string(),
            (budget - summary.total_expenses).to_string(),
        ]);
    }
    println!("{}", notebook.name);
    println!("{}", pretty_table(&["Metric", "Value"], rows));
    let by_cat = summary
        .by_category
        .iter()
        .map(|(cat, t)| vec![cat.clone(), t.expenses.to_string(), t.earnings.to_string()])
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "Expenses", "Earnings"], by_cat)
    );
    Ok(())
}
