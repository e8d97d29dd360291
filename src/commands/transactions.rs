// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::coordinator::Coordinator;
use crate::ledger::TransactionFilter;
use crate::models::{Transaction, TransactionDraft, TxnKind};
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
        _ => {}
    }
    Ok(())
}

/// `--expense`/`--earning` force the sign; otherwise the amount is taken as typed.
fn sign_flag(sub: &clap::ArgMatches) -> Option<TxnKind> {
    if sub.get_flag("expense") {
        Some(TxnKind::Expense)
    } else if sub.get_flag("earning") {
        Some(TxnKind::Earning)
    } else {
        None
    }
}

fn check_notebook<S: DocumentStore + ?Sized>(
    ledger: &Coordinator<'_, S>,
    notebook_id: Option<&str>,
) -> Result<()> {
    if let Some(id) = notebook_id {
        if ledger.get_notebook(id)?.is_none() {
            bail!("Notebook '{}' does not exist", id);
        }
    }
    Ok(())
}

fn add<S: DocumentStore + ?Sized>(
    ledger: &Coordinator<'_, S>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let mut amount = parse_money(required(sub, "amount")?)?;
    if let Some(kind) = sign_flag(sub) {
        amount = kind.signed(amount);
    }
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let draft = TransactionDraft {
        description: required(sub, "description")?.trim().to_string(),
        amount,
        category: required(sub, "category")?.trim().to_string(),
        date,
        notebook_id: non_blank(sub.get_one::<String>("notebook")),
        recurring: sub.get_one::<bool>("recurring").copied().unwrap_or(false),
        notes: non_blank(sub.get_one::<String>("notes")),
    };
    check_notebook(ledger, draft.notebook_id.as_deref())?;
    let txn = ledger.save_transaction(draft, None)?;
    println!(
        "Recorded {} {} on {} ({}) id={}",
        txn.kind(),
        txn.amount.abs(),
        txn.date,
        txn.category,
        txn.id
    );
    Ok(())
}

fn edit<S: DocumentStore + ?Sized>(
    ledger: &Coordinator<'_, S>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let id = required(sub, "id")?;
    let Some(existing) = ledger.get_transaction(id)? else {
        bail!("Transaction '{}' not found", id);
    };
    let mut draft = existing.to_draft();
    if let Some(d) = sub.get_one::<String>("description") {
        draft.description = d.trim().to_string();
    }
    if let Some(a) = sub.get_one::<String>("amount") {
        draft.amount = parse_money(a)?;
    }
    if let Some(kind) = sign_flag(sub) {
        draft.amount = kind.signed(draft.amount);
    }
    if let Some(c) = sub.get_one::<String>("category") {
        draft.category = c.trim().to_string();
    }
    if let Some(d) = sub.get_one::<String>("date") {
        draft.date = parse_date(d)?;
    }
    if sub.get_flag("detach") {
        draft.notebook_id = None;
    } else if let Some(nb) = sub.get_one::<String>("notebook") {
        draft.notebook_id = non_blank(Some(nb));
        check_notebook(ledger, draft.notebook_id.as_deref())?;
    }
    if let Some(r) = sub.get_one::<bool>("recurring") {
        draft.recurring = *r;
    }
    if let Some(n) = sub.get_one::<String>("notes") {
        draft.notes = non_blank(Some(n));
    }
    let txn = ledger.save_transaction(draft, Some(id))?;
    println!("Updated transaction {}", txn.id);
    Ok(())
}

fn remove<S: DocumentStore + ?Sized>(
    ledger: &Coordinator<'_, S>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let id = required(sub, "id")?;
    ledger.delete_transaction(id)?;
    println!("Deleted transaction {}", id);
    Ok(())
}

/// Builds the filter from `tx list` / `export transactions` arguments. Arguments a
/// subcommand does not define are simply absent.
pub fn criteria_from(sub: &clap::ArgMatches) -> Result<TransactionFilter> {
    let mut criteria = TransactionFilter::new();
    criteria.range = window(sub, today())?;
    let defined = |name: &str| sub.try_get_one::<String>(name).ok().flatten();
    if let Some(c) = non_blank(defined("category")) {
        criteria = criteria.category(c);
    }
    if let Some(nb) = non_blank(defined("notebook")) {
        criteria = criteria.notebook(nb);
    }
    if let Some(t) = defined("type") {
        criteria = criteria.kind(t.parse::<TxnKind>()?);
    }
    if let Some(s) = non_blank(defined("search")) {
        criteria = criteria.search(s);
    }
    Ok(criteria)
}

fn list<S: DocumentStore + ?Sized>(
    ledger: &Coordinator<'_, S>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let mut data = ledger.list_transactions(&criteria_from(sub)?)?;
    if let Some(limit) = sub.get_one::<usize>("limit") {
        data.truncate(*limit);
    }
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        println!(
            "{}",
            pretty_table(
                &["Date", "Description", "Amount", "Category", "Notebook", "Id"],
                data.iter().map(row).collect(),
            )
        );
    }
    Ok(())
}

fn row(t: &Transaction) -> Vec<String> {
    let mut description = t.description.clone();
    if t.recurring {
        description.push_str(" (recurring)");
    }
    vec![
        t.date.to_string(),
        description,
        t.amount.to_string(),
        t.category.clone(),
        t.notebook_id.clone().unwrap_or_default(),
        t.id.clone(),
    ]
}
