// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::coordinator::Coordinator;
use crate::models::Transaction;
use crate::store::DocumentStore;
use crate::utils::{maybe_print_json, pretty_table, today, window};
use anyhow::Result;

pub fn handle<S: DocumentStore + ?Sized>(
    ledger: &Coordinator<'_, S>,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("overview", sub)) => overview(ledger, sub)?,
        Some(("trend", sub)) => trend(ledger, sub)?,
        _ => {}
    }
    Ok(())
}

fn overview<S: DocumentStore + ?Sized>(
    ledger: &Coordinator<'_, S>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let top = sub.get_one::<usize>("top").copied().unwrap_or(5);
    let data = ledger.overview(window(sub, today())?, top)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    if let Some(range) = data.range {
        println!("{}", range);
    }
    let s = &data.summary;
    println!(
        "{}",
        pretty_table(
            &["Expenses", "Earnings", "Net savings", "Savings rate", "Count"],
            vec![vec![
                s.total_expenses.compact(),
                s.total_earnings.compact(),
                s.net.compact(),
                format!("{:.1}%", data.savings_rate),
                s.count.to_string(),
            ]],
        )
    );
    let by_cat = s
        .by_category
        .iter()
        .map(|(cat, t)| vec![cat.clone(), t.expenses.to_string(), t.earnings.to_string()])
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "Expenses", "Earnings"], by_cat)
    );
    if !data.top_expenses.is_empty() {
        println!("Top expenses");
        println!("{}", txn_table(&data.top_expenses));
    }
    if !data.recurring.is_empty() {
        println!("Recurring");
        println!("{}", txn_table(&data.recurring));
    }
    Ok(())
}

fn txn_table(txns: &[Transaction]) -> comfy_table::Table {
    let rows = txns
        .iter()
        .map(|t| {
            vec![
                t.date.to_string(),
                t.description.clone(),
                t.amount.to_string(),
                t.category.clone(),
            ]
        })
        .collect();
    pretty_table(&["Date", "Description", "Amount", "Category"], rows)
}

fn trend<S: DocumentStore + ?Sized>(
    ledger: &Coordinator<'_, S>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let data = ledger.savings_trend(window(sub, today())?)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|m| {
                vec![
                    m.month.clone(),
                    m.earnings.to_string(),
                    m.expenses.to_string(),
                    format!("{:.1}%", m.rate),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Earnings", "Expenses", "Savings rate"], rows)
        );
    }
    Ok(())
}
