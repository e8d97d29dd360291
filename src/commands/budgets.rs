// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{BudgetLine, BudgetScale};
use crate::coordinator::Coordinator;
use crate::ledger::Timeframe;
use crate::store::DocumentStore;
use crate::utils::{maybe_print_json, parse_money, pretty_table, required, today};
use anyhow::Result;

pub fn handle<S: DocumentStore + ?Sized>(
    ledger: &Coordinator<'_, S>,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(ledger, sub)?,
        Some(("rm", sub)) => remove(ledger, sub)?,
        Some(("show", sub)) => show(ledger, sub)?,
        Some(("report", sub)) => report(ledger, sub)?,
        _ => {}
    }
    Ok(())
}

fn set<S: DocumentStore + ?Sized>(
    ledger: &Coordinator<'_, S>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let cat = required(sub, "category")?;
    let monthly = parse_money(required(sub, "monthly")?)?;
    let annual = parse_money(required(sub, "annual")?)?;
    let budget = ledger.save_budget_category(cat, monthly, annual)?;
    println!(
        "Budget set for '{}': {} monthly / {} annual (totals {} / {})",
        cat.trim(),
        monthly,
        annual,
        budget.monthly.total(),
        budget.annual.total()
    );
    Ok(())
}

fn remove<S: DocumentStore + ?Sized>(
    ledger: &Coordinator<'_, S>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let cat = required(sub, "category")?;
    let budget = ledger.remove_budget_category(cat)?;
    println!(
        "Removed '{}' from the budget (totals {} / {})",
        cat.trim(),
        budget.monthly.total(),
        budget.annual.total()
    );
    Ok(())
}

fn show<S: DocumentStore + ?Sized>(
    ledger: &Coordinator<'_, S>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let budget = ledger.get_budget()?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &budget)? {
        return Ok(());
    }
    let mut cats: Vec<&String> = budget
        .monthly
        .categories()
        .keys()
        .chain(budget.annual.categories().keys())
        .collect();
    cats.sort();
    cats.dedup();
    let mut rows: Vec<Vec<String>> = cats
        .into_iter()
        .map(|c| {
            vec![
                c.clone(),
                budget.monthly.get(c).unwrap_or_default().to_string(),
                budget.annual.get(c).unwrap_or_default().to_string(),
            ]
        })
        .collect();
    rows.push(vec![
        "Total".to_string(),
        budget.monthly.total().to_string(),
        budget.annual.total().to_string(),
    ]);
    println!("{}", pretty_table(&["Category", "Monthly", "Annual"], rows));
    Ok(())
}

fn report<S: DocumentStore + ?Sized>(
    ledger: &Coordinator<'_, S>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let timeframe: Timeframe = required(sub, "timeframe")?.parse()?;
    let report = ledger.budget_report(timeframe, today())?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    let scale = match report.scale {
        BudgetScale::Monthly => "monthly budget",
        BudgetScale::WeeklyProrated => "monthly budget / 4",
        BudgetScale::Annual => "annual budget",
    };
    println!("{} ({})", timeframe.resolve(today()), scale);
    let rows = report
        .lines
        .iter()
        .chain(std::iter::once(&report.overall))
        .map(line_row)
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "Spent", "Budget", "Used", "Status"], rows)
    );
    Ok(())
}

fn line_row(line: &BudgetLine) -> Vec<String> {
    vec![
        line.category.clone(),
        line.spent.to_string(),
        line.budget.to_string(),
        format!("{:.1}%", line.progress.percent),
        if line.progress.over_budget {
            "OVER".to_string()
        } else {
            "ok".to_string()
        },
    ]
}
