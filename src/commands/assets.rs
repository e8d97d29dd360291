// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::coordinator::Coordinator;
use crate::models::AssetDraft;
use crate::store::DocumentStore;
use crate::utils::{maybe_print_json, non_blank, parse_money, pretty_table, required};
use anyhow::{Result, bail};
use serde_json::json;

pub fn handle<S: DocumentStore + ?Sized>(
    ledger: &Coordinator<'_, S>,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ledger, sub)?,
        Some(("edit", sub)) => edit(ledger, sub)?,
        Some(("rm", sub)) => {
            let id = required(sub, "id")?;
            ledger.delete_asset(id)?;
            println!("Deleted asset {}", id);
        }
        Some(("list", sub)) => list(ledger, sub)?,
        Some(("networth", sub)) => {
            let total = ledger.net_worth()?;
            let printed = maybe_print_json(
                sub.get_flag("json"),
                sub.get_flag("jsonl"),
                &json!({ "net_worth": total }),
            )?;
            if !printed {
                println!("Net worth: {} ({})", total, total.compact());
            }
        }
        _ => {}
    }
    Ok(())
}

fn add<S: DocumentStore + ?Sized>(
    ledger: &Coordinator<'_, S>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let draft = AssetDraft {
        name: required(sub, "name")?.trim().to_string(),
        category: required(sub, "category")?.trim().to_string(),
        value: parse_money(required(sub, "value")?)?,
        description: non_blank(sub.get_one::<String>("description")),
    };
    let asset = ledger.save_asset(draft, None)?;
    println!("Asset '{}' = {} id={}", asset.name, asset.value, asset.id);
    Ok(())
}

fn edit<S: DocumentStore + ?Sized>(
    ledger: &Coordinator<'_, S>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let id = required(sub, "id")?;
    let Some(existing) = ledger.get_asset(id)? else {
        bail!("Asset '{}' not found", id);
    };
    let mut draft = existing.to_draft();
    if let Some(n) = sub.get_one::<String>("name") {
        draft.name = n.trim().to_string();
    }
    if let Some(c) = sub.get_one::<String>("category") {
        draft.category = c.trim().to_string();
    }
    if let Some(v) = sub.get_one::<String>("value") {
        draft.value = parse_money(v)?;
    }
    if let Some(d) = sub.get_one::<String>("description") {
        draft.description = non_blank(Some(d));
    }
    let asset = ledger.save_asset(draft, Some(id))?;
    println!("Updated asset '{}' = {}", asset.name, asset.value);
    Ok(())
}

fn list<S: DocumentStore + ?Sized>(
    ledger: &Coordinator<'_, S>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let data = ledger.list_assets()?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|a| {
                vec![
                    a.name.clone(),
                    a.category.clone(),
                    a.value.to_string(),
                    a.description.clone().unwrap_or_default(),
                    a.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Name", "Category", "Value", "Description", "Id"], rows)
        );
    }
    Ok(())
}
