// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::coordinator::Coordinator;
use crate::store::DocumentStore;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle<S: DocumentStore + ?Sized>(
    ledger: &Coordinator<'_, S>,
    m: &clap::ArgMatches,
) -> Result<()> {
    if let Some(("list", sub)) = m.subcommand() {
        let data = ledger.list_categories()?;
        if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
            let rows = data.into_iter().map(|c| vec![c]).collect();
            println!("{}", pretty_table(&["Category"], rows));
        }
    }
    Ok(())
}
