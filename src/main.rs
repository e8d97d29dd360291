// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use tallybook::config::Settings;
use tallybook::db::SqliteStore;
use tallybook::{Coordinator, cli, commands, logging};

fn main() -> Result<()> {
    logging::init_tracing();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let settings = Settings::resolve(&matches)?;
    let store = SqliteStore::open(&settings.db_path)
        .with_context(|| format!("Open ledger at {}", settings.db_path.display()))?;
    let ledger = Coordinator::new(&store, settings.user.clone());

    match matches.subcommand() {
        Some(("init", _)) => {
            println!(
                "Database initialized at {} (user: {})",
                settings.db_path.display(),
                settings.user
            );
        }
        Some(("tx", sub)) => commands::transactions::handle(&ledger, sub)?,
        Some(("notebook", sub)) => commands::notebooks::handle(&ledger, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&ledger, sub)?,
        Some(("category", sub)) => commands::categories::handle(&ledger, sub)?,
        Some(("asset", sub)) => commands::assets::handle(&ledger, sub)?,
        Some(("report", sub)) => commands::reports::handle(&ledger, sub)?,
        Some(("import", sub)) => commands::importer::handle(&ledger, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&ledger, sub)?,
        Some(("doctor", sub)) => commands::doctor::handle(&ledger, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
