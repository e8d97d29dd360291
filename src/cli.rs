// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, ArgGroup, Command, value_parser};

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    ]
}

/// `--timeframe week|month|ytd` or an explicit `--from/--to` window.
fn window_args() -> [Arg; 3] {
    [
        Arg::new("timeframe")
            .long("timeframe")
            .value_parser(["week", "month", "ytd", "all"])
            .conflicts_with_all(["from", "to"])
            .help("Named window relative to today"),
        Arg::new("from")
            .long("from")
            .requires("to")
            .help("Custom window start (YYYY-MM-DD)"),
        Arg::new("to")
            .long("to")
            .requires("from")
            .help("Custom window end (YYYY-MM-DD)"),
    ]
}

fn id_arg(what: &'static str) -> Arg {
    Arg::new("id").required(true).help(what)
}

fn tx_fields(required: bool) -> Vec<Arg> {
    vec![
        Arg::new("description")
            .long("description")
            .short('d')
            .required(required),
        Arg::new("amount")
            .long("amount")
            .short('a')
            .required(required)
            .allow_hyphen_values(true)
            .help("Amount; negative for expenses unless --expense/--earning is given"),
        Arg::new("category").long("category").short('c').required(required),
        Arg::new("date").long("date").help("YYYY-MM-DD, defaults to today"),
        Arg::new("notebook").long("notebook").help("Notebook id"),
        Arg::new("notes").long("notes"),
        Arg::new("expense")
            .long("expense")
            .action(ArgAction::SetTrue)
            .help("Record the magnitude of --amount as an expense"),
        Arg::new("earning")
            .long("earning")
            .action(ArgAction::SetTrue)
            .help("Record the magnitude of --amount as an earning"),
        Arg::new("recurring")
            .long("recurring")
            .value_parser(value_parser!(bool))
            .num_args(0..=1)
            .default_missing_value("true")
            .help("Mark as recurring (--recurring false to clear)"),
    ]
}

fn notebook_fields(required: bool) -> Vec<Arg> {
    vec![
        Arg::new("name").long("name").required(required),
        Arg::new("category").long("category").short('c'),
        Arg::new("description").long("description").short('d'),
        Arg::new("budget").long("budget").allow_hyphen_values(true),
        Arg::new("start").long("start").help("YYYY-MM-DD"),
        Arg::new("end").long("end").help("YYYY-MM-DD"),
    ]
}

fn asset_fields(required: bool) -> Vec<Arg> {
    vec![
        Arg::new("name").long("name").required(required),
        Arg::new("category").long("category").short('c').required(required),
        Arg::new("value")
            .long("value")
            .required(required)
            .allow_hyphen_values(true),
        Arg::new("description").long("description").short('d'),
    ]
}

pub fn build_cli() -> Command {
    Command::new("tallybook")
        .about("Personal finance ledger: transactions, notebooks, budgets, net worth")
        .version(clap::crate_version!())
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .help("Database file (defaults to $TALLYBOOK_DB or the platform data dir)"),
        )
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .help("User id whose ledger to use (defaults to $TALLYBOOK_USER)"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(
                    Command::new("add")
                        .args(tx_fields(true))
                        .group(ArgGroup::new("sign").args(["expense", "earning"])),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg("Transaction id"))
                        .args(tx_fields(false))
                        .arg(
                            Arg::new("detach")
                                .long("detach")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("notebook")
                                .help("Remove the notebook link"),
                        )
                        .group(ArgGroup::new("sign").args(["expense", "earning"])),
                )
                .subcommand(Command::new("rm").arg(id_arg("Transaction id")))
                .subcommand(
                    Command::new("list")
                        .args(window_args())
                        .arg(Arg::new("category").long("category").short('c'))
                        .arg(Arg::new("notebook").long("notebook"))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .value_parser(["expense", "earning", "income"]),
                        )
                        .arg(Arg::new("search").long("search").short('s'))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("notebook")
                .about("Notebooks group related transactions")
                .subcommand(Command::new("add").args(notebook_fields(true)))
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg("Notebook id"))
                        .args(notebook_fields(false)),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a notebook and all of its transactions")
                        .arg(id_arg("Notebook id")),
                )
                .subcommand(Command::new("list").args(json_args()))
                .subcommand(
                    Command::new("summary")
                        .arg(id_arg("Notebook id"))
                        .args(window_args())
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("budget")
                .about("Monthly and annual category budgets")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("category").long("category").short('c').required(true))
                        .arg(
                            Arg::new("monthly")
                                .long("monthly")
                                .required(true)
                                .allow_hyphen_values(true),
                        )
                        .arg(
                            Arg::new("annual")
                                .long("annual")
                                .required(true)
                                .allow_hyphen_values(true),
                        ),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("category").long("category").short('c').required(true)),
                )
                .subcommand(Command::new("show").args(json_args()))
                .subcommand(
                    Command::new("report")
                        .arg(
                            Arg::new("timeframe")
                                .long("timeframe")
                                .value_parser(["week", "month", "ytd"])
                                .default_value("month"),
                        )
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Category labels in use")
                .subcommand(Command::new("list").args(json_args())),
        )
        .subcommand(
            Command::new("asset")
                .about("Assets for net worth")
                .subcommand(Command::new("add").args(asset_fields(true)))
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg("Asset id"))
                        .args(asset_fields(false)),
                )
                .subcommand(Command::new("rm").arg(id_arg("Asset id")))
                .subcommand(Command::new("list").args(json_args()))
                .subcommand(Command::new("networth").args(json_args())),
        )
        .subcommand(
            Command::new("report")
                .about("Dashboards")
                .subcommand(
                    Command::new("overview")
                        .args(window_args())
                        .arg(
                            Arg::new("top")
                                .long("top")
                                .value_parser(value_parser!(usize))
                                .default_value("5"),
                        )
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("trend")
                        .about("Monthly savings rate")
                        .args(window_args())
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("transactions")
                    .args(window_args())
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .value_parser(["csv", "json"])
                            .default_value("csv"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(
            Command::new("import").subcommand(
                Command::new("transactions").arg(
                    Arg::new("path")
                        .required(true)
                        .help("CSV: date,description,amount,category[,notebook_id,recurring,notes]"),
                ),
            ),
        )
        .subcommand(
            Command::new("doctor")
                .about("Check cross-entity consistency")
                .arg(
                    Arg::new("fix")
                        .long("fix")
                        .action(ArgAction::SetTrue)
                        .help("Repair what was found"),
                )
                .args(json_args()),
        )
}
