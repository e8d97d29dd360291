// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::ValidationError;
use crate::ledger::{DateRange, Timeframe};
use crate::money::Money;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};

pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(s.trim().to_string()))
}

pub fn parse_money(s: &str) -> Result<Money, ValidationError> {
    s.parse::<Money>()
        .map_err(|_| ValidationError::InvalidAmount(s.trim().to_string()))
}

/// Blank or missing strings become `None`; anything else is trimmed.
pub fn non_blank(s: Option<&String>) -> Option<String> {
    s.map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Local calendar date at call time.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Value of an argument clap already marks as required.
pub fn required<'m>(m: &'m clap::ArgMatches, name: &str) -> Result<&'m str> {
    m.get_one::<String>(name)
        .map(|s| s.as_str())
        .with_context(|| format!("--{} is required", name))
}

/// Reads `--timeframe` or `--from/--to`. `None` means no date constraint.
pub fn window(m: &clap::ArgMatches, today: NaiveDate) -> Result<Option<DateRange>> {
    if let (Some(from), Some(to)) = (m.get_one::<String>("from"), m.get_one::<String>("to")) {
        return Ok(Some(DateRange::new(parse_date(from)?, parse_date(to)?)?));
    }
    match m.get_one::<String>("timeframe").map(|s| s.as_str()) {
        None | Some("all") => Ok(None),
        Some(name) => Ok(Some(name.parse::<Timeframe>()?.resolve(today))),
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
