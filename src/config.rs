// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;

pub const DB_ENV: &str = "TALLYBOOK_DB";
pub const USER_ENV: &str = "TALLYBOOK_USER";

/// Where the ledger lives and whose ledger it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub user: String,
}

impl Settings {
    /// Flags win over environment variables, which win over platform defaults.
    pub fn resolve(m: &clap::ArgMatches) -> Result<Settings> {
        let db_path = match m
            .get_one::<String>("db")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .or_else(|| env_var(DB_ENV))
        {
            Some(p) => PathBuf::from(p),
            None => crate::db::default_db_path()?,
        };
        let user = m
            .get_one::<String>("user")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .or_else(|| env_var(USER_ENV))
            .unwrap_or_else(default_user);
        Ok(Settings { db_path, user })
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn default_user() -> String {
    env_var("USER")
        .or_else(|| env_var("USERNAME"))
        .unwrap_or_else(|| "default".to_string())
}
