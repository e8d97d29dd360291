// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod aggregate;
pub mod audit;
pub mod cli;
pub mod commands;
pub mod config;
pub mod coordinator;
pub mod db;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod models;
pub mod money;
pub mod queries;
pub mod registry;
pub mod store;
pub mod utils;

pub use coordinator::Coordinator;
pub use error::{LedgerError, Result, ValidationError};
pub use money::Money;
