// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::Collection;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Failures surfaced by the store and the coordinator.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("{kind} '{id}' not found")]
    NotFound { kind: Collection, id: String },

    #[error("document store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("batch failed after applying {applied} of {total} operations: {reason}")]
    BatchPartialFailure {
        applied: usize,
        total: usize,
        reason: String,
    },

    /// A non-atomic cascade stopped half way. Re-running `delete_notebook` is safe.
    #[error("deleting notebook '{notebook_id}' left {remaining} transaction(s) behind: {reason}")]
    PartialCascadeFailure {
        notebook_id: String,
        remaining: usize,
        reason: String,
    },
}

impl LedgerError {
    pub fn not_found(kind: Collection, id: impl Into<String>) -> Self {
        LedgerError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::NotFound { .. })
    }
}

impl From<rusqlite::Error> for LedgerError {
    fn from(err: rusqlite::Error) -> Self {
        LedgerError::StoreUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::StoreUnavailable(format!("malformed document: {}", err))
    }
}

/// The specific rule a rejected input violated. Raised before any write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("amount must not be zero")]
    ZeroAmount,
    #[error("description is required")]
    EmptyDescription,
    #[error("category is required")]
    EmptyCategory,
    #[error("name is required")]
    EmptyName,
    #[error("end date {end} is before start date {start}")]
    EndBeforeStart {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
    #[error("notebook budget must be positive, got {0}")]
    NonPositiveBudget(String),
    #[error("budget amount for '{category}' must not be negative, got {amount}")]
    NegativeBudgetAmount { category: String, amount: String },
    #[error("asset value must not be negative, got {0}")]
    NegativeAssetValue(String),
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("amount {0} must be whole cents no larger than 1000000000000000")]
    AmountOutOfRange(String),
    #[error("invalid amount '{0}'")]
    InvalidAmount(String),
    #[error("invalid {field} '{value}'")]
    InvalidChoice { field: &'static str, value: String },
}
