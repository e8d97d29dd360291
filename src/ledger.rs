// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! In-memory views over fetched transactions: date windows, criteria, ordering.

use crate::error::ValidationError;
use crate::models::{Transaction, TxnKind};
use crate::registry::same_category;
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Inclusive on both ends. Compared against the transaction date, never its creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::EndBeforeStart { start, end });
        }
        Ok(DateRange { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

/// Named or explicit window. Named windows are resolved against the date passed to
/// [`Timeframe::resolve`] on every call; nothing is cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    CurrentWeek,
    CurrentMonth,
    Ytd,
    Custom(DateRange),
}

impl Timeframe {
    pub fn resolve(&self, today: NaiveDate) -> DateRange {
        match self {
            Timeframe::CurrentWeek => {
                let back = i64::from(today.weekday().num_days_from_monday());
                DateRange {
                    start: today - Duration::days(back),
                    end: today,
                }
            }
            Timeframe::CurrentMonth => DateRange {
                start: today.with_day(1).unwrap_or(today),
                end: today,
            },
            Timeframe::Ytd => DateRange {
                start: NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
                end: today,
            },
            Timeframe::Custom(range) => *range,
        }
    }
}

impl FromStr for Timeframe {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" | "current-week" => Ok(Timeframe::CurrentWeek),
            "month" | "current-month" => Ok(Timeframe::CurrentMonth),
            "ytd" | "year" => Ok(Timeframe::Ytd),
            other => Err(ValidationError::InvalidChoice {
                field: "timeframe",
                value: other.to_string(),
            }),
        }
    }
}

/// Conjunction of optional criteria. An absent criterion never excludes anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub range: Option<DateRange>,
    pub category: Option<String>,
    pub notebook_id: Option<String>,
    pub kind: Option<TxnKind>,
    pub search: Option<String>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn notebook(mut self, notebook_id: impl Into<String>) -> Self {
        self.notebook_id = Some(notebook_id.into());
        self
    }

    pub fn kind(mut self, kind: TxnKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn search(mut self, needle: impl Into<String>) -> Self {
        self.search = Some(needle.into());
        self
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        if let Some(range) = &self.range {
            if !range.contains(txn.date) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if !same_category(category, &txn.category) {
                return false;
            }
        }
        if let Some(notebook_id) = &self.notebook_id {
            if txn.notebook_id.as_deref() != Some(notebook_id.as_str()) {
                return false;
            }
        }
        match self.kind {
            Some(TxnKind::Expense) if !txn.is_expense() => return false,
            Some(TxnKind::Earning) if !txn.is_earning() => return false,
            _ => {}
        }
        if let Some(needle) = &self.search {
            let needle = needle.to_lowercase();
            if !txn.description.to_lowercase().contains(&needle) {
                return false;
            }
        }
        true
    }
}

/// Keeps the transactions matching every criterion. Order is not meaningful.
pub fn filter(transactions: Vec<Transaction>, criteria: &TransactionFilter) -> Vec<Transaction> {
    transactions
        .into_iter()
        .filter(|t| criteria.matches(t))
        .collect()
}

/// Date descending, then `created_at` descending.
pub fn sort_recent(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}
