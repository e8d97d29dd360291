// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::ValidationError;
use crate::money::Money;
use crate::registry::normalize;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub(crate) fn storable(amount: Money) -> Result<(), ValidationError> {
    if amount.is_storable() {
        Ok(())
    } else {
        Err(ValidationError::AmountOutOfRange(amount.amount().to_string()))
    }
}

/// Server-side timestamps. Callers never set these; the store stamps them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stamps {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub description: String,
    /// Negative for expenses, positive for earnings.
    pub amount: Money,
    pub category: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub notebook_id: Option<String>,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn kind(&self) -> TxnKind {
        TxnKind::of(self.amount)
    }

    pub fn is_expense(&self) -> bool {
        self.amount.is_negative()
    }

    pub fn is_earning(&self) -> bool {
        self.amount.is_positive()
    }

    pub fn to_draft(&self) -> TransactionDraft {
        TransactionDraft {
            description: self.description.clone(),
            amount: self.amount,
            category: self.category.clone(),
            date: self.date,
            notebook_id: self.notebook_id.clone(),
            recurring: self.recurring,
            notes: self.notes.clone(),
        }
    }
}

/// Caller-supplied fields of a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub description: String,
    pub amount: Money,
    pub category: String,
    pub date: NaiveDate,
    pub notebook_id: Option<String>,
    pub recurring: bool,
    pub notes: Option<String>,
}

impl TransactionDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amount.is_zero() {
            return Err(ValidationError::ZeroAmount);
        }
        storable(self.amount)?;
        if self.category.trim().is_empty() {
            return Err(ValidationError::EmptyCategory);
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        Ok(())
    }

    pub fn into_record(self, id: String, stamps: Stamps) -> Transaction {
        Transaction {
            id,
            description: self.description,
            amount: self.amount,
            category: self.category,
            date: self.date,
            notebook_id: self.notebook_id,
            recurring: self.recurring,
            notes: self.notes,
            created_at: stamps.created_at,
            updated_at: stamps.updated_at,
        }
    }
}

/// Sign-based transaction type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxnKind {
    Expense,
    Earning,
}

impl TxnKind {
    /// Zero is never stored, so it falls on the earning side only for completeness.
    pub fn of(amount: Money) -> TxnKind {
        if amount.is_negative() {
            TxnKind::Expense
        } else {
            TxnKind::Earning
        }
    }

    /// Applies the sign convention to a magnitude: expenses negative, earnings positive.
    pub fn signed(&self, amount: Money) -> Money {
        match self {
            TxnKind::Expense => -amount.abs(),
            TxnKind::Earning => amount.abs(),
        }
    }
}

impl fmt::Display for TxnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxnKind::Expense => write!(f, "expense"),
            TxnKind::Earning => write!(f, "earning"),
        }
    }
}

impl FromStr for TxnKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" | "expenses" => Ok(TxnKind::Expense),
            "earning" | "earnings" | "income" => Ok(TxnKind::Earning),
            other => Err(ValidationError::InvalidChoice {
                field: "type",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub budget: Option<Money>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notebook {
    pub fn to_draft(&self) -> NotebookDraft {
        NotebookDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            budget: self.budget,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotebookDraft {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub budget: Option<Money>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl NotebookDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(ValidationError::EndBeforeStart { start, end });
            }
        }
        if let Some(budget) = self.budget {
            if !budget.is_positive() {
                return Err(ValidationError::NonPositiveBudget(budget.to_string()));
            }
            storable(budget)?;
        }
        Ok(())
    }

    pub fn into_record(self, id: String, stamps: Stamps) -> Notebook {
        Notebook {
            id,
            name: self.name,
            description: self.description,
            category: self.category,
            budget: self.budget,
            start_date: self.start_date,
            end_date: self.end_date,
            created_at: stamps.created_at,
            updated_at: stamps.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub category: String,
    pub value: Money,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Asset {
    pub fn to_draft(&self) -> AssetDraft {
        AssetDraft {
            name: self.name.clone(),
            category: self.category.clone(),
            value: self.value,
            description: self.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssetDraft {
    pub name: String,
    pub category: String,
    pub value: Money,
    pub description: Option<String>,
}

impl AssetDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::EmptyCategory);
        }
        if self.value.is_negative() {
            return Err(ValidationError::NegativeAssetValue(self.value.to_string()));
        }
        storable(self.value)?;
        Ok(())
    }

    pub fn into_record(self, id: String, stamps: Stamps) -> Asset {
        Asset {
            id,
            name: self.name,
            category: self.category,
            value: self.value,
            description: self.description,
            created_at: stamps.created_at,
            updated_at: stamps.updated_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Monthly,
    Annual,
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Monthly => write!(f, "monthly"),
            Period::Annual => write!(f, "annual"),
        }
    }
}

/// Category ceilings for one period. `total` always equals the sum of `categories`
/// once it has gone through [`BudgetPeriod::set`], [`BudgetPeriod::remove`] or
/// [`BudgetPeriod::recompute`]; a stored document may disagree, which the audit reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetPeriod {
    #[serde(default)]
    total: Money,
    #[serde(default)]
    categories: BTreeMap<String, Money>,
}

impl BudgetPeriod {
    pub fn total(&self) -> Money {
        self.total
    }

    pub fn categories(&self) -> &BTreeMap<String, Money> {
        &self.categories
    }

    pub fn get(&self, category: &str) -> Option<Money> {
        self.categories.get(&normalize(category)).copied()
    }

    pub fn set(&mut self, category: &str, amount: Money) {
        self.categories.insert(normalize(category), amount);
        self.recompute();
    }

    pub fn remove(&mut self, category: &str) -> Option<Money> {
        let removed = self.categories.remove(&normalize(category));
        self.recompute();
        removed
    }

    pub fn recompute(&mut self) {
        self.total = self.categories.values().sum();
    }

    pub fn is_consistent(&self) -> bool {
        self.total == self.categories.values().sum::<Money>()
    }
}

/// The per-user budget singleton.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    #[serde(default)]
    pub monthly: BudgetPeriod,
    #[serde(default)]
    pub annual: BudgetPeriod,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Budget {
    pub fn period(&self, period: Period) -> &BudgetPeriod {
        match period {
            Period::Monthly => &self.monthly,
            Period::Annual => &self.annual,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.monthly.categories.is_empty() && self.annual.categories.is_empty()
    }
}
