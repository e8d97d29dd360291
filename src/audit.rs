// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Detects and repairs cross-entity inconsistencies left by interrupted
//! cascades or by other clients writing the same documents.

use crate::coordinator::Coordinator;
use crate::error::Result;
use crate::models::{Asset, Budget, Notebook, Period, Transaction};
use crate::registry::{CategoryRegistry, normalize};
use crate::store::{Collection, DocFilter, DocumentStore, Op, Singleton};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum Issue {
    DanglingNotebookRef {
        transaction_id: String,
        notebook_id: String,
    },
    BudgetTotalMismatch {
        period: Period,
    },
    UnregisteredCategory {
        label: String,
    },
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::DanglingNotebookRef {
                transaction_id,
                notebook_id,
            } => write!(
                f,
                "transaction {} references missing notebook {}",
                transaction_id, notebook_id
            ),
            Issue::BudgetTotalMismatch { period } => {
                write!(f, "{} budget total differs from its categories", period)
            }
            Issue::UnregisteredCategory { label } => {
                write!(f, "category '{}' is in use but not registered", label)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Repair {
    pub transactions_removed: usize,
    pub budget_rewritten: bool,
    pub categories_registered: usize,
}

impl<'a, S: DocumentStore + ?Sized> Coordinator<'a, S> {
    pub fn audit(&self) -> Result<Vec<Issue>> {
        let mut issues = Vec::new();

        let notebooks: Vec<Notebook> = self.store.list(&DocFilter::All)?;
        let notebook_ids: BTreeSet<&str> = notebooks.iter().map(|n| n.id.as_str()).collect();
        let txns: Vec<Transaction> = self.store.list(&DocFilter::All)?;
        for t in &txns {
            if let Some(nb) = t.notebook_id.as_deref() {
                if !notebook_ids.contains(nb) {
                    issues.push(Issue::DanglingNotebookRef {
                        transaction_id: t.id.clone(),
                        notebook_id: nb.to_string(),
                    });
                }
            }
        }

        let budget: Budget = self.store.load(Singleton::Budget)?;
        for period in [Period::Monthly, Period::Annual] {
            if !budget.period(period).is_consistent() {
                issues.push(Issue::BudgetTotalMismatch { period });
            }
        }

        let registry: CategoryRegistry = self.store.load(Singleton::Categories)?;
        let assets: Vec<Asset> = self.store.list(&DocFilter::All)?;
        let in_use: BTreeSet<String> = txns
            .iter()
            .map(|t| t.category.as_str())
            .chain(notebooks.iter().map(|n| n.category.as_str()))
            .chain(assets.iter().map(|a| a.category.as_str()))
            .chain(budget.monthly.categories().keys().map(String::as_str))
            .chain(budget.annual.categories().keys().map(String::as_str))
            .map(normalize)
            .filter(|label| !label.is_empty())
            .collect();
        for label in in_use {
            if !registry.contains(&label) {
                issues.push(Issue::UnregisteredCategory { label });
            }
        }

        for issue in &issues {
            warn!(user = %self.user(), %issue, "audit finding");
        }
        Ok(issues)
    }

    /// Fixes everything [`Coordinator::audit`] reports. Running it twice is a no-op.
    pub fn reconcile(&self) -> Result<Repair> {
        let mut repair = Repair::default();
        let mut dangling = Vec::new();
        let mut labels = Vec::new();
        let mut budget_stale = false;
        for issue in self.audit()? {
            match issue {
                Issue::DanglingNotebookRef { transaction_id, .. } => dangling.push(transaction_id),
                Issue::BudgetTotalMismatch { .. } => budget_stale = true,
                Issue::UnregisteredCategory { label } => labels.push(label),
            }
        }

        if !dangling.is_empty() {
            repair.transactions_removed = dangling.len();
            let ops = dangling
                .into_iter()
                .map(|id| Op::delete(Collection::Transactions, id))
                .collect();
            self.store.batch(ops)?;
        }
        if budget_stale {
            let budget: Budget = self.store.load(Singleton::Budget)?;
            self.write_budget(budget)?;
            repair.budget_rewritten = true;
        }
        if !labels.is_empty() {
            let mut registry: CategoryRegistry = self.store.load(Singleton::Categories)?;
            for label in &labels {
                if registry.register(label) {
                    repair.categories_registered += 1;
                }
            }
            self.store.save(Singleton::Categories, &registry)?;
        }
        info!(user = %self.user(), ?repair, "reconciled");
        Ok(repair)
    }
}
