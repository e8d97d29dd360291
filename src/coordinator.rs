// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Write paths and their cross-entity side effects.
//!
//! Every write funnels through here so that category registration, budget
//! total recomputation and the notebook cascade happen as one logical unit.

use crate::error::{LedgerError, Result, ValidationError};
use crate::models::{
    Asset, AssetDraft, Budget, Notebook, NotebookDraft, Transaction, TransactionDraft, storable,
};
use crate::money::Money;
use crate::registry::CategoryRegistry;
use crate::store::{Collection, DocFilter, DocumentStore, EntityStore, Op, Singleton};
use chrono::Utc;
use tracing::{debug, info, warn};

/// User-scoped entry point for the query and command surfaces. Cheap to build
/// per request; it holds no state beyond the backend reference and user id.
pub struct Coordinator<'a, S: DocumentStore + ?Sized> {
    pub(crate) store: EntityStore<'a, S>,
}

impl<'a, S: DocumentStore + ?Sized> Coordinator<'a, S> {
    pub fn new(backend: &'a S, user: impl Into<String>) -> Self {
        Coordinator {
            store: EntityStore::new(backend, user),
        }
    }

    pub fn user(&self) -> &str {
        self.store.user()
    }

    pub fn store(&self) -> &EntityStore<'a, S> {
        &self.store
    }

    /// Adds `label` to the registry, persisting only when it is new.
    pub fn register_category(&self, label: &str) -> Result<bool> {
        let mut registry: CategoryRegistry = self.store.load(Singleton::Categories)?;
        if !registry.register(label) {
            return Ok(false);
        }
        self.store.save(Singleton::Categories, &registry)?;
        debug!(user = %self.user(), label = %label.trim(), "registered category");
        Ok(true)
    }

    pub fn save_transaction(
        &self,
        draft: TransactionDraft,
        existing_id: Option<&str>,
    ) -> Result<Transaction> {
        draft.validate()?;
        self.register_category(&draft.category)?;
        match existing_id {
            Some(id) => self.store.update(id, draft),
            None => self.store.create(draft),
        }
    }

    /// Validates every draft, registers their categories, then writes them all in
    /// one batch. Nothing is recorded when any draft is rejected.
    pub fn import_transactions(&self, drafts: Vec<TransactionDraft>) -> Result<Vec<Transaction>> {
        for draft in &drafts {
            draft.validate()?;
        }
        let mut registry: CategoryRegistry = self.store.load(Singleton::Categories)?;
        let mut grew = false;
        for draft in &drafts {
            grew |= registry.register(&draft.category);
        }
        if grew {
            self.store.save(Singleton::Categories, &registry)?;
        }
        self.store.create_all(drafts)
    }

    pub fn delete_transaction(&self, id: &str) -> Result<()> {
        self.store.delete::<Transaction>(id)
    }

    pub fn save_notebook(
        &self,
        draft: NotebookDraft,
        existing_id: Option<&str>,
    ) -> Result<Notebook> {
        draft.validate()?;
        self.register_category(&draft.category)?;
        match existing_id {
            Some(id) => self.store.update(id, draft),
            None => self.store.create(draft),
        }
    }

    /// Deletes the notebook and every transaction that references it.
    ///
    /// Transactions always go before the notebook. On a backend without atomic
    /// batches an interruption therefore leaves an empty notebook behind, never a
    /// transaction pointing at a deleted notebook, and the call can simply be
    /// repeated. Returns the number of transactions removed.
    pub fn delete_notebook(&self, id: &str) -> Result<usize> {
        let notebook: Option<Notebook> = self.store.get(id)?;
        let owned: Vec<Transaction> = self.store.list(&DocFilter::field_eq("notebook_id", id))?;
        if notebook.is_none() && owned.is_empty() {
            return Err(LedgerError::not_found(Collection::Notebooks, id));
        }

        let txn_ops: Vec<Op> = owned
            .iter()
            .map(|t| Op::delete(Collection::Transactions, t.id.clone()))
            .collect();
        let count = txn_ops.len();

        if self.store.is_atomic() {
            let mut ops = txn_ops;
            ops.push(Op::delete(Collection::Notebooks, id));
            self.store.batch(ops)?;
        } else {
            self.store.batch(txn_ops).map_err(|err| match err {
                LedgerError::BatchPartialFailure {
                    applied,
                    total,
                    reason,
                } => {
                    warn!(notebook = %id, applied, total, "cascade interrupted");
                    LedgerError::PartialCascadeFailure {
                        notebook_id: id.to_string(),
                        remaining: total - applied,
                        reason,
                    }
                }
                other => other,
            })?;
            match self.store.delete::<Notebook>(id) {
                Ok(()) => {}
                Err(err) if err.is_not_found() => {}
                Err(err) => {
                    warn!(notebook = %id, "transactions removed but notebook delete failed");
                    return Err(LedgerError::PartialCascadeFailure {
                        notebook_id: id.to_string(),
                        remaining: 0,
                        reason: err.to_string(),
                    });
                }
            }
        }
        info!(user = %self.user(), notebook = %id, transactions = count, "notebook deleted");
        Ok(count)
    }

    /// Upserts one category in both periods and writes the whole budget back with
    /// freshly computed totals.
    pub fn save_budget_category(
        &self,
        category: &str,
        monthly_amount: Money,
        annual_amount: Money,
    ) -> Result<Budget> {
        if category.trim().is_empty() {
            return Err(ValidationError::EmptyCategory.into());
        }
        for amount in [monthly_amount, annual_amount] {
            if amount.is_negative() {
                return Err(ValidationError::NegativeBudgetAmount {
                    category: category.trim().to_string(),
                    amount: amount.to_string(),
                }
                .into());
            }
            storable(amount)?;
        }
        self.register_category(category)?;
        let mut budget: Budget = self.store.load(Singleton::Budget)?;
        budget.monthly.set(category, monthly_amount);
        budget.annual.set(category, annual_amount);
        self.write_budget(budget)
    }

    /// Drops a category from both periods. `NotFound`-free: removing an absent
    /// category just rewrites the totals.
    pub fn remove_budget_category(&self, category: &str) -> Result<Budget> {
        let mut budget: Budget = self.store.load(Singleton::Budget)?;
        budget.monthly.remove(category);
        budget.annual.remove(category);
        self.write_budget(budget)
    }

    pub(crate) fn write_budget(&self, mut budget: Budget) -> Result<Budget> {
        budget.monthly.recompute();
        budget.annual.recompute();
        budget.updated_at = Some(Utc::now());
        self.store.save(Singleton::Budget, &budget)?;
        info!(
            user = %self.user(),
            monthly = %budget.monthly.total(),
            annual = %budget.annual.total(),
            "budget saved"
        );
        Ok(budget)
    }

    pub fn save_asset(&self, draft: AssetDraft, existing_id: Option<&str>) -> Result<Asset> {
        draft.validate()?;
        self.register_category(&draft.category)?;
        match existing_id {
            Some(id) => self.store.update(id, draft),
            None => self.store.create(draft),
        }
    }

    pub fn delete_asset(&self, id: &str) -> Result<()> {
        self.store.delete::<Asset>(id)
    }
}
