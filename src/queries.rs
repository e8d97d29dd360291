// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{self, BudgetReport, BudgetScale, MonthlyRate, Summary};
use crate::coordinator::Coordinator;
use crate::error::Result;
use crate::ledger::{self, DateRange, Timeframe, TransactionFilter};
use crate::models::{Asset, Budget, Notebook, Transaction};
use crate::money::Money;
use crate::registry::CategoryRegistry;
use crate::store::{DocFilter, DocumentStore, Singleton};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Dashboard figures for one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub range: Option<DateRange>,
    pub summary: Summary,
    pub savings_rate: Decimal,
    pub top_expenses: Vec<Transaction>,
    pub recurring: Vec<Transaction>,
}

impl<'a, S: DocumentStore + ?Sized> Coordinator<'a, S> {
    /// Matching transactions, newest first.
    pub fn list_transactions(&self, criteria: &TransactionFilter) -> Result<Vec<Transaction>> {
        let scope = match &criteria.notebook_id {
            Some(id) => DocFilter::field_eq("notebook_id", id.clone()),
            None => DocFilter::All,
        };
        let mut out = ledger::filter(self.store.list(&scope)?, criteria);
        ledger::sort_recent(&mut out);
        Ok(out)
    }

    pub fn get_transaction(&self, id: &str) -> Result<Option<Transaction>> {
        self.store.get(id)
    }

    /// Newest notebook first.
    pub fn list_notebooks(&self) -> Result<Vec<Notebook>> {
        let mut notebooks: Vec<Notebook> = self.store.list(&DocFilter::All)?;
        notebooks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notebooks)
    }

    pub fn get_notebook(&self, id: &str) -> Result<Option<Notebook>> {
        self.store.get(id)
    }

    pub fn get_budget(&self) -> Result<Budget> {
        self.store.load(Singleton::Budget)
    }

    pub fn list_categories(&self) -> Result<Vec<String>> {
        let registry: CategoryRegistry = self.store.load(Singleton::Categories)?;
        Ok(registry.all())
    }

    /// Sorted by name.
    pub fn list_assets(&self) -> Result<Vec<Asset>> {
        let mut assets: Vec<Asset> = self.store.list(&DocFilter::All)?;
        assets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(assets)
    }

    pub fn get_asset(&self, id: &str) -> Result<Option<Asset>> {
        self.store.get(id)
    }

    pub fn net_worth(&self) -> Result<Money> {
        Ok(aggregate::net_worth(&self.list_assets()?))
    }

    /// Totals for one notebook (or all transactions) inside an optional window.
    pub fn summary(&self, notebook_id: Option<&str>, range: Option<DateRange>) -> Result<Summary> {
        let criteria = TransactionFilter {
            range,
            notebook_id: notebook_id.map(str::to_string),
            ..TransactionFilter::default()
        };
        Ok(aggregate::summarize(&self.list_transactions(&criteria)?))
    }

    pub fn overview(&self, range: Option<DateRange>, top: usize) -> Result<Overview> {
        let criteria = TransactionFilter {
            range,
            ..TransactionFilter::default()
        };
        let txns = self.list_transactions(&criteria)?;
        Ok(Overview {
            range,
            summary: aggregate::summarize(&txns),
            savings_rate: aggregate::savings_rate(&txns),
            top_expenses: aggregate::top_expenses(&txns, top),
            recurring: aggregate::recurring(&txns),
        })
    }

    pub fn savings_trend(&self, range: Option<DateRange>) -> Result<Vec<MonthlyRate>> {
        let criteria = TransactionFilter {
            range,
            ..TransactionFilter::default()
        };
        Ok(aggregate::monthly_savings_rate(
            &self.list_transactions(&criteria)?,
        ))
    }

    /// Budget vs actual for a timeframe resolved against `today`.
    pub fn budget_report(&self, timeframe: Timeframe, today: NaiveDate) -> Result<BudgetReport> {
        let range = timeframe.resolve(today);
        let txns = self.list_transactions(&TransactionFilter::new().in_range(range))?;
        let budget = self.get_budget()?;
        Ok(aggregate::budget_vs_actual(
            &budget,
            &txns,
            BudgetScale::for_timeframe(&timeframe),
        ))
    }
}
