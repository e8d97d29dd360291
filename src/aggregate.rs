// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Totals, savings rate, per-category breakdowns and budget-vs-actual.
//!
//! Everything here is a pure function of its inputs.

use crate::ledger::Timeframe;
use crate::models::{Asset, Budget, BudgetPeriod, Transaction};
use crate::money::Money;
use crate::registry::normalize;
use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Non-negative sum of expense magnitudes.
pub fn total_expenses(transactions: &[Transaction]) -> Money {
    -transactions
        .iter()
        .filter(|t| t.is_expense())
        .map(|t| t.amount)
        .sum::<Money>()
}

pub fn total_earnings(transactions: &[Transaction]) -> Money {
    transactions
        .iter()
        .filter(|t| t.is_earning())
        .map(|t| t.amount)
        .sum()
}

pub fn net_savings(transactions: &[Transaction]) -> Money {
    total_earnings(transactions) - total_expenses(transactions)
}

/// Percentage of earnings kept; zero when there are no earnings.
pub fn savings_rate(transactions: &[Transaction]) -> Decimal {
    net_savings(transactions).percent_of(total_earnings(transactions))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTotals {
    pub expenses: Money,
    pub earnings: Money,
}

/// Keyed by the label as stored on each transaction.
pub fn by_category(transactions: &[Transaction]) -> BTreeMap<String, CategoryTotals> {
    let mut out: BTreeMap<String, CategoryTotals> = BTreeMap::new();
    for t in transactions {
        let entry = out.entry(t.category.clone()).or_default();
        if t.is_expense() {
            entry.expenses += t.amount.abs();
        } else {
            entry.earnings += t.amount;
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetProgress {
    /// Capped at 100.
    pub percent: Decimal,
    pub over_budget: bool,
}

pub fn budget_progress(spent: Money, budget: Money) -> BudgetProgress {
    let percent = if budget.is_positive() {
        spent.percent_of(budget).min(Decimal::ONE_HUNDRED)
    } else {
        Decimal::ZERO
    };
    BudgetProgress {
        percent,
        over_budget: spent > budget,
    }
}

pub fn net_worth(assets: &[Asset]) -> Money {
    assets.iter().map(|a| a.value).sum()
}

/// The `n` largest expenses by magnitude, largest first.
pub fn top_expenses(transactions: &[Transaction], n: usize) -> Vec<Transaction> {
    let mut expenses: Vec<Transaction> = transactions
        .iter()
        .filter(|t| t.is_expense())
        .cloned()
        .collect();
    expenses.sort_by(|a, b| b.amount.abs().cmp(&a.amount.abs()));
    expenses.truncate(n);
    expenses
}

pub fn recurring(transactions: &[Transaction]) -> Vec<Transaction> {
    transactions.iter().filter(|t| t.recurring).cloned().collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyRate {
    /// `YYYY-MM`
    pub month: String,
    pub earnings: Money,
    pub expenses: Money,
    pub rate: Decimal,
}

/// Savings rate per calendar month, oldest first.
pub fn monthly_savings_rate(transactions: &[Transaction]) -> Vec<MonthlyRate> {
    let mut months: BTreeMap<String, CategoryTotals> = BTreeMap::new();
    for t in transactions {
        let month = format!("{:04}-{:02}", t.date.year(), t.date.month());
        let entry = months.entry(month).or_default();
        if t.is_expense() {
            entry.expenses += t.amount.abs();
        } else {
            entry.earnings += t.amount;
        }
    }
    months
        .into_iter()
        .map(|(month, totals)| MonthlyRate {
            month,
            earnings: totals.earnings,
            expenses: totals.expenses,
            rate: (totals.earnings - totals.expenses).percent_of(totals.earnings),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_expenses: Money,
    pub total_earnings: Money,
    pub net: Money,
    pub by_category: BTreeMap<String, CategoryTotals>,
    pub count: usize,
}

pub fn summarize(transactions: &[Transaction]) -> Summary {
    Summary {
        total_expenses: total_expenses(transactions),
        total_earnings: total_earnings(transactions),
        net: net_savings(transactions),
        by_category: by_category(transactions),
        count: transactions.len(),
    }
}

/// Which budget figures apply to a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetScale {
    Monthly,
    /// A week is approximated as a quarter of the monthly budget.
    WeeklyProrated,
    Annual,
}

impl BudgetScale {
    pub fn for_timeframe(timeframe: &Timeframe) -> BudgetScale {
        match timeframe {
            Timeframe::CurrentWeek => BudgetScale::WeeklyProrated,
            Timeframe::Ytd => BudgetScale::Annual,
            Timeframe::CurrentMonth | Timeframe::Custom(_) => BudgetScale::Monthly,
        }
    }

    fn period<'b>(&self, budget: &'b Budget) -> &'b BudgetPeriod {
        match self {
            BudgetScale::Annual => &budget.annual,
            BudgetScale::Monthly | BudgetScale::WeeklyProrated => &budget.monthly,
        }
    }

    fn apply(&self, amount: Money) -> Money {
        match self {
            BudgetScale::WeeklyProrated => amount.scale(Decimal::new(25, 2)),
            BudgetScale::Monthly | BudgetScale::Annual => amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetLine {
    pub category: String,
    pub spent: Money,
    pub budget: Money,
    pub progress: BudgetProgress,
}

impl BudgetLine {
    fn new(category: String, spent: Money, budget: Money) -> Self {
        BudgetLine {
            category,
            spent,
            budget,
            progress: budget_progress(spent, budget),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetReport {
    pub scale: BudgetScale,
    pub overall: BudgetLine,
    pub lines: Vec<BudgetLine>,
}

/// Compares spending in `transactions` (already windowed) with the budget at `scale`.
/// Spending is matched to budget categories by normalized label.
pub fn budget_vs_actual(
    budget: &Budget,
    transactions: &[Transaction],
    scale: BudgetScale,
) -> BudgetReport {
    let mut spent: BTreeMap<String, Money> = BTreeMap::new();
    for t in transactions.iter().filter(|t| t.is_expense()) {
        *spent.entry(normalize(&t.category)).or_default() += t.amount.abs();
    }
    let period = scale.period(budget);
    let lines = period
        .categories()
        .iter()
        .map(|(category, amount)| {
            let used = spent.get(category).copied().unwrap_or_default();
            BudgetLine::new(category.clone(), used, scale.apply(*amount))
        })
        .collect();
    let overall = BudgetLine::new(
        "Total".to_string(),
        spent.values().sum(),
        scale.apply(period.total()),
    );
    BudgetReport {
        scale,
        overall,
        lines,
    }
}
