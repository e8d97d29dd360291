// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use tallybook::Money;
use tallybook::aggregate::{self, BudgetScale};
use tallybook::ledger::Timeframe;
use tallybook::models::{Asset, Budget, Transaction};

fn money(s: &str) -> Money {
    Money::from_str(s).unwrap()
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn txn(id: &str, amount: &str, category: &str, date: NaiveDate, recurring: bool) -> Transaction {
    let ts = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    Transaction {
        id: id.to_string(),
        description: format!("{} entry", category),
        amount: money(amount),
        category: category.to_string(),
        date,
        notebook_id: None,
        recurring,
        notes: None,
        created_at: ts,
        updated_at: ts,
    }
}

fn scenario() -> Vec<Transaction> {
    vec![
        txn("g", "-56.73", "Groceries", d(2025, 3, 15), false),
        txn("h", "-2000", "Home", d(2025, 3, 1), true),
        txn("p", "5000", "Primary Income", d(2025, 3, 15), false),
    ]
}

#[test]
fn scenario_totals_and_savings_rate() {
    let t = scenario();
    assert_eq!(aggregate::total_expenses(&t), money("2056.73"));
    assert_eq!(aggregate::total_earnings(&t), money("5000"));
    assert_eq!(aggregate::net_savings(&t), money("2943.27"));
    assert_eq!(
        aggregate::savings_rate(&t).round_dp(1),
        Decimal::from_str("58.9").unwrap()
    );
    assert_eq!(
        aggregate::total_earnings(&t) - aggregate::total_expenses(&t),
        aggregate::net_savings(&t)
    );
}

#[test]
fn savings_rate_is_zero_without_earnings() {
    let t = vec![txn("a", "-10", "Food", d(2025, 1, 2), false)];
    assert_eq!(aggregate::savings_rate(&t), Decimal::ZERO);
    assert_eq!(aggregate::savings_rate(&[]), Decimal::ZERO);
    assert_eq!(aggregate::net_savings(&t), money("-10"));
}

#[test]
fn budget_progress_under_and_over() {
    let under = aggregate::budget_progress(money("700"), money("1000"));
    assert_eq!(under.percent, Decimal::from(70));
    assert!(!under.over_budget);

    let over = aggregate::budget_progress(money("1200"), money("1000"));
    assert_eq!(over.percent, Decimal::ONE_HUNDRED);
    assert!(over.over_budget);

    let exact = aggregate::budget_progress(money("1000"), money("1000"));
    assert_eq!(exact.percent, Decimal::ONE_HUNDRED);
    assert!(!exact.over_budget);
}

#[test]
fn budget_progress_with_zero_budget() {
    let p = aggregate::budget_progress(money("5"), Money::ZERO);
    assert_eq!(p.percent, Decimal::ZERO);
    assert!(p.over_budget);
}

#[test]
fn by_category_splits_expenses_and_earnings() {
    let mut t = scenario();
    t.push(txn("g2", "-43.27", "Groceries", d(2025, 3, 20), false));
    let cats = aggregate::by_category(&t);
    assert_eq!(cats["Groceries"].expenses, money("100"));
    assert_eq!(cats["Groceries"].earnings, Money::ZERO);
    assert_eq!(cats["Primary Income"].earnings, money("5000"));
    assert_eq!(cats.len(), 3);
}

#[test]
fn summary_counts_and_nets() {
    let s = aggregate::summarize(&scenario());
    assert_eq!(s.count, 3);
    assert_eq!(s.net, money("2943.27"));
    assert_eq!(s.total_expenses, money("2056.73"));
}

#[test]
fn top_expenses_and_recurring() {
    let mut t = scenario();
    t.push(txn("x", "-300", "Travel", d(2025, 3, 4), false));
    let top = aggregate::top_expenses(&t, 2);
    let ids: Vec<&str> = top.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["h", "x"]);

    let rec = aggregate::recurring(&t);
    assert_eq!(rec.len(), 1);
    assert_eq!(rec[0].id, "h");
}

#[test]
fn monthly_savings_rate_orders_months() {
    let t = vec![
        txn("b", "1000", "Salary", d(2025, 2, 1), false),
        txn("c", "-250", "Rent", d(2025, 2, 3), false),
        txn("a", "-40", "Food", d(2025, 1, 9), false),
    ];
    let trend = aggregate::monthly_savings_rate(&t);
    assert_eq!(trend.len(), 2);
    assert_eq!(trend[0].month, "2025-01");
    assert_eq!(trend[0].rate, Decimal::ZERO);
    assert_eq!(trend[1].month, "2025-02");
    assert_eq!(trend[1].rate, Decimal::from(75));
}

#[test]
fn net_worth_sums_assets() {
    let ts = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let asset = |name: &str, value: &str| Asset {
        id: name.to_string(),
        name: name.to_string(),
        category: "Savings".to_string(),
        value: money(value),
        description: None,
        created_at: ts,
        updated_at: ts,
    };
    let assets = vec![asset("Car", "12000"), asset("Cash", "3500.50")];
    assert_eq!(aggregate::net_worth(&assets), money("15500.50"));
    assert_eq!(aggregate::net_worth(&[]), Money::ZERO);
}

fn budget() -> Budget {
    let mut b = Budget::default();
    b.monthly.set("Groceries", money("400"));
    b.monthly.set("Home", money("2000"));
    b.annual.set("Groceries", money("4800"));
    b.annual.set("Home", money("24000"));
    b
}

#[test]
fn budget_vs_actual_matches_normalized_labels() {
    let mut t = scenario();
    t.push(txn("g2", "-43.27", " groceries", d(2025, 3, 20), false));
    let report = aggregate::budget_vs_actual(&budget(), &t, BudgetScale::Monthly);

    assert_eq!(report.lines.len(), 2);
    let groceries = report
        .lines
        .iter()
        .find(|l| l.category == "groceries")
        .unwrap();
    assert_eq!(groceries.spent, money("100"));
    assert_eq!(groceries.budget, money("400"));
    assert_eq!(groceries.progress.percent, Decimal::from(25));

    assert_eq!(report.overall.category, "Total");
    assert_eq!(report.overall.budget, money("2400"));
    assert_eq!(report.overall.spent, money("2100"));
    assert!(!report.overall.progress.over_budget);
}

#[test]
fn weekly_scale_prorates_monthly_budget() {
    let t = vec![txn("g", "-150", "Groceries", d(2025, 3, 15), false)];
    let report = aggregate::budget_vs_actual(&budget(), &t, BudgetScale::WeeklyProrated);
    let groceries = &report.lines[0];
    assert_eq!(groceries.budget, money("100"));
    assert_eq!(groceries.progress.percent, Decimal::ONE_HUNDRED);
    assert!(groceries.progress.over_budget);
    assert_eq!(report.overall.budget, money("600"));
}

#[test]
fn annual_scale_uses_annual_figures() {
    let report = aggregate::budget_vs_actual(&budget(), &scenario(), BudgetScale::Annual);
    assert_eq!(report.overall.budget, money("28800"));
}

#[test]
fn scale_follows_timeframe() {
    assert_eq!(
        BudgetScale::for_timeframe(&Timeframe::CurrentWeek),
        BudgetScale::WeeklyProrated
    );
    assert_eq!(
        BudgetScale::for_timeframe(&Timeframe::CurrentMonth),
        BudgetScale::Monthly
    );
    assert_eq!(BudgetScale::for_timeframe(&Timeframe::Ytd), BudgetScale::Annual);
}

#[test]
fn compact_currency() {
    assert_eq!(money("950").compact(), "$950.00");
    assert_eq!(money("1234.56").compact(), "$1.2K");
    assert_eq!(money("3400000").compact(), "$3.4M");
    assert_eq!(money("-2500").compact(), "-$2.5K");
    assert_eq!(money("999.996").compact(), "$1.0K");
    assert_eq!(money("999.99").compact(), "$999.99");
    assert_eq!(money("999999.96").compact(), "$1.0M");
}

#[test]
fn sums_saturate_instead_of_overflowing() {
    let t = vec![
        txn("a", "-50000000000000000000000000000", "Huge", d(2025, 1, 2), false),
        txn("b", "-50000000000000000000000000000", "Huge", d(2025, 1, 3), false),
        txn("c", "60000000000000000000000000000", "Income", d(2025, 1, 4), false),
        txn("e", "60000000000000000000000000000", "Income", d(2025, 1, 5), false),
    ];
    let s = aggregate::summarize(&t);
    assert_eq!(s.total_expenses, Money::new(Decimal::MAX));
    assert_eq!(s.total_earnings, Money::new(Decimal::MAX));
    assert_eq!(s.net, Money::ZERO);
    assert_eq!(aggregate::savings_rate(&t), Decimal::ZERO);
    assert_eq!(s.by_category["Huge"].expenses, Money::new(Decimal::MAX));
    assert_eq!(aggregate::monthly_savings_rate(&t).len(), 1);
}

#[test]
fn budget_progress_saturates_on_tiny_budgets() {
    let p = aggregate::budget_progress(money("1000000000000000000000000000"), money("0.001"));
    assert_eq!(p.percent, Decimal::ONE_HUNDRED);
    assert!(p.over_budget);
    assert_eq!(
        money("-1000000000000000000000000000").percent_of(money("0.001")),
        Decimal::MIN
    );
}

#[test]
fn net_worth_saturates() {
    let ts = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let asset = |name: &str| Asset {
        id: name.to_string(),
        name: name.to_string(),
        category: "Savings".to_string(),
        value: money("60000000000000000000000000000"),
        description: None,
        created_at: ts,
        updated_at: ts,
    };
    assert_eq!(
        aggregate::net_worth(&[asset("a"), asset("b")]),
        Money::new(Decimal::MAX)
    );
}
