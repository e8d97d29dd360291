// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, TimeZone, Utc};
use tallybook::ledger::{self, DateRange, Timeframe, TransactionFilter};
use tallybook::models::{Transaction, TxnKind};
use tallybook::registry::{CategoryRegistry, normalize};
use tallybook::{Money, ValidationError};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn txn(id: &str, description: &str, amount: i64, category: &str, date: NaiveDate) -> Transaction {
    let ts = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
    Transaction {
        id: id.to_string(),
        description: description.to_string(),
        amount: Money::from(amount),
        category: category.to_string(),
        date,
        notebook_id: None,
        recurring: false,
        notes: None,
        created_at: ts,
        updated_at: ts,
    }
}

fn sample() -> Vec<Transaction> {
    let mut trip = txn("t1", "Hotel in Lisbon", -300, "Travel", d(2025, 5, 10));
    trip.notebook_id = Some("nb-lisbon".to_string());
    vec![
        trip,
        txn("t2", "Weekly groceries", -80, "Groceries", d(2025, 5, 12)),
        txn("t3", "Salary", 4000, "Income", d(2025, 5, 31)),
        txn("t4", "Farmers market", -25, "groceries ", d(2025, 4, 30)),
    ]
}

fn ids(t: &[Transaction]) -> Vec<&str> {
    let mut v: Vec<&str> = t.iter().map(|t| t.id.as_str()).collect();
    v.sort();
    v
}

#[test]
fn empty_filter_matches_everything() {
    let out = ledger::filter(sample(), &TransactionFilter::new());
    assert_eq!(out.len(), 4);
}

#[test]
fn range_is_inclusive_on_both_ends() {
    let range = DateRange::new(d(2025, 5, 10), d(2025, 5, 31)).unwrap();
    let out = ledger::filter(sample(), &TransactionFilter::new().in_range(range));
    assert_eq!(ids(&out), ["t1", "t2", "t3"]);
}

#[test]
fn range_rejects_end_before_start() {
    let err = DateRange::new(d(2025, 5, 10), d(2025, 5, 1)).unwrap_err();
    assert!(matches!(err, ValidationError::EndBeforeStart { .. }));
}

#[test]
fn category_filter_uses_normalized_labels() {
    let out = ledger::filter(sample(), &TransactionFilter::new().category("GROCERIES"));
    assert_eq!(ids(&out), ["t2", "t4"]);
}

#[test]
fn kind_notebook_and_search_combine() {
    let out = ledger::filter(sample(), &TransactionFilter::new().kind(TxnKind::Earning));
    assert_eq!(ids(&out), ["t3"]);

    let out = ledger::filter(sample(), &TransactionFilter::new().notebook("nb-lisbon"));
    assert_eq!(ids(&out), ["t1"]);

    let out = ledger::filter(sample(), &TransactionFilter::new().search("MARKET"));
    assert_eq!(ids(&out), ["t4"]);

    let criteria = TransactionFilter::new()
        .kind(TxnKind::Expense)
        .search("groceries");
    let out = ledger::filter(sample(), &criteria);
    assert_eq!(ids(&out), ["t2"]);
}

#[test]
fn sort_recent_breaks_ties_by_created_at() {
    let mut a = txn("older", "a", -1, "X", d(2025, 6, 1));
    let mut b = txn("newer", "b", -1, "X", d(2025, 6, 1));
    a.created_at = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
    b.created_at = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
    let c = txn("earlier-day", "c", -1, "X", d(2025, 5, 31));
    let mut v = vec![c, a, b];
    ledger::sort_recent(&mut v);
    let order: Vec<&str> = v.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(order, ["newer", "older", "earlier-day"]);
}

#[test]
fn named_timeframes_resolve_against_today() {
    // 2025-05-14 is a Wednesday.
    let today = d(2025, 5, 14);
    assert_eq!(
        Timeframe::CurrentWeek.resolve(today),
        DateRange::new(d(2025, 5, 12), today).unwrap()
    );
    assert_eq!(
        Timeframe::CurrentMonth.resolve(today),
        DateRange::new(d(2025, 5, 1), today).unwrap()
    );
    assert_eq!(
        Timeframe::Ytd.resolve(today),
        DateRange::new(d(2025, 1, 1), today).unwrap()
    );

    let monday = d(2025, 5, 12);
    assert_eq!(Timeframe::CurrentWeek.resolve(monday).start, monday);
}

#[test]
fn timeframe_and_kind_parse() {
    assert_eq!("week".parse::<Timeframe>().unwrap(), Timeframe::CurrentWeek);
    assert_eq!("YTD".parse::<Timeframe>().unwrap(), Timeframe::Ytd);
    assert!("fortnight".parse::<Timeframe>().is_err());

    assert_eq!("income".parse::<TxnKind>().unwrap(), TxnKind::Earning);
    assert_eq!("Expenses".parse::<TxnKind>().unwrap(), TxnKind::Expense);
    assert!(matches!(
        "refund".parse::<TxnKind>(),
        Err(ValidationError::InvalidChoice { field: "type", .. })
    ));
}

#[test]
fn sign_convention() {
    assert_eq!(TxnKind::Expense.signed(Money::from(42)), Money::from(-42));
    assert_eq!(TxnKind::Expense.signed(Money::from(-42)), Money::from(-42));
    assert_eq!(TxnKind::Earning.signed(Money::from(-42)), Money::from(42));
}

#[test]
fn registry_collapses_case_and_whitespace() {
    let mut reg = CategoryRegistry::new();
    assert!(reg.register("groceries"));
    assert!(!reg.register("Groceries "));
    assert_eq!(reg.all(), ["groceries"]);
    assert!(reg.contains("  GROCERIES"));
}

#[test]
fn registry_ignores_blank_and_sorts() {
    let reg: CategoryRegistry = ["Travel", "  ", "home", "Bills"].into_iter().collect();
    assert_eq!(reg.all(), ["bills", "home", "travel"]);
    assert_eq!(reg.len(), 3);
    assert_eq!(normalize("  Dining Out "), "dining out");
}
