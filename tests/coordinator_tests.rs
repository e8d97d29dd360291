// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use std::str::FromStr;
use tallybook::ledger::{DateRange, Timeframe, TransactionFilter};
use tallybook::models::{AssetDraft, NotebookDraft, TransactionDraft};
use tallybook::store::{Collection, MemoryStore};
use tallybook::{Coordinator, LedgerError, Money, ValidationError};

fn money(s: &str) -> Money {
    Money::from_str(s).unwrap()
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn draft(description: &str, amount: &str, category: &str, date: NaiveDate) -> TransactionDraft {
    TransactionDraft {
        description: description.to_string(),
        amount: money(amount),
        category: category.to_string(),
        date,
        notebook_id: None,
        recurring: false,
        notes: None,
    }
}

fn notebook(name: &str) -> NotebookDraft {
    NotebookDraft {
        name: name.to_string(),
        description: None,
        category: "Travel".to_string(),
        budget: None,
        start_date: None,
        end_date: None,
    }
}

#[test]
fn saved_transaction_round_trips() {
    let store = MemoryStore::new();
    let ledger = Coordinator::new(&store, "alice");
    let mut input = draft("Weekly shop", "-56.73", "Groceries ", d(2025, 3, 15));
    input.notes = Some("receipt in drawer".to_string());
    input.recurring = true;

    let saved = ledger.save_transaction(input.clone(), None).unwrap();
    let fetched = ledger.get_transaction(&saved.id).unwrap().unwrap();
    assert_eq!(fetched.to_draft(), input);
    assert_eq!(fetched.created_at, fetched.updated_at);
    assert_eq!(ledger.list_categories().unwrap(), ["groceries"]);
}

#[test]
fn validation_rejects_before_any_write() {
    let store = MemoryStore::new();
    let ledger = Coordinator::new(&store, "alice");

    let err = ledger
        .save_transaction(draft("Nothing", "0", "Misc", d(2025, 1, 1)), None)
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Validation(ValidationError::ZeroAmount)
    ));

    let err = ledger
        .save_transaction(draft("Lunch", "-12", "   ", d(2025, 1, 1)), None)
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Validation(ValidationError::EmptyCategory)
    ));

    let mut bad = notebook("Trip");
    bad.start_date = Some(d(2025, 6, 10));
    bad.end_date = Some(d(2025, 6, 1));
    let err = ledger.save_notebook(bad, None).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Validation(ValidationError::EndBeforeStart { .. })
    ));

    let mut bad = notebook("Trip");
    bad.budget = Some(Money::ZERO);
    assert!(matches!(
        ledger.save_notebook(bad, None).unwrap_err(),
        LedgerError::Validation(ValidationError::NonPositiveBudget(_))
    ));

    assert!(matches!(
        ledger.save_notebook(notebook("  "), None).unwrap_err(),
        LedgerError::Validation(ValidationError::EmptyName)
    ));

    assert!(
        ledger
            .list_transactions(&TransactionFilter::new())
            .unwrap()
            .is_empty()
    );
    assert!(ledger.list_notebooks().unwrap().is_empty());
    assert!(ledger.list_categories().unwrap().is_empty());
}

#[test]
fn update_replaces_record_and_keeps_created_at() {
    let store = MemoryStore::new();
    let ledger = Coordinator::new(&store, "alice");
    let first = ledger
        .save_transaction(draft("Coffee", "-3.50", "Dining", d(2025, 2, 1)), None)
        .unwrap();

    let second = ledger
        .save_transaction(
            draft("Coffee and cake", "-7.25", "Dining", d(2025, 2, 2)),
            Some(first.id.as_str()),
        )
        .unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.created_at, first.created_at);
    assert!(second.updated_at >= first.updated_at);

    let all = ledger.list_transactions(&TransactionFilter::new()).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].amount, money("-7.25"));
}

#[test]
fn update_of_missing_record_is_not_found() {
    let store = MemoryStore::new();
    let ledger = Coordinator::new(&store, "alice");
    let err = ledger
        .save_transaction(draft("Ghost", "-1", "Misc", d(2025, 1, 1)), Some("missing"))
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::NotFound {
            kind: Collection::Transactions,
            ..
        }
    ));
}

#[test]
fn deleting_twice_reports_not_found() {
    let store = MemoryStore::new();
    let ledger = Coordinator::new(&store, "alice");
    let t = ledger
        .save_transaction(draft("Taxi", "-20", "Transport", d(2025, 1, 5)), None)
        .unwrap();
    ledger.delete_transaction(&t.id).unwrap();
    assert!(ledger.delete_transaction(&t.id).unwrap_err().is_not_found());
    assert!(ledger.get_transaction(&t.id).unwrap().is_none());
}

#[test]
fn users_do_not_see_each_other() {
    let store = MemoryStore::new();
    let alice = Coordinator::new(&store, "alice");
    let bob = Coordinator::new(&store, "bob");
    alice
        .save_transaction(draft("Rent", "-900", "Home", d(2025, 1, 1)), None)
        .unwrap();
    alice
        .save_budget_category("Home", money("900"), money("10800"))
        .unwrap();

    assert!(
        bob.list_transactions(&TransactionFilter::new())
            .unwrap()
            .is_empty()
    );
    assert!(bob.get_budget().unwrap().is_empty());
    assert!(bob.list_categories().unwrap().is_empty());
}

#[test]
fn budget_totals_follow_category_edits() {
    let store = MemoryStore::new();
    let ledger = Coordinator::new(&store, "alice");

    ledger
        .save_budget_category("Groceries", money("400"), money("4800"))
        .unwrap();
    ledger
        .save_budget_category("Home", money("2000"), money("24000"))
        .unwrap();
    let budget = ledger
        .save_budget_category(" groceries", money("450"), money("5400"))
        .unwrap();

    assert_eq!(budget.monthly.categories().len(), 2);
    assert_eq!(budget.monthly.total(), money("2450"));
    assert_eq!(budget.annual.total(), money("29400"));
    assert!(budget.monthly.is_consistent());
    assert!(budget.updated_at.is_some());

    let stored = ledger.get_budget().unwrap();
    assert_eq!(stored, budget);

    let budget = ledger.remove_budget_category("HOME").unwrap();
    assert_eq!(budget.monthly.total(), money("450"));
    assert_eq!(budget.annual.total(), money("5400"));
    assert_eq!(ledger.list_categories().unwrap(), ["groceries", "home"]);
}

#[test]
fn budget_rejects_negative_amounts() {
    let store = MemoryStore::new();
    let ledger = Coordinator::new(&store, "alice");
    let err = ledger
        .save_budget_category("Fun", money("-1"), money("0"))
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Validation(ValidationError::NegativeBudgetAmount { .. })
    ));
    assert!(ledger.get_budget().unwrap().is_empty());
}

#[test]
fn registry_grows_from_every_write_path() {
    let store = MemoryStore::new();
    let ledger = Coordinator::new(&store, "alice");
    ledger
        .save_transaction(draft("Shop", "-10", "groceries", d(2025, 1, 1)), None)
        .unwrap();
    ledger
        .save_transaction(draft("Shop", "-12", "Groceries ", d(2025, 1, 2)), None)
        .unwrap();
    ledger.save_notebook(notebook("Lisbon"), None).unwrap();
    ledger
        .save_asset(
            AssetDraft {
                name: "Car".to_string(),
                category: "Vehicles".to_string(),
                value: money("12000"),
                description: None,
            },
            None,
        )
        .unwrap();

    assert_eq!(
        ledger.list_categories().unwrap(),
        ["groceries", "travel", "vehicles"]
    );

    let t = ledger.list_transactions(&TransactionFilter::new()).unwrap();
    ledger.delete_transaction(&t[0].id).unwrap();
    assert_eq!(ledger.list_categories().unwrap().len(), 3);
}

#[test]
fn assets_sorted_by_name_and_summed() {
    let store = MemoryStore::new();
    let ledger = Coordinator::new(&store, "alice");
    let asset = |name: &str, value: &str| AssetDraft {
        name: name.to_string(),
        category: "Savings".to_string(),
        value: money(value),
        description: None,
    };
    let house = ledger.save_asset(asset("House", "250000"), None).unwrap();
    ledger.save_asset(asset("Brokerage", "40000"), None).unwrap();

    let names: Vec<String> = ledger
        .list_assets()
        .unwrap()
        .into_iter()
        .map(|a| a.name)
        .collect();
    assert_eq!(names, ["Brokerage", "House"]);
    assert_eq!(ledger.net_worth().unwrap(), money("290000"));

    ledger
        .save_asset(asset("House", "260000"), Some(house.id.as_str()))
        .unwrap();
    assert_eq!(ledger.net_worth().unwrap(), money("300000"));

    assert!(matches!(
        ledger.save_asset(asset("Debt", "-5"), None).unwrap_err(),
        LedgerError::Validation(ValidationError::NegativeAssetValue(_))
    ));

    ledger.delete_asset(&house.id).unwrap();
    assert!(ledger.delete_asset(&house.id).unwrap_err().is_not_found());
    assert_eq!(ledger.net_worth().unwrap(), money("40000"));
}

#[test]
fn listing_is_newest_first_and_filtered() {
    let store = MemoryStore::new();
    let ledger = Coordinator::new(&store, "alice");
    for (desc, amount, cat, day) in [
        ("Salary", "5000", "Primary Income", 1),
        ("Rent", "-2000", "Home", 3),
        ("Groceries", "-56.73", "Groceries", 15),
    ] {
        ledger
            .save_transaction(draft(desc, amount, cat, d(2025, 3, day)), None)
            .unwrap();
    }
    let all = ledger.list_transactions(&TransactionFilter::new()).unwrap();
    let order: Vec<&str> = all.iter().map(|t| t.description.as_str()).collect();
    assert_eq!(order, ["Groceries", "Rent", "Salary"]);

    let range = DateRange::new(d(2025, 3, 2), d(2025, 3, 31)).unwrap();
    let summary = ledger.summary(None, Some(range)).unwrap();
    assert_eq!(summary.count, 2);
    assert_eq!(summary.total_expenses, money("2056.73"));
    assert_eq!(summary.total_earnings, Money::ZERO);
}

#[test]
fn overview_and_budget_report() {
    let store = MemoryStore::new();
    let ledger = Coordinator::new(&store, "alice");
    let mut rent = draft("Rent", "-2000", "Home", d(2025, 3, 1));
    rent.recurring = true;
    ledger.save_transaction(rent, None).unwrap();
    ledger
        .save_transaction(draft("Shop", "-56.73", "Groceries", d(2025, 3, 15)), None)
        .unwrap();
    ledger
        .save_transaction(draft("Pay", "5000", "Primary Income", d(2025, 3, 15)), None)
        .unwrap();
    ledger
        .save_transaction(draft("Old", "-99", "Groceries", d(2025, 2, 20)), None)
        .unwrap();
    ledger
        .save_budget_category("groceries", money("400"), money("4800"))
        .unwrap();

    let march = DateRange::new(d(2025, 3, 1), d(2025, 3, 31)).unwrap();
    let overview = ledger.overview(Some(march), 5).unwrap();
    assert_eq!(overview.summary.net, money("2943.27"));
    assert_eq!(overview.top_expenses[0].description, "Rent");
    assert_eq!(overview.recurring.len(), 1);

    let report = ledger
        .budget_report(Timeframe::CurrentMonth, d(2025, 3, 20))
        .unwrap();
    assert_eq!(report.lines.len(), 1);
    assert_eq!(report.lines[0].spent, money("56.73"));
    assert_eq!(report.overall.budget, money("400"));

    let trend = ledger.savings_trend(None).unwrap();
    let months: Vec<&str> = trend.iter().map(|m| m.month.as_str()).collect();
    assert_eq!(months, ["2025-02", "2025-03"]);
}

fn out_of_range(err: LedgerError) -> bool {
    matches!(
        err,
        LedgerError::Validation(ValidationError::AmountOutOfRange(_))
    )
}

#[test]
fn amounts_must_be_whole_cents_within_the_limit() {
    let store = MemoryStore::new();
    let ledger = Coordinator::new(&store, "alice");

    assert_eq!(Money::LIMIT, money("1000000000000000"));
    let huge = "-50000000000000000000000000000";
    for amount in [huge, "-1000000000000000.01", "-3.505"] {
        let err = ledger
            .save_transaction(draft("Big", amount, "Misc", d(2025, 1, 1)), None)
            .unwrap_err();
        assert!(out_of_range(err), "{} accepted", amount);
    }
    ledger
        .save_transaction(draft("Max", "-1000000000000000", "Misc", d(2025, 1, 1)), None)
        .unwrap();
    ledger
        .save_transaction(draft("Max", "-1000000000000000", "Misc", d(2025, 1, 2)), None)
        .unwrap();
    let summary = ledger.summary(None, None).unwrap();
    assert_eq!(summary.total_expenses, money("2000000000000000"));

    let mut nb = notebook("Trip");
    nb.budget = Some(money("0.001"));
    assert!(out_of_range(ledger.save_notebook(nb, None).unwrap_err()));

    let err = ledger
        .save_budget_category("Home", money("100000000000000000000"), money("0"))
        .unwrap_err();
    assert!(out_of_range(err));

    let err = ledger
        .save_asset(
            AssetDraft {
                name: "Yacht".to_string(),
                category: "Vehicles".to_string(),
                value: money(huge).abs(),
                description: None,
            },
            None,
        )
        .unwrap_err();
    assert!(out_of_range(err));
    assert_eq!(ledger.list_assets().unwrap().len(), 0);
}
