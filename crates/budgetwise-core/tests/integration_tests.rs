//! Integration tests for budgetwise-core
//!
//! These tests exercise the import → categorize → advise → apply workflow
//! through the shared session handle.

use budgetwise_core::{
    parse_csv, AdjustmentAction, AdjustmentOutcome, AdjustmentReason, BudgetConfig,
    CategorizeOutcome, Category, ClassifierClient, DonationOutcome, DonationRequest, Error,
    ForecastMethod, ForecastOutcome, NewTransaction, SharedSession, TransactionCategory,
    UtilizationStatus,
};
use chrono::NaiveDate;

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).expect("valid date")
}

fn session() -> SharedSession {
    SharedSession::from_config(BudgetConfig::default()).expect("default config is valid")
}

fn spend(session: &SharedSession, day: u32, category: Category, amount: f64) {
    session
        .record_transaction(NewTransaction::confirmed(
            date(4, day),
            "test expense",
            amount,
            category,
        ))
        .expect("Failed to record transaction");
}

/// A month of history: most categories healthy, Entertainment overspent
fn monthly_csv() -> &'static str {
    r#"date,description,amount,category
2024-04-01,Weekly groceries,120.00,Food
2024-04-02,Monthly bus pass,150.00,Transportation
2024-04-03,Concert tickets,95.00,Entertainment
2024-04-05,Electricity,70.00,Utilities
2024-04-06,Running shoes,140.00,Shopping
2024-04-07,Streaming bundle,35.00,Subscriptions
2024-04-08,Pharmacy,65.00,Healthcare
2024-04-09,Dry cleaning,60.00,Other
2024-04-10,Groceries,130.00,Food
2024-04-12,Cinema night,70.00,Entertainment
2024-04-15,Groceries,125.00,Food"#
}

// =============================================================================
// Session Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_import_advise_apply_workflow() {
    let session = session();
    let rows = parse_csv(monthly_csv().as_bytes()).expect("Failed to parse CSV");
    assert_eq!(rows.len(), 11);

    let summary = session.import(rows, None).await.expect("Import failed");
    assert_eq!(summary.recorded, 11);
    assert!(summary.uncertain.is_empty());

    // Entertainment: 165 spent of 150
    let suggestion = match session.suggest_adjustment().unwrap() {
        AdjustmentOutcome::AdjustmentNeeded(s) => s,
        other => panic!("expected a suggestion, got {:?}", other),
    };
    assert_eq!(suggestion.category, Category::Entertainment);
    assert_eq!(suggestion.reason, AdjustmentReason::Overspent);
    assert_eq!(suggestion.action, AdjustmentAction::Increase);
    assert_eq!(suggestion.chosen_multiplier, 1.1);
    assert_eq!(
        suggestion.details,
        "Category is overspent (used 110.0% of budget)"
    );

    let applied = session
        .apply_adjustment(suggestion.category, suggestion.action)
        .expect("Apply failed");
    assert!((applied.new_budget - 165.0).abs() < 1e-9);
    assert_eq!(applied.reward, 1.0);
    assert!((applied.q_value - 0.1).abs() < 1e-12);

    // Spend tracking for the category is cleared; history is not
    let budgets = session.get_budgets().unwrap();
    let entertainment = budgets[Category::Entertainment.index()];
    assert_eq!(entertainment.remaining, entertainment.limit);

    let snapshot = session.snapshot().unwrap();
    assert_eq!(snapshot.transactions.len(), 11);
    assert!(
        (snapshot.value_table[Category::Entertainment.index()].increase - 0.1).abs() < 1e-12
    );
}

#[tokio::test]
async fn test_categorize_then_confirm() {
    let session = session();
    let classifier = ClassifierClient::mock();

    let outcome = session
        .categorize(&classifier, date(5, 1), "Starbucks coffee", 6.5)
        .await
        .unwrap();
    match outcome {
        CategorizeOutcome::Recorded { transaction } => {
            assert_eq!(transaction.category, TransactionCategory::Budget(Category::Food));
            assert!(transaction.confidence >= 0.7);
        }
        other => panic!("expected a recorded transaction, got {:?}", other),
    }

    let pending = match session
        .categorize(&classifier, date(5, 2), "Gift for a friend", 45.0)
        .await
        .unwrap()
    {
        CategorizeOutcome::Uncertain(pending) => pending,
        other => panic!("expected an uncertain result, got {:?}", other),
    };
    assert_eq!(pending.suggested_category, Category::Other);
    assert_eq!(session.snapshot().unwrap().transactions.len(), 1);

    let tx = session
        .confirm_category(pending.date, &pending.description, pending.amount, Category::Shopping)
        .unwrap();
    assert_eq!(tx.confidence, 1.0);

    let snapshot = session.snapshot().unwrap();
    assert_eq!(snapshot.transactions.len(), 2);
    assert_eq!(snapshot.feedback.len(), 1);
    assert_eq!(snapshot.feedback[0].correct_category, Category::Shopping);
    assert_eq!(
        snapshot.budgets[Category::Shopping.index()].remaining,
        155.0
    );
}

// =============================================================================
// Ledger Invariant Tests
// =============================================================================

#[test]
fn test_remaining_matches_history_after_mixed_operations() {
    let session = session();
    spend(&session, 1, Category::Food, 80.0);
    spend(&session, 2, Category::Utilities, 30.0);
    spend(&session, 3, Category::Food, 45.5);

    session.adjust_budget(Category::Food, 1.1).unwrap();
    session
        .record_donation(DonationRequest {
            date: date(4, 4),
            amount: 10.0,
            charity_category: "Education".into(),
            reallocation_category: Some("Utilities".into()),
        })
        .unwrap();

    let snapshot = session.snapshot().unwrap();
    let food = snapshot.budgets[Category::Food.index()];
    assert!((food.limit - 550.0).abs() < 1e-9);
    assert!((food.limit - food.remaining - 125.5).abs() < 1e-9);

    // Reallocated donations count against the funding category
    let utilities = snapshot.budgets[Category::Utilities.index()];
    assert!((utilities.remaining - 60.0).abs() < 1e-9);

    let donation = snapshot.transactions.last().unwrap();
    assert_eq!(donation.category, TransactionCategory::Charity);
    assert_eq!(donation.amount, -10.0);
    assert_eq!(snapshot.donations.len(), 1);
}

#[test]
fn test_rejected_donation_leaves_session_unchanged() {
    let session = session();
    spend(&session, 1, Category::Subscriptions, 45.0);
    let before = session.snapshot().unwrap();

    let err = session
        .record_donation(DonationRequest {
            date: date(4, 2),
            amount: 20.0,
            charity_category: "Animal Welfare".into(),
            reallocation_category: Some("Subscriptions".into()),
        })
        .unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(
        err.to_string(),
        "Validation error: Not enough budget in Subscriptions to reallocate"
    );
    assert_eq!(session.snapshot().unwrap(), before);
}

// =============================================================================
// Analysis Tests
// =============================================================================

#[test]
fn test_every_category_gets_exactly_one_status() {
    let session = session();
    spend(&session, 1, Category::Food, 520.0);
    spend(&session, 1, Category::Transportation, 170.0);
    spend(&session, 1, Category::Shopping, 130.0);

    let analysis = session.utilization().unwrap();
    assert_eq!(analysis.len(), Category::ALL.len());
    for u in &analysis {
        let flags = [
            u.status == UtilizationStatus::Overspent,
            u.status == UtilizationStatus::NearingLimit,
            u.status == UtilizationStatus::Underutilized,
            u.status == UtilizationStatus::Healthy,
        ];
        assert_eq!(flags.iter().filter(|f| **f).count(), 1);
    }
    assert_eq!(
        analysis[Category::Transportation.index()].status,
        UtilizationStatus::NearingLimit
    );
    assert_eq!(
        analysis[Category::Shopping.index()].status,
        UtilizationStatus::Healthy
    );

    // Repeated reads return the same result
    assert_eq!(session.utilization().unwrap(), analysis);
}

// =============================================================================
// Forecast and Donation Tests
// =============================================================================

#[test]
fn test_forecast_boundary() {
    let session = session();
    spend(&session, 10, Category::Food, 10.0);
    spend(&session, 10, Category::Food, 20.0);

    match session.forecast().unwrap() {
        ForecastOutcome::NotEnoughData {
            transaction_count, ..
        } => assert_eq!(transaction_count, 2),
        other => panic!("expected not enough data, got {:?}", other),
    }

    spend(&session, 10, Category::Food, 30.0);
    let forecast = match session.forecast().unwrap() {
        ForecastOutcome::Success(f) => f,
        other => panic!("expected a forecast, got {:?}", other),
    };
    assert_eq!(forecast.method, ForecastMethod::SameDay);
    let amounts: Vec<f64> = forecast.points.iter().map(|p| p.amount).collect();
    for (actual, expected) in amounts.iter().zip([18.0, 20.0, 22.0]) {
        assert!((actual - expected).abs() < 1e-9);
    }
    assert_eq!(forecast.points[0].date, date(4, 11));
}

#[test]
fn test_donation_suggestion_from_spending_tiers() {
    let session = session();
    for (day, category, amount) in [
        (1, Category::Food, 5.0),
        (2, Category::Food, 6.0),
        (3, Category::Food, 7.0),
        (4, Category::Shopping, 50.0),
        (5, Category::Shopping, 55.0),
        (6, Category::Shopping, 60.0),
        (7, Category::Food, 500.0),
        (8, Category::Transportation, 520.0),
    ] {
        spend(&session, day, category, amount);
    }

    let suggestion = match session.suggest_donation().unwrap() {
        DonationOutcome::Success(s) => s,
        other => panic!("expected a suggestion, got {:?}", other),
    };
    assert_eq!(suggestion.suggested_amount, 2.75);
    assert_eq!(suggestion.tiers.medium, 55.0);
    assert_eq!(suggestion.suggested_reallocation, Category::Entertainment);
    assert_eq!(
        suggestion.suggested_categories,
        vec![
            "Education",
            "Health",
            "Environment",
            "Poverty Alleviation",
            "Animal Welfare"
        ]
    );
}
