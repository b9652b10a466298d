// FinanceRepo tests: schema init, owner scoping, goal persistence, entries, fixed expenses, dashboard

mod common;

use common::{at, automation, date, temp_repo};
use pocketgoals::backfill::{GoalStore, load_and_backfill, run_backfill};
use pocketgoals::clock::FixedClock;
use pocketgoals::models::*;

fn new_goal(name: &str, automation: GoalAutomation) -> NewGoal {
    NewGoal {
        name: name.into(),
        target_amount: 1000.0,
        deposited_amount: 0.0,
        automation,
    }
}

fn entry(kind: EntryKind, amount: f64, category: &str, occurred_on: chrono::NaiveDate) -> NewEntry {
    NewEntry {
        kind,
        amount,
        category: category.into(),
        description: None,
        occurred_on,
    }
}

#[tokio::test]
async fn init_is_idempotent() {
    let (_dir, repo) = temp_repo().await;
    // Second init is no-op (IF NOT EXISTS)
    repo.init().await.unwrap();
}

#[tokio::test]
async fn goal_create_and_read_back() {
    let (_dir, repo) = temp_repo().await;
    let mut a = automation(100.0, 15, date(2024, 1, 5), Some(3));
    a.auto_deposit_time = Some(common::time(8, 30));
    let created = repo.create_goal("alice", &new_goal("Holiday", a)).await.unwrap();

    assert_eq!(created.owner_id, "alice");
    assert_eq!(created.name, "Holiday");
    assert_eq!(created.automation.auto_deposit_day, Some(15));
    assert_eq!(created.automation.auto_deposit_time, Some(common::time(8, 30)));
    assert_eq!(created.automation.auto_deposit_start, Some(date(2024, 1, 5)));
    assert_eq!(created.automation.auto_deposit_months, Some(3));
    assert_eq!(created.automation.last_processed, None);

    let fetched = repo.get_goal("alice", created.id).await.unwrap().unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn goals_are_owner_scoped() {
    let (_dir, repo) = temp_repo().await;
    let g = repo
        .create_goal("alice", &new_goal("Car", GoalAutomation::default()))
        .await
        .unwrap();

    assert!(repo.get_goal("bob", g.id).await.unwrap().is_none());
    assert!(repo.list_goals("bob").await.unwrap().is_empty());
    assert!(!repo.delete_goal("bob", g.id).await.unwrap());
    assert!(
        repo.add_manual_deposit("bob", g.id, 50.0)
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        repo.record_auto_deposits("bob", g.id, 100.0, date(2024, 1, 1))
            .await
            .is_err()
    );

    assert!(repo.delete_goal("alice", g.id).await.unwrap());
    assert!(repo.list_goals("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn recorded_checkpoint_cannot_repeat_or_move_back() {
    let (_dir, repo) = temp_repo().await;
    let g = repo
        .create_goal("alice", &new_goal("Fund", GoalAutomation::default()))
        .await
        .unwrap();

    repo.record_auto_deposits("alice", g.id, 100.0, date(2024, 2, 15))
        .await
        .unwrap();
    assert!(
        repo.record_auto_deposits("alice", g.id, 200.0, date(2024, 2, 15))
            .await
            .is_err()
    );
    assert!(
        repo.record_auto_deposits("alice", g.id, 200.0, date(2024, 1, 15))
            .await
            .is_err()
    );

    let stored = repo.get_goal("alice", g.id).await.unwrap().unwrap();
    assert_eq!(stored.deposited_amount, 100.0);
    assert_eq!(stored.automation.last_processed, Some(date(2024, 2, 15)));
}

#[tokio::test]
async fn backfill_persists_and_second_pass_is_idempotent() {
    let (_dir, repo) = temp_repo().await;
    let g = repo
        .create_goal(
            "alice",
            &new_goal("Emergency", automation(100.0, 15, date(2024, 1, 5), Some(3))),
        )
        .await
        .unwrap();

    let clock = FixedClock(at(2024, 4, 1, 0, 0));
    let (goals, report) = load_and_backfill(&repo, "alice", &clock).await.unwrap();
    assert_eq!(report.total_added(), 300.0);
    assert!(report.failed_goal_ids.is_empty());
    assert_eq!(goals[0].deposited_amount, 300.0);

    let stored = repo.get_goal("alice", g.id).await.unwrap().unwrap();
    assert_eq!(stored.deposited_amount, 300.0);
    assert_eq!(stored.automation.last_processed, Some(date(2024, 3, 15)));

    let (_, again) = load_and_backfill(&repo, "alice", &clock).await.unwrap();
    assert!(again.applied.is_empty());
    assert_eq!(again.notification(), None);

    let later = FixedClock(at(2024, 4, 20, 12, 0));
    let (_, after_window) = load_and_backfill(&repo, "alice", &later).await.unwrap();
    assert!(after_window.applied.is_empty());
}

#[tokio::test]
async fn manual_deposit_during_backfill_is_kept() {
    let (_dir, repo) = temp_repo().await;
    let g = repo
        .create_goal(
            "alice",
            &new_goal("Emergency", automation(100.0, 15, date(2024, 1, 5), Some(3))),
        )
        .await
        .unwrap();

    // the pass reads the goals, then a deposit from elsewhere lands before it writes
    let mut goals = repo.list_goals("alice").await.unwrap();
    repo.add_manual_deposit("alice", g.id, 50.0).await.unwrap();
    let report = run_backfill(&repo, &mut goals, at(2024, 4, 1, 0, 0)).await;

    assert!(report.failed_goal_ids.is_empty());
    assert_eq!(report.total_added(), 300.0);
    let stored = repo.get_goal("alice", g.id).await.unwrap().unwrap();
    assert_eq!(stored.deposited_amount, 350.0);
    assert_eq!(stored.automation.last_processed, Some(date(2024, 3, 15)));
}

#[tokio::test]
async fn update_goal_keeps_checkpoint_and_deposits() {
    let (_dir, repo) = temp_repo().await;
    let g = repo
        .create_goal("alice", &new_goal("Bike", automation(20.0, 1, date(2024, 1, 1), None)))
        .await
        .unwrap();
    repo.record_auto_deposits("alice", g.id, 60.0, date(2024, 3, 1))
        .await
        .unwrap();

    let mut a = automation(40.0, 2, date(2024, 1, 1), None);
    a.last_processed = Some(date(2020, 1, 1));
    let updated = repo
        .update_goal(
            "alice",
            g.id,
            &GoalUpdate {
                name: "Road bike".into(),
                target_amount: 2500.0,
                automation: a,
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.name, "Road bike");
    assert_eq!(updated.target_amount, 2500.0);
    assert_eq!(updated.automation.auto_deposit_amount, Some(40.0));
    assert_eq!(updated.deposited_amount, 60.0);
    assert_eq!(updated.automation.last_processed, Some(date(2024, 3, 1)));

    let missing = repo
        .update_goal(
            "bob",
            g.id,
            &GoalUpdate {
                name: "x".into(),
                target_amount: 1.0,
                automation: GoalAutomation::default(),
            },
        )
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn manual_deposit_adds_to_balance() {
    let (_dir, repo) = temp_repo().await;
    let g = repo
        .create_goal("alice", &new_goal("Laptop", GoalAutomation::default()))
        .await
        .unwrap();
    repo.add_manual_deposit("alice", g.id, 120.5).await.unwrap();
    let g = repo
        .add_manual_deposit("alice", g.id, 79.5)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(g.deposited_amount, 200.0);
    assert_eq!(g.progress_percent(), 20.0);
}

#[tokio::test]
async fn entries_filter_by_month_newest_first() {
    let (_dir, repo) = temp_repo().await;
    repo.create_entry("alice", &entry(EntryKind::Income, 3000.0, "Salary", date(2024, 3, 1)))
        .await
        .unwrap();
    repo.create_entry("alice", &entry(EntryKind::Expense, 45.0, "Food", date(2024, 3, 20)))
        .await
        .unwrap();
    repo.create_entry("alice", &entry(EntryKind::Expense, 12.0, "Food", date(2024, 4, 2)))
        .await
        .unwrap();
    repo.create_entry("bob", &entry(EntryKind::Expense, 99.0, "Food", date(2024, 3, 5)))
        .await
        .unwrap();

    let march = repo
        .list_entries("alice", Month::parse("2024-03"))
        .await
        .unwrap();
    assert_eq!(march.len(), 2);
    assert_eq!(march[0].occurred_on, date(2024, 3, 20));
    assert_eq!(march[1].kind, EntryKind::Income);

    let all = repo.list_entries("alice", None).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].occurred_on, date(2024, 4, 2));
}

#[tokio::test]
async fn entry_delete_is_owner_scoped() {
    let (_dir, repo) = temp_repo().await;
    let e = repo
        .create_entry("alice", &entry(EntryKind::Expense, 10.0, "Misc", date(2024, 1, 1)))
        .await
        .unwrap();
    assert!(!repo.delete_entry("bob", e.id).await.unwrap());
    assert!(repo.delete_entry("alice", e.id).await.unwrap());
    assert!(repo.list_entries("alice", None).await.unwrap().is_empty());
}

#[tokio::test]
async fn fixed_expense_toggle_and_delete() {
    let (_dir, repo) = temp_repo().await;
    let rent = repo
        .create_fixed_expense(
            "alice",
            &NewFixedExpense {
                name: "Rent".into(),
                amount: 900.0,
                category: "Housing".into(),
                due_day: Some(1),
                active: true,
            },
        )
        .await
        .unwrap();

    let paused = repo
        .set_fixed_expense_active("alice", rent.id, false)
        .await
        .unwrap()
        .unwrap();
    assert!(!paused.active);
    assert!(
        repo.set_fixed_expense_active("bob", rent.id, true)
            .await
            .unwrap()
            .is_none()
    );

    let listed = repo.list_fixed_expenses("alice").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(!listed[0].active);

    assert!(repo.delete_fixed_expense("alice", rent.id).await.unwrap());
    assert!(repo.list_fixed_expenses("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn dashboard_aggregates_month() {
    let (_dir, repo) = temp_repo().await;
    repo.create_entry("alice", &entry(EntryKind::Income, 3000.0, "Salary", date(2024, 3, 1)))
        .await
        .unwrap();
    repo.create_entry("alice", &entry(EntryKind::Expense, 200.0, "Food", date(2024, 3, 10)))
        .await
        .unwrap();
    repo.create_entry("alice", &entry(EntryKind::Expense, 50.0, "Food", date(2024, 3, 11)))
        .await
        .unwrap();
    repo.create_entry("alice", &entry(EntryKind::Expense, 400.0, "Travel", date(2024, 3, 12)))
        .await
        .unwrap();
    // other month, other owner
    repo.create_entry("alice", &entry(EntryKind::Expense, 1.0, "Food", date(2024, 2, 29)))
        .await
        .unwrap();
    repo.create_entry("bob", &entry(EntryKind::Income, 10.0, "Salary", date(2024, 3, 1)))
        .await
        .unwrap();

    for (name, amount, active) in [("Rent", 900.0, true), ("Gym", 30.0, false)] {
        repo.create_fixed_expense(
            "alice",
            &NewFixedExpense {
                name: name.into(),
                amount,
                category: "Fixed".into(),
                due_day: None,
                active,
            },
        )
        .await
        .unwrap();
    }

    let g = repo
        .create_goal("alice", &new_goal("Trip", GoalAutomation::default()))
        .await
        .unwrap();
    repo.add_manual_deposit("alice", g.id, 250.0).await.unwrap();

    let month = Month::parse("2024-03").unwrap();
    let d = repo.dashboard("alice", month).await.unwrap();
    assert_eq!(d.month, "2024-03");
    assert_eq!(d.income_total, 3000.0);
    assert_eq!(d.expense_total, 650.0);
    assert_eq!(d.net, 2350.0);
    assert_eq!(d.fixed_expenses_total, 900.0);
    assert_eq!(d.projected_net, 1450.0);
    assert_eq!(
        d.expenses_by_category,
        vec![
            CategoryTotal {
                category: "Travel".into(),
                total: 400.0
            },
            CategoryTotal {
                category: "Food".into(),
                total: 250.0
            },
        ]
    );
    assert_eq!(d.goals.count, 1);
    assert_eq!(d.goals.total_target, 1000.0);
    assert_eq!(d.goals.total_deposited, 250.0);
    assert_eq!(d.goals.progress_percent, 25.0);
    assert_eq!(d.recent_entries.len(), 4);
    assert_eq!(d.recent_entries[0].occurred_on, date(2024, 3, 12));
}

#[tokio::test]
async fn dashboard_empty_month_is_zeroed() {
    let (_dir, repo) = temp_repo().await;
    let d = repo
        .dashboard("alice", Month::parse("2030-01").unwrap())
        .await
        .unwrap();
    assert_eq!(d.income_total, 0.0);
    assert_eq!(d.expense_total, 0.0);
    assert!(d.expenses_by_category.is_empty());
    assert_eq!(d.goals, GoalsSummary::default());
    assert!(d.recent_entries.is_empty());
}
