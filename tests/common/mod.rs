// Shared test helpers
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use pocketgoals::finance_repo::FinanceRepo;
use pocketgoals::models::{Goal, GoalAutomation};
use tempfile::TempDir;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, hour: u32, minute: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(hour, minute, 0).unwrap()
}

pub fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

/// Monthly auto-deposit of `amount` on `day`, starting `start`.
pub fn automation(amount: f64, day: u32, start: NaiveDate, months: Option<u32>) -> GoalAutomation {
    GoalAutomation {
        auto_deposit_enabled: true,
        auto_deposit_amount: Some(amount),
        auto_deposit_day: Some(day),
        auto_deposit_time: None,
        auto_deposit_start: Some(start),
        auto_deposit_months: months,
        last_processed: None,
    }
}

pub fn goal(id: i64, owner: &str, automation: GoalAutomation) -> Goal {
    Goal {
        id,
        owner_id: owner.into(),
        name: format!("goal {id}"),
        target_amount: 1000.0,
        deposited_amount: 0.0,
        automation,
        created_at: at(2024, 1, 1, 9, 0),
    }
}

/// Fresh SQLite repo in a temp dir. Keep the TempDir alive for the test's duration.
pub async fn temp_repo() -> (TempDir, FinanceRepo) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("finance.db");
    let repo = FinanceRepo::connect(path.to_str().unwrap(), 2).await.unwrap();
    repo.init().await.unwrap();
    (dir, repo)
}
