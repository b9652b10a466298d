// Goal auto-deposit backfill: apply every scheduled deposit that fell due since the
// goal's checkpoint. Runs when goals are read or refreshed; there is no scheduler.

use std::future::Future;

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::clock::Clock;
use crate::models::{DepositSchedule, Goal};

/// Persistence used by the backfill pass. Every call is scoped by owner.
pub trait GoalStore: Send + Sync {
    fn list_goals(
        &self,
        owner_id: &str,
    ) -> impl Future<Output = anyhow::Result<Vec<Goal>>> + Send;

    /// Adds `added` to the stored balance of goal `goal_id` owned by `owner_id` and
    /// advances its checkpoint to `last_processed`.
    fn record_auto_deposits(
        &self,
        owner_id: &str,
        goal_id: i64,
        added: f64,
        last_processed: NaiveDate,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}

/// Deposits applied to one goal during a pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedDeposit {
    pub goal_id: i64,
    pub occurrences: Vec<NaiveDate>,
    pub added: f64,
    pub deposited_amount: f64,
    pub last_processed: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackfillReport {
    pub applied: Vec<AppliedDeposit>,
    /// Goals whose in-memory state advanced but whose write failed.
    pub failed_goal_ids: Vec<i64>,
}

impl BackfillReport {
    pub fn total_added(&self) -> f64 {
        self.applied.iter().map(|a| a.added).sum()
    }

    /// Single user-facing message when at least one goal received deposits.
    pub fn notification(&self) -> Option<String> {
        match self.applied.len() {
            0 => None,
            1 => Some("Automatic deposit applied to 1 goal".to_string()),
            n => Some(format!("Automatic deposits applied to {n} goals")),
        }
    }
}

/// Charge dates due after `last_processed` (or from the start date when never processed)
/// up to and including `now`'s date.
///
/// A charge day missing from a month (31 in April) is skipped for that month. With a
/// duration, dates on or after `start + months` are never due. Today's charge date is
/// due only once the time threshold, if any, has been reached.
pub fn due_occurrences(
    schedule: &DepositSchedule,
    last_processed: Option<NaiveDate>,
    now: NaiveDateTime,
) -> Vec<NaiveDate> {
    let today = now.date();
    let first = match last_processed {
        Some(checkpoint) => match checkpoint.succ_opt() {
            Some(next) => next.max(schedule.start),
            None => return Vec::new(),
        },
        None => schedule.start,
    };
    let end = schedule
        .months
        .and_then(|m| schedule.start.checked_add_months(Months::new(m)));

    let mut out = Vec::new();
    let Some(mut month_start) = first.with_day(1) else {
        return out;
    };
    while month_start <= today && end.is_none_or(|end| month_start < end) {
        if let Some(charge) =
            NaiveDate::from_ymd_opt(month_start.year(), month_start.month(), schedule.day)
            && charge >= first
        {
            if charge > today || end.is_some_and(|end| charge >= end) {
                break;
            }
            if charge == today
                && let Some(threshold) = schedule.time
                && now.time() < threshold
            {
                break;
            }
            out.push(charge);
        }
        match month_start.checked_add_months(Months::new(1)) {
            Some(next) => month_start = next,
            None => break,
        }
    }
    out
}

/// Applies due deposits to `goal` in memory. Returns None when nothing was due or the
/// automation is disabled or incomplete.
pub fn apply_due_deposits(goal: &mut Goal, now: NaiveDateTime) -> Option<AppliedDeposit> {
    let schedule = goal.automation.schedule()?;
    let occurrences = due_occurrences(&schedule, goal.automation.last_processed, now);
    let last_processed = *occurrences.last()?;
    let added = schedule.amount * occurrences.len() as f64;
    if added <= 0.0 {
        return None;
    }
    goal.deposited_amount += added;
    goal.automation.last_processed = Some(last_processed);
    Some(AppliedDeposit {
        goal_id: goal.id,
        occurrences,
        added,
        deposited_amount: goal.deposited_amount,
        last_processed,
    })
}

/// Runs the pass over `goals`, persisting each update. A failed write is logged and the
/// goal keeps its in-memory update; the store is reconciled on the next read.
pub async fn run_backfill<S: GoalStore>(
    store: &S,
    goals: &mut [Goal],
    now: NaiveDateTime,
) -> BackfillReport {
    let mut report = BackfillReport::default();
    for goal in goals.iter_mut() {
        let Some(applied) = apply_due_deposits(goal, now) else {
            continue;
        };
        if let Err(e) = store
            .record_auto_deposits(
                &goal.owner_id,
                goal.id,
                applied.added,
                applied.last_processed,
            )
            .await
        {
            warn!(goal_id = goal.id, error = %e, "auto-deposit write failed");
            report.failed_goal_ids.push(goal.id);
        } else {
            info!(
                goal_id = goal.id,
                occurrences = applied.occurrences.len(),
                added = applied.added,
                last_processed = %applied.last_processed,
                "auto-deposits applied"
            );
        }
        report.applied.push(applied);
    }
    report
}

/// Reads the owner's goals and runs the pass at the clock's current time.
/// A read failure is returned and nothing is processed.
pub async fn load_and_backfill<S: GoalStore>(
    store: &S,
    owner_id: &str,
    clock: &dyn Clock,
) -> anyhow::Result<(Vec<Goal>, BackfillReport)> {
    let mut goals = store.list_goals(owner_id).await?;
    let report = run_backfill(store, &mut goals, clock.now()).await;
    Ok((goals, report))
}
