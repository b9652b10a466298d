// Savings goal with optional recurring auto-deposit configuration

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: i64,
    pub owner_id: String,
    pub name: String,
    pub target_amount: f64,
    pub deposited_amount: f64,
    #[serde(flatten)]
    pub automation: GoalAutomation,
    pub created_at: NaiveDateTime,
}

/// Auto-deposit settings. Every field except the flag is optional; an enabled
/// automation missing amount, day or start date is ignored by the backfill pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalAutomation {
    #[serde(default)]
    pub auto_deposit_enabled: bool,
    #[serde(default)]
    pub auto_deposit_amount: Option<f64>,
    /// Day of month (1..=31) on which a deposit posts.
    #[serde(default)]
    pub auto_deposit_day: Option<u32>,
    /// Local time-of-day after which the deposit for the charge day counts.
    #[serde(default)]
    pub auto_deposit_time: Option<NaiveTime>,
    #[serde(default)]
    pub auto_deposit_start: Option<NaiveDate>,
    /// Number of months deposits run for. 0 or absent = no end.
    #[serde(default)]
    pub auto_deposit_months: Option<u32>,
    /// Date of the most recent simulated deposit.
    #[serde(default)]
    pub last_processed: Option<NaiveDate>,
}

/// Fully specified schedule, available only when automation is enabled and complete.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepositSchedule {
    pub amount: f64,
    pub day: u32,
    pub time: Option<NaiveTime>,
    pub start: NaiveDate,
    pub months: Option<u32>,
}

impl GoalAutomation {
    pub fn schedule(&self) -> Option<DepositSchedule> {
        if !self.auto_deposit_enabled {
            return None;
        }
        Some(DepositSchedule {
            amount: self.auto_deposit_amount?,
            day: self.auto_deposit_day?,
            time: self.auto_deposit_time,
            start: self.auto_deposit_start?,
            months: self.auto_deposit_months.filter(|m| *m > 0),
        })
    }

    fn validate(&self) -> Result<(), String> {
        if let Some(amount) = self.auto_deposit_amount
            && !(amount.is_finite() && amount > 0.0)
        {
            return Err(format!("autoDepositAmount must be > 0, got {amount}"));
        }
        if let Some(day) = self.auto_deposit_day
            && !(1..=31).contains(&day)
        {
            return Err(format!("autoDepositDay must be between 1 and 31, got {day}"));
        }
        Ok(())
    }
}

impl Goal {
    /// Deposited share of the target, capped at 100. A zero target counts as 1.
    pub fn progress_percent(&self) -> f64 {
        progress_percent(self.deposited_amount, self.target_amount)
    }
}

pub fn progress_percent(deposited: f64, target: f64) -> f64 {
    let target = if target > 0.0 { target } else { 1.0 };
    (deposited / target * 100.0).min(100.0)
}

/// Goal with its display progress (GET /api/goals).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalView {
    #[serde(flatten)]
    pub goal: Goal,
    pub progress_percent: f64,
}

impl From<Goal> for GoalView {
    fn from(goal: Goal) -> Self {
        let progress_percent = goal.progress_percent();
        Self {
            goal,
            progress_percent,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub name: String,
    pub target_amount: f64,
    #[serde(default)]
    pub deposited_amount: f64,
    #[serde(flatten)]
    pub automation: GoalAutomation,
}

impl NewGoal {
    pub fn validate(&self) -> Result<(), String> {
        validate_name_and_target(&self.name, self.target_amount)?;
        if !(self.deposited_amount.is_finite() && self.deposited_amount >= 0.0) {
            return Err(format!(
                "depositedAmount must be >= 0, got {}",
                self.deposited_amount
            ));
        }
        self.automation.validate()
    }
}

/// Editable goal fields. `lastProcessed` is ignored; only the backfill pass moves it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalUpdate {
    pub name: String,
    pub target_amount: f64,
    #[serde(flatten)]
    pub automation: GoalAutomation,
}

impl GoalUpdate {
    pub fn validate(&self) -> Result<(), String> {
        validate_name_and_target(&self.name, self.target_amount)?;
        self.automation.validate()
    }
}

fn validate_name_and_target(name: &str, target_amount: f64) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("name must be non-empty".into());
    }
    if !(target_amount.is_finite() && target_amount > 0.0) {
        return Err(format!("targetAmount must be > 0, got {target_amount}"));
    }
    Ok(())
}

/// Manual deposit request (POST /api/goals/{id}/deposits).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualDeposit {
    pub amount: f64,
}
