// Recurring fixed expenses (rent, subscriptions, ...)

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedExpense {
    pub id: i64,
    pub owner_id: String,
    pub name: String,
    /// Monthly amount.
    pub amount: f64,
    pub category: String,
    pub due_day: Option<u32>,
    pub active: bool,
    pub created_at: NaiveDateTime,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFixedExpense {
    pub name: String,
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub due_day: Option<u32>,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl NewFixedExpense {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must be non-empty".into());
        }
        if !(self.amount.is_finite() && self.amount > 0.0) {
            return Err(format!("amount must be > 0, got {}", self.amount));
        }
        if let Some(day) = self.due_day
            && !(1..=31).contains(&day)
        {
            return Err(format!("dueDay must be between 1 and 31, got {day}"));
        }
        Ok(())
    }
}

/// PATCH /api/fixed-expenses/{id}
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedExpenseToggle {
    pub active: bool,
}
