// Monthly dashboard aggregate

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::Entry;

/// Number of recent entries shown on the dashboard.
pub const RECENT_ENTRIES_LIMIT: u32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// `YYYY-MM`
    pub month: String,
    pub income_total: f64,
    pub expense_total: f64,
    pub net: f64,
    pub fixed_expenses_total: f64,
    /// Net after subtracting active fixed expenses.
    pub projected_net: f64,
    pub expenses_by_category: Vec<CategoryTotal>,
    pub goals: GoalsSummary,
    pub recent_entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalsSummary {
    pub count: u32,
    pub total_target: f64,
    pub total_deposited: f64,
    pub progress_percent: f64,
}

/// A calendar month, addressed as `YYYY-MM` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Month {
    first_day: NaiveDate,
}

impl Month {
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first_day: date.with_day(1).unwrap_or(date),
        }
    }

    /// Parses strict `YYYY-MM`: four-digit year, two-digit month, no sign.
    pub fn parse(s: &str) -> Option<Self> {
        let (year, month) = s.split_once('-')?;
        let digits = |part: &str, len: usize| {
            part.len() == len && part.bytes().all(|b| b.is_ascii_digit())
        };
        if !digits(year, 4) || !digits(month, 2) {
            return None;
        }
        let year: i32 = year.parse().ok()?;
        let month: u32 = month.parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, 1).map(|first_day| Self { first_day })
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// First day of the following month (exclusive upper bound).
    pub fn end(&self) -> NaiveDate {
        self.first_day
            .checked_add_months(Months::new(1))
            .unwrap_or(NaiveDate::MAX)
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.first_day.format("%Y-%m"))
    }
}
