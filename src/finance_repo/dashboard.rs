// Monthly dashboard: entry totals, fixed expenses, goal progress

use sqlx::Row;
use tracing::instrument;

use super::FinanceRepo;
use crate::models::{
    CategoryTotal, Dashboard, GoalsSummary, Month, RECENT_ENTRIES_LIMIT, progress_percent,
};

impl FinanceRepo {
    #[instrument(skip(self, month), fields(repo = "finance", operation = "dashboard", month = %month))]
    pub async fn dashboard(&self, owner_id: &str, month: Month) -> anyhow::Result<Dashboard> {
        let totals = sqlx::query(
            "SELECT
                COALESCE(SUM(CASE WHEN kind = 'income' THEN amount END), 0.0) AS income,
                COALESCE(SUM(CASE WHEN kind = 'expense' THEN amount END), 0.0) AS expense
             FROM entries
             WHERE owner_id = $1 AND occurred_on >= $2 AND occurred_on < $3",
        )
        .bind(owner_id)
        .bind(month.first_day())
        .bind(month.end())
        .fetch_one(&self.pool)
        .await?;
        let income_total: f64 = totals.try_get("income")?;
        let expense_total: f64 = totals.try_get("expense")?;

        let category_rows = sqlx::query(
            "SELECT category, SUM(amount) AS total FROM entries
             WHERE owner_id = $1 AND kind = 'expense' AND occurred_on >= $2 AND occurred_on < $3
             GROUP BY category
             ORDER BY total DESC, category ASC",
        )
        .bind(owner_id)
        .bind(month.first_day())
        .bind(month.end())
        .fetch_all(&self.pool)
        .await?;
        let mut expenses_by_category = Vec::with_capacity(category_rows.len());
        for row in category_rows {
            expenses_by_category.push(CategoryTotal {
                category: row.try_get("category")?,
                total: row.try_get("total")?,
            });
        }

        let fixed_expenses_total = sqlx::query_scalar::<_, f64>(
            "SELECT COALESCE(SUM(amount), 0.0) FROM fixed_expenses WHERE owner_id = $1 AND active = 1",
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        let goal_row = sqlx::query(
            "SELECT COUNT(*) AS count,
                    COALESCE(SUM(target_amount), 0.0) AS total_target,
                    COALESCE(SUM(deposited_amount), 0.0) AS total_deposited
             FROM goals WHERE owner_id = $1",
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;
        let count: i64 = goal_row.try_get("count")?;
        let total_target: f64 = goal_row.try_get("total_target")?;
        let total_deposited: f64 = goal_row.try_get("total_deposited")?;

        let recent_entries = self
            .recent_entries(owner_id, month, RECENT_ENTRIES_LIMIT)
            .await?;

        let net = income_total - expense_total;
        Ok(Dashboard {
            month: month.to_string(),
            income_total,
            expense_total,
            net,
            fixed_expenses_total,
            projected_net: net - fixed_expenses_total,
            expenses_by_category,
            goals: GoalsSummary {
                count: u32::try_from(count).unwrap_or(u32::MAX),
                total_target,
                total_deposited,
                progress_percent: progress_percent(total_deposited, total_target),
            },
            recent_entries,
        })
    }
}
