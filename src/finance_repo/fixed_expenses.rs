// Recurring fixed expenses

use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use tracing::instrument;

use super::{FinanceRepo, day_from_db, now_local};
use crate::models::{FixedExpense, NewFixedExpense};

const FIXED_EXPENSE_COLUMNS: &str = "id, owner_id, name, amount, category, due_day, active, created_at";

impl FinanceRepo {
    #[instrument(skip(self), fields(repo = "finance", operation = "list_fixed_expenses"))]
    pub async fn list_fixed_expenses(&self, owner_id: &str) -> anyhow::Result<Vec<FixedExpense>> {
        let rows = sqlx::query(&format!(
            "SELECT {FIXED_EXPENSE_COLUMNS} FROM fixed_expenses WHERE owner_id = $1
             ORDER BY due_day IS NULL, due_day ASC, id ASC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(parse_fixed_expense_row(&row)?);
        }
        Ok(out)
    }

    #[instrument(skip(self, expense), fields(repo = "finance", operation = "create_fixed_expense"))]
    pub async fn create_fixed_expense(
        &self,
        owner_id: &str,
        expense: &NewFixedExpense,
    ) -> anyhow::Result<FixedExpense> {
        let created_at = now_local();
        let result = sqlx::query(
            "INSERT INTO fixed_expenses (owner_id, name, amount, category, due_day, active, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(owner_id)
        .bind(expense.name.trim())
        .bind(expense.amount)
        .bind(expense.category.trim())
        .bind(expense.due_day.map(i64::from))
        .bind(expense.active)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(FixedExpense {
            id: result.last_insert_rowid(),
            owner_id: owner_id.to_string(),
            name: expense.name.trim().to_string(),
            amount: expense.amount,
            category: expense.category.trim().to_string(),
            due_day: expense.due_day,
            active: expense.active,
            created_at,
        })
    }

    #[instrument(skip(self), fields(repo = "finance", operation = "set_fixed_expense_active"))]
    pub async fn set_fixed_expense_active(
        &self,
        owner_id: &str,
        expense_id: i64,
        active: bool,
    ) -> anyhow::Result<Option<FixedExpense>> {
        let row = sqlx::query(&format!(
            "UPDATE fixed_expenses SET active = $1 WHERE id = $2 AND owner_id = $3
             RETURNING {FIXED_EXPENSE_COLUMNS}"
        ))
        .bind(active)
        .bind(expense_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(parse_fixed_expense_row).transpose()
    }

    #[instrument(skip(self), fields(repo = "finance", operation = "delete_fixed_expense"))]
    pub async fn delete_fixed_expense(
        &self,
        owner_id: &str,
        expense_id: i64,
    ) -> anyhow::Result<bool> {
        let r = sqlx::query("DELETE FROM fixed_expenses WHERE id = $1 AND owner_id = $2")
            .bind(expense_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(r.rows_affected() > 0)
    }
}

fn parse_fixed_expense_row(row: &SqliteRow) -> anyhow::Result<FixedExpense> {
    Ok(FixedExpense {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        name: row.try_get("name")?,
        amount: row.try_get("amount")?,
        category: row.try_get("category")?,
        due_day: day_from_db(row.try_get("due_day")?),
        active: row.try_get("active")?,
        created_at: row.try_get("created_at")?,
    })
}
