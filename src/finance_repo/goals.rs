// Goal CRUD and the backfill persistence seam

use chrono::{NaiveDate, NaiveTime};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use tracing::instrument;

use super::{FinanceRepo, day_from_db, now_local};
use crate::backfill::GoalStore;
use crate::models::{Goal, GoalAutomation, GoalUpdate, NewGoal};

const GOAL_COLUMNS: &str = "id, owner_id, name, target_amount, deposited_amount,
    auto_deposit_enabled, auto_deposit_amount, auto_deposit_day, auto_deposit_time,
    auto_deposit_start, auto_deposit_months, last_processed, created_at";

impl FinanceRepo {
    #[instrument(skip(self), fields(repo = "finance", operation = "get_goal"))]
    pub async fn get_goal(&self, owner_id: &str, goal_id: i64) -> anyhow::Result<Option<Goal>> {
        let row = sqlx::query(&format!(
            "SELECT {GOAL_COLUMNS} FROM goals WHERE id = $1 AND owner_id = $2"
        ))
        .bind(goal_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(parse_goal_row).transpose()
    }

    #[instrument(skip(self, goal), fields(repo = "finance", operation = "create_goal"))]
    pub async fn create_goal(&self, owner_id: &str, goal: &NewGoal) -> anyhow::Result<Goal> {
        let a = &goal.automation;
        let result = sqlx::query(
            r#"
            INSERT INTO goals
            (owner_id, name, target_amount, deposited_amount,
             auto_deposit_enabled, auto_deposit_amount, auto_deposit_day, auto_deposit_time,
             auto_deposit_start, auto_deposit_months, last_processed, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NULL, $11)
            "#,
        )
        .bind(owner_id)
        .bind(goal.name.trim())
        .bind(goal.target_amount)
        .bind(goal.deposited_amount)
        .bind(a.auto_deposit_enabled)
        .bind(a.auto_deposit_amount)
        .bind(a.auto_deposit_day.map(i64::from))
        .bind(a.auto_deposit_time)
        .bind(a.auto_deposit_start)
        .bind(a.auto_deposit_months.map(i64::from))
        .bind(now_local())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get_goal(owner_id, id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("goal {} missing after insert", id))
    }

    /// Updates editable fields. The checkpoint is only ever moved by the backfill pass.
    #[instrument(skip(self, update), fields(repo = "finance", operation = "update_goal"))]
    pub async fn update_goal(
        &self,
        owner_id: &str,
        goal_id: i64,
        update: &GoalUpdate,
    ) -> anyhow::Result<Option<Goal>> {
        let a = &update.automation;
        let r = sqlx::query(
            r#"
            UPDATE goals SET
                name = $1, target_amount = $2,
                auto_deposit_enabled = $3, auto_deposit_amount = $4, auto_deposit_day = $5,
                auto_deposit_time = $6, auto_deposit_start = $7, auto_deposit_months = $8
            WHERE id = $9 AND owner_id = $10
            "#,
        )
        .bind(update.name.trim())
        .bind(update.target_amount)
        .bind(a.auto_deposit_enabled)
        .bind(a.auto_deposit_amount)
        .bind(a.auto_deposit_day.map(i64::from))
        .bind(a.auto_deposit_time)
        .bind(a.auto_deposit_start)
        .bind(a.auto_deposit_months.map(i64::from))
        .bind(goal_id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;
        if r.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_goal(owner_id, goal_id).await
    }

    #[instrument(skip(self), fields(repo = "finance", operation = "delete_goal"))]
    pub async fn delete_goal(&self, owner_id: &str, goal_id: i64) -> anyhow::Result<bool> {
        let r = sqlx::query("DELETE FROM goals WHERE id = $1 AND owner_id = $2")
            .bind(goal_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(r.rows_affected() > 0)
    }

    /// Adds a user-entered deposit on top of whatever the goal holds.
    #[instrument(skip(self), fields(repo = "finance", operation = "add_manual_deposit"))]
    pub async fn add_manual_deposit(
        &self,
        owner_id: &str,
        goal_id: i64,
        amount: f64,
    ) -> anyhow::Result<Option<Goal>> {
        let r = sqlx::query(
            "UPDATE goals SET deposited_amount = deposited_amount + $1 WHERE id = $2 AND owner_id = $3",
        )
        .bind(amount)
        .bind(goal_id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;
        if r.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_goal(owner_id, goal_id).await
    }
}

impl GoalStore for FinanceRepo {
    #[instrument(skip(self), fields(repo = "finance", operation = "list_goals"))]
    async fn list_goals(&self, owner_id: &str) -> anyhow::Result<Vec<Goal>> {
        let rows = sqlx::query(&format!(
            "SELECT {GOAL_COLUMNS} FROM goals WHERE owner_id = $1 ORDER BY id ASC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(parse_goal_row(&row)?);
        }
        Ok(out)
    }

    /// Increments the stored balance rather than overwriting it, so a manual deposit
    /// committed mid-pass is kept. Refuses to move the checkpoint backward or re-apply
    /// the same date, so a stale second pass (another tab) cannot double count.
    #[instrument(skip(self), fields(repo = "finance", operation = "record_auto_deposits"))]
    async fn record_auto_deposits(
        &self,
        owner_id: &str,
        goal_id: i64,
        added: f64,
        last_processed: NaiveDate,
    ) -> anyhow::Result<()> {
        let r = sqlx::query(
            r#"
            UPDATE goals SET deposited_amount = deposited_amount + $1, last_processed = $2
            WHERE id = $3 AND owner_id = $4
              AND (last_processed IS NULL OR last_processed < $2)
            "#,
        )
        .bind(added)
        .bind(last_processed)
        .bind(goal_id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;
        anyhow::ensure!(
            r.rows_affected() == 1,
            "goal {} not found or already processed through {}",
            goal_id,
            last_processed
        );
        Ok(())
    }
}

fn parse_goal_row(row: &SqliteRow) -> anyhow::Result<Goal> {
    Ok(Goal {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        name: row.try_get("name")?,
        target_amount: row.try_get("target_amount")?,
        deposited_amount: row.try_get("deposited_amount")?,
        automation: GoalAutomation {
            auto_deposit_enabled: row.try_get("auto_deposit_enabled")?,
            auto_deposit_amount: row.try_get("auto_deposit_amount")?,
            auto_deposit_day: day_from_db(row.try_get("auto_deposit_day")?),
            auto_deposit_time: row.try_get::<Option<NaiveTime>, _>("auto_deposit_time")?,
            auto_deposit_start: row.try_get::<Option<NaiveDate>, _>("auto_deposit_start")?,
            auto_deposit_months: row
                .try_get::<Option<i64>, _>("auto_deposit_months")?
                .and_then(|m| u32::try_from(m).ok()),
            last_processed: row.try_get::<Option<NaiveDate>, _>("last_processed")?,
        },
        created_at: row.try_get("created_at")?,
    })
}
