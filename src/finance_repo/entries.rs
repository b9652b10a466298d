// Income / expense entries

use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use tracing::instrument;

use super::{FinanceRepo, now_local};
use crate::models::{Entry, Month, NewEntry};

const ENTRY_COLUMNS: &str =
    "id, owner_id, kind, amount, category, description, occurred_on, created_at";

impl FinanceRepo {
    /// Entries newest first, optionally limited to one month.
    #[instrument(skip(self), fields(repo = "finance", operation = "list_entries"))]
    pub async fn list_entries(
        &self,
        owner_id: &str,
        month: Option<Month>,
    ) -> anyhow::Result<Vec<Entry>> {
        let rows = sqlx::query(&format!(
            "SELECT {ENTRY_COLUMNS} FROM entries
             WHERE owner_id = $1
               AND ($2 IS NULL OR occurred_on >= $2)
               AND ($3 IS NULL OR occurred_on < $3)
             ORDER BY occurred_on DESC, id DESC"
        ))
        .bind(owner_id)
        .bind(month.map(|m| m.first_day()))
        .bind(month.map(|m| m.end()))
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(parse_entry_row(&row)?);
        }
        Ok(out)
    }

    pub(super) async fn recent_entries(
        &self,
        owner_id: &str,
        month: Month,
        limit: u32,
    ) -> anyhow::Result<Vec<Entry>> {
        let rows = sqlx::query(&format!(
            "SELECT {ENTRY_COLUMNS} FROM entries
             WHERE owner_id = $1 AND occurred_on >= $2 AND occurred_on < $3
             ORDER BY occurred_on DESC, id DESC LIMIT $4"
        ))
        .bind(owner_id)
        .bind(month.first_day())
        .bind(month.end())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(parse_entry_row(&row)?);
        }
        Ok(out)
    }

    #[instrument(skip(self, entry), fields(repo = "finance", operation = "create_entry", kind = entry.kind.as_str()))]
    pub async fn create_entry(&self, owner_id: &str, entry: &NewEntry) -> anyhow::Result<Entry> {
        let created_at = now_local();
        let description = entry
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty());
        let result = sqlx::query(
            "INSERT INTO entries (owner_id, kind, amount, category, description, occurred_on, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(owner_id)
        .bind(entry.kind.as_str())
        .bind(entry.amount)
        .bind(entry.category.trim())
        .bind(description)
        .bind(entry.occurred_on)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(Entry {
            id: result.last_insert_rowid(),
            owner_id: owner_id.to_string(),
            kind: entry.kind,
            amount: entry.amount,
            category: entry.category.trim().to_string(),
            description: description.map(str::to_string),
            occurred_on: entry.occurred_on,
            created_at,
        })
    }

    #[instrument(skip(self), fields(repo = "finance", operation = "delete_entry"))]
    pub async fn delete_entry(&self, owner_id: &str, entry_id: i64) -> anyhow::Result<bool> {
        let r = sqlx::query("DELETE FROM entries WHERE id = $1 AND owner_id = $2")
            .bind(entry_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(r.rows_affected() > 0)
    }
}

fn parse_entry_row(row: &SqliteRow) -> anyhow::Result<Entry> {
    let kind: String = row.try_get("kind")?;
    Ok(Entry {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        kind: kind.parse().map_err(|e: String| anyhow::anyhow!(e))?,
        amount: row.try_get("amount")?,
        category: row.try_get("category")?,
        description: row.try_get("description")?,
        occurred_on: row.try_get("occurred_on")?,
        created_at: row.try_get("created_at")?,
    })
}
