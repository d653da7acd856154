use async_trait::async_trait;
use sqlx::MySqlPool;
use tracing::debug;

use super::WindowStore;
use crate::error::WindowError;
use crate::model::check_in_window::{CheckInWindow, CheckInWindowRow, WindowDraft};

const SELECT_COLUMNS: &str = r#"
    SELECT id, company_id, name, description, start_time, end_time,
           days_of_week, is_active, created_at, updated_at
    FROM check_in_windows
"#;

pub struct MySqlWindowStore {
    pool: MySqlPool,
}

impl MySqlWindowStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WindowStore for MySqlWindowStore {
    async fn insert(
        &self,
        company_id: u64,
        draft: &WindowDraft,
    ) -> Result<CheckInWindow, WindowError> {
        let result = sqlx::query(
            r#"
            INSERT INTO check_in_windows
                (company_id, name, description, start_time, end_time, days_of_week, is_active)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(company_id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.start_time.to_string())
        .bind(draft.end_time.to_string())
        .bind(draft.days_of_week.to_db_string())
        .bind(draft.is_active)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id();
        debug!(company_id, id, "Inserted check-in window");

        self.find(company_id, id)
            .await?
            .ok_or(WindowError::NotFound(id))
    }

    async fn list(
        &self,
        company_id: u64,
        active_only: bool,
    ) -> Result<Vec<CheckInWindow>, WindowError> {
        let active_clause = if active_only { " AND is_active = TRUE" } else { "" };
        let sql = format!(
            "{SELECT_COLUMNS} WHERE company_id = ?{active_clause} ORDER BY start_time ASC, id ASC"
        );

        let rows = sqlx::query_as::<_, CheckInWindowRow>(&sql)
            .bind(company_id)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(CheckInWindow::try_from).collect()
    }

    async fn find(&self, company_id: u64, id: u64) -> Result<Option<CheckInWindow>, WindowError> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ? AND company_id = ?");

        let row = sqlx::query_as::<_, CheckInWindowRow>(&sql)
            .bind(id)
            .bind(company_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(CheckInWindow::try_from).transpose()
    }

    async fn replace(
        &self,
        company_id: u64,
        id: u64,
        draft: &WindowDraft,
    ) -> Result<Option<CheckInWindow>, WindowError> {
        // rows_affected is 0 for an unchanged row on MySQL, so existence is
        // decided by the follow-up read.
        sqlx::query(
            r#"
            UPDATE check_in_windows
            SET name = ?, description = ?, start_time = ?, end_time = ?,
                days_of_week = ?, is_active = ?
            WHERE id = ? AND company_id = ?
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.start_time.to_string())
        .bind(draft.end_time.to_string())
        .bind(draft.days_of_week.to_db_string())
        .bind(draft.is_active)
        .bind(id)
        .bind(company_id)
        .execute(&self.pool)
        .await?;

        self.find(company_id, id).await
    }

    async fn delete(&self, company_id: u64, id: u64) -> Result<bool, WindowError> {
        let result = sqlx::query(r#"DELETE FROM check_in_windows WHERE id = ? AND company_id = ?"#)
            .bind(id)
            .bind(company_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
