//! Issue records table operations

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{IssueLedger, PgUnitOfWork};
use crate::{
    error::{AppError, AppResult},
    models::{issue_record::IssueRecordRow, IssueRecord, IssueStatus},
};

const RECORD_COLUMNS: &str = "id, student_name, book_id, issue_date, return_date, status";

fn into_records(rows: Vec<IssueRecordRow>) -> AppResult<Vec<IssueRecord>> {
    rows.into_iter().map(IssueRecord::try_from).collect()
}

#[async_trait]
impl IssueLedger for PgUnitOfWork {
    async fn create_record(
        &mut self,
        student_name: &str,
        book_id: &str,
        issue_date: NaiveDate,
    ) -> AppResult<IssueRecord> {
        let query = format!(
            r#"
            INSERT INTO issue_records (student_name, book_id, issue_date, status)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            RECORD_COLUMNS
        );

        let row = sqlx::query_as::<_, IssueRecordRow>(&query)
            .bind(student_name)
            .bind(book_id)
            .bind(issue_date)
            .bind(IssueStatus::Issued.as_str())
            .fetch_one(self.conn())
            .await?;

        row.try_into()
    }

    async fn find_record(&mut self, id: i32) -> AppResult<Option<IssueRecord>> {
        let query = format!("SELECT {} FROM issue_records WHERE id = $1", RECORD_COLUMNS);
        sqlx::query_as::<_, IssueRecordRow>(&query)
            .bind(id)
            .fetch_optional(self.conn())
            .await?
            .map(IssueRecord::try_from)
            .transpose()
    }

    async fn lock_record(&mut self, id: i32) -> AppResult<Option<IssueRecord>> {
        let query = format!(
            "SELECT {} FROM issue_records WHERE id = $1 FOR UPDATE",
            RECORD_COLUMNS
        );
        sqlx::query_as::<_, IssueRecordRow>(&query)
            .bind(id)
            .fetch_optional(self.conn())
            .await?
            .map(IssueRecord::try_from)
            .transpose()
    }

    async fn list_by_status(&mut self, status: IssueStatus) -> AppResult<Vec<IssueRecord>> {
        let query = format!(
            "SELECT {} FROM issue_records WHERE status = $1 ORDER BY id",
            RECORD_COLUMNS
        );
        let rows = sqlx::query_as::<_, IssueRecordRow>(&query)
            .bind(status.as_str())
            .fetch_all(self.conn())
            .await?;
        into_records(rows)
    }

    async fn list_all(&mut self) -> AppResult<Vec<IssueRecord>> {
        let query = format!("SELECT {} FROM issue_records ORDER BY id", RECORD_COLUMNS);
        let rows = sqlx::query_as::<_, IssueRecordRow>(&query)
            .fetch_all(self.conn())
            .await?;
        into_records(rows)
    }

    async fn mark_returned(&mut self, id: i32, return_date: NaiveDate) -> AppResult<IssueRecord> {
        // The status guard makes a second return a no-op at the row level
        let query = format!(
            r#"
            UPDATE issue_records
            SET status = $1, return_date = $2
            WHERE id = $3 AND status = $4
            RETURNING {}
            "#,
            RECORD_COLUMNS
        );

        let row = sqlx::query_as::<_, IssueRecordRow>(&query)
            .bind(IssueStatus::Returned.as_str())
            .bind(return_date)
            .bind(id)
            .bind(IssueStatus::Issued.as_str())
            .fetch_optional(self.conn())
            .await?;

        match row {
            Some(row) => row.try_into(),
            None => match self.find_record(id).await? {
                Some(_) => Err(AppError::Conflict("This book has already been returned".to_string())),
                None => Err(AppError::NotFound(format!("Issue record with ID {} not found", id))),
            },
        }
    }
}
