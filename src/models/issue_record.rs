//! Issue record (ledger entry) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{book::Book, validation::not_blank};
use crate::error::AppError;

/// Title/author placeholder when the referenced book cannot be read
pub const UNKNOWN_BOOK: &str = "Unknown";

/// Lifecycle state of an issue record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum IssueStatus {
    Issued,
    Returned,
}

impl IssueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Issued => "issued",
            IssueStatus::Returned => "returned",
        }
    }
}

impl std::fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IssueStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "issued" => Ok(IssueStatus::Issued),
            "returned" => Ok(IssueStatus::Returned),
            other => Err(AppError::Internal(format!("Unknown issue status '{}'", other))),
        }
    }
}

/// Issue record as exposed by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IssueRecord {
    pub id: i32,
    pub student_name: String,
    pub book_id: String,
    pub issue_date: NaiveDate,
    /// Set exactly when `status` is `returned`
    pub return_date: Option<NaiveDate>,
    pub status: IssueStatus,
}

impl IssueRecord {
    pub fn is_returned(&self) -> bool {
        self.status == IssueStatus::Returned
    }
}

/// Raw `issue_records` row
#[derive(Debug, FromRow)]
pub struct IssueRecordRow {
    pub id: i32,
    pub student_name: String,
    pub book_id: String,
    pub issue_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub status: String,
}

impl TryFrom<IssueRecordRow> for IssueRecord {
    type Error = AppError;

    fn try_from(row: IssueRecordRow) -> Result<Self, Self::Error> {
        let status: IssueStatus = row.status.parse()?;
        if (status == IssueStatus::Returned) != row.return_date.is_some() {
            return Err(AppError::Internal(format!(
                "Issue record {} has status '{}' but return_date {:?}",
                row.id, status, row.return_date
            )));
        }

        Ok(IssueRecord {
            id: row.id,
            student_name: row.student_name,
            book_id: row.book_id,
            issue_date: row.issue_date,
            return_date: row.return_date,
            status,
        })
    }
}

/// Issue record joined with the title and author of its book
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IssueRecordWithBook {
    #[serde(flatten)]
    pub record: IssueRecord,
    pub book_title: String,
    pub book_author: String,
}

impl IssueRecordWithBook {
    pub fn new(record: IssueRecord, book: Option<&Book>) -> Self {
        let (book_title, book_author) = match book {
            Some(b) => (b.title.clone(), b.author.clone()),
            None => (UNKNOWN_BOOK.to_string(), UNKNOWN_BOOK.to_string()),
        };

        Self {
            record,
            book_title,
            book_author,
        }
    }
}

/// Issue book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct IssueBook {
    #[validate(custom(function = "not_blank"))]
    pub student_name: String,
    #[validate(custom(function = "not_blank"))]
    pub book_id: String,
    /// Defaults to today
    pub issue_date: Option<NaiveDate>,
}

impl IssueBook {
    pub fn normalized(self) -> Self {
        Self {
            student_name: self.student_name.trim().to_string(),
            book_id: self.book_id.trim().to_string(),
            issue_date: self.issue_date,
        }
    }
}
