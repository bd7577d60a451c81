//! Issue and return endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{validation::positive_id, IssueBook, IssueRecord, IssueRecordWithBook},
    services::today,
};

/// Optional parameters of a return
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReturnQuery {
    /// Return date (ISO 8601), defaults to today
    pub return_date: Option<NaiveDate>,
}

/// Issue a book to a student
#[utoipa::path(
    post,
    path = "/api/issue/",
    tag = "circulation",
    request_body = IssueBook,
    responses(
        (status = 201, description = "Book issued", body = IssueRecord),
        (status = 400, description = "Invalid input or book out of stock", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn issue_book(
    State(state): State<crate::AppState>,
    Json(request): Json<IssueBook>,
) -> AppResult<(StatusCode, Json<IssueRecord>)> {
    request.validate()?;
    let request = request.normalized();

    let record = state
        .services
        .circulation
        .issue_book(
            &request.student_name,
            &request.book_id,
            request.issue_date.unwrap_or_else(today),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Get all issued books (not yet returned)
#[utoipa::path(
    get,
    path = "/api/issued-books/",
    tag = "circulation",
    responses(
        (status = 200, description = "Open issue records", body = Vec<IssueRecordWithBook>)
    )
)]
pub async fn list_issued(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<IssueRecordWithBook>>> {
    let records = state.services.circulation.list_issued().await?;
    Ok(Json(records))
}

/// Get all issue records (both issued and returned)
#[utoipa::path(
    get,
    path = "/api/all-issue-records/",
    tag = "circulation",
    responses(
        (status = 200, description = "All issue records", body = Vec<IssueRecordWithBook>)
    )
)]
pub async fn list_all_records(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<IssueRecordWithBook>>> {
    let records = state.services.circulation.list_all_records().await?;
    Ok(Json(records))
}

/// Return a book and update its quantity
#[utoipa::path(
    put,
    path = "/api/return/{issue_record_id}",
    tag = "circulation",
    params(
        ("issue_record_id" = i32, Path, description = "Issue record ID"),
        ReturnQuery
    ),
    responses(
        (status = 200, description = "Book returned", body = IssueRecord),
        (status = 400, description = "Already returned or invalid id", body = crate::error::ErrorResponse),
        (status = 404, description = "Issue record not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    Path(issue_record_id): Path<i32>,
    Query(query): Query<ReturnQuery>,
) -> AppResult<Json<IssueRecord>> {
    let id = positive_id(issue_record_id, "issue_record_id")?;

    let record = state
        .services
        .circulation
        .return_book(id, query.return_date.unwrap_or_else(today))
        .await?;

    Ok(Json(record))
}
