//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, circulation, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library Management System API",
        version = "1.0.0",
        description = "REST API for managing library books and issue records"
    ),
    paths(
        // Health
        health::root,
        health::health_check,
        health::readiness_check,
        // Books
        books::add_book,
        books::list_books,
        books::get_book,
        // Circulation
        circulation::issue_book,
        circulation::list_issued,
        circulation::list_all_records,
        circulation::return_book,
    ),
    components(
        schemas(
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::issue_record::IssueStatus,
            crate::models::issue_record::IssueRecord,
            crate::models::issue_record::IssueRecordWithBook,
            crate::models::issue_record::IssueBook,
            health::RootResponse,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book catalog"),
        (name = "circulation", description = "Issuing and returning books")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
