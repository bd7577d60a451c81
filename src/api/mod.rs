//! API handlers for the library REST endpoints

pub mod books;
pub mod circulation;
pub mod health;
pub mod openapi;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Books
        .route("/books/", get(books::list_books).post(books::add_book))
        .route("/books/:book_id", get(books::get_book))
        // Issue / return
        .route("/issue/", post(circulation::issue_book))
        .route("/issued-books/", get(circulation::list_issued))
        .route("/all-issue-records/", get(circulation::list_all_records))
        .route("/return/:issue_record_id", put(circulation::return_book));

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/api", api)
        .with_state(state)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
