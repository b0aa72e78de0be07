use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// The administrative dashboard API. Every route is read-only.
///
/// Access Control:
/// `create_router` nests this router under `/admin` and layers
/// `auth::require_administrator` over it, so each request is authenticated and
/// checked for the administrator role before any handler runs.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin/stats
        // Totals and trailing-24h counts for users, categories, submissions,
        // comments, messages, submission votes and unresolved reports.
        .route("/stats", get(handlers::get_dashboard_stats))
        // GET /admin/submissions?page=N
        .route("/submissions", get(handlers::list_submissions))
        // GET /admin/comments?page=N
        // Flat listing; nested replies are stripped.
        .route("/comments", get(handlers::list_comments))
        // GET /admin/categories?page=N
        .route("/categories", get(handlers::list_categories))
        // GET /admin/categories/search?name=...
        .route("/categories/search", get(handlers::search_category_names))
        // GET /admin/users?page=N
        .route("/users", get(handlers::list_users))
        // GET /admin/users/search?username=...
        .route("/users/search", get(handlers::search_usernames))
        // GET /admin/reports/submissions?type=solved|unsolved&page=N
        .route("/reports/submissions", get(handlers::list_reported_submissions))
        // GET /admin/reports/comments?type=solved|unsolved&page=N
        .route("/reports/comments", get(handlers::list_reported_comments))
}
