use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{
        Category, Comment, DashboardStats, ReportEntry, ReportStatus, ReportableType, Submission,
        User,
    },
    pagination::{
        CATEGORIES_PER_PAGE, COMMENTS_PER_PAGE, Page, PageRequest, REPORTS_PER_PAGE,
        SUBMISSIONS_PER_PAGE, USERS_PER_PAGE,
    },
};
use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{TimeDelta, Utc};
use serde::Deserialize;

/// Maximum number of names returned by the search endpoints.
pub const SEARCH_LIMIT: i64 = 100;

// --- Query Structs ---

/// PageQuery
///
/// `?page=N`. Kept as a raw string so a malformed value falls back to page 1
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    fn resolve(&self, per_page: i64) -> PageRequest {
        PageRequest::from_param(self.page.as_deref(), per_page)
    }
}

/// Optional `?username=`; absent means "match everything".
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UsernameSearch {
    pub username: Option<String>,
}

/// Required `?name=`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategorySearch {
    pub name: Option<String>,
}

/// ReportQuery
///
/// `?type=solved|unsolved&page=N`. `type` is required; any value other than
/// "solved" lists the unresolved queue.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    #[serde(rename = "type")]
    pub report_type: Option<String>,
    pub page: Option<String>,
}

/// Rejects a parameter that is absent or blank.
fn required<'a>(value: Option<&'a str>, field: &'static str) -> AppResult<&'a str> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(AppError::Validation { field })
}

// --- Handlers ---
//
// Every handler below is mounted behind `auth::require_administrator`, so
// none of them re-checks the actor.

/// get_dashboard_stats
///
/// [Admin Route] Totals and trailing-24-hour counts for every content table.
#[utoipa::path(
    get,
    path = "/admin/stats",
    responses(
        (status = 200, description = "Dashboard counters", body = DashboardStats),
        (status = 403, description = "Not an administrator")
    )
)]
pub async fn get_dashboard_stats(State(state): State<AppState>) -> AppResult<Json<DashboardStats>> {
    let since = Utc::now() - TimeDelta::hours(24);
    Ok(Json(state.repo.get_stats(since).await?))
}

/// list_submissions
///
/// [Admin Route] Latest submissions, 10 per page.
#[utoipa::path(
    get,
    path = "/admin/submissions",
    params(PageQuery),
    responses((status = 200, description = "Latest submissions", body = Page<Submission>))
)]
pub async fn list_submissions(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<Submission>>> {
    let page = query.resolve(SUBMISSIONS_PER_PAGE);
    Ok(Json(state.repo.list_submissions(page).await?))
}

/// list_comments
///
/// [Admin Route] Latest comments, 30 per page, always without nested replies.
#[utoipa::path(
    get,
    path = "/admin/comments",
    params(PageQuery),
    responses((status = 200, description = "Latest comments", body = Page<Comment>))
)]
pub async fn list_comments(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<Comment>>> {
    let page = query.resolve(COMMENTS_PER_PAGE);
    let comments = state.repo.list_comments(page).await?;
    Ok(Json(comments.map(Comment::without_children)))
}

/// list_categories
///
/// [Admin Route] Most recently created categories, 30 per page.
#[utoipa::path(
    get,
    path = "/admin/categories",
    params(PageQuery),
    responses((status = 200, description = "Latest categories", body = Page<Category>))
)]
pub async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<Category>>> {
    let page = query.resolve(CATEGORIES_PER_PAGE);
    Ok(Json(state.repo.list_categories(page).await?))
}

/// list_users
///
/// [Admin Route] Most recently registered users, 30 per page.
#[utoipa::path(
    get,
    path = "/admin/users",
    params(PageQuery),
    responses((status = 200, description = "Latest users", body = Page<User>))
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<User>>> {
    let page = query.resolve(USERS_PER_PAGE);
    Ok(Json(state.repo.list_users(page).await?))
}

/// search_usernames
///
/// [Admin Route] Up to 100 usernames containing `username`. A missing
/// parameter is treated as the empty string and matches everyone.
#[utoipa::path(
    get,
    path = "/admin/users/search",
    params(UsernameSearch),
    responses((status = 200, description = "Matching usernames", body = [String]))
)]
pub async fn search_usernames(
    State(state): State<AppState>,
    Query(query): Query<UsernameSearch>,
) -> AppResult<Json<Vec<String>>> {
    let needle = query.username.unwrap_or_default();
    Ok(Json(state.repo.search_usernames(&needle, SEARCH_LIMIT).await?))
}

/// search_category_names
///
/// [Admin Route] Up to 100 category names containing `name`.
#[utoipa::path(
    get,
    path = "/admin/categories/search",
    params(CategorySearch),
    responses(
        (status = 200, description = "Matching category names", body = [String]),
        (status = 422, description = "`name` is missing")
    )
)]
pub async fn search_category_names(
    State(state): State<AppState>,
    Query(query): Query<CategorySearch>,
) -> AppResult<Json<Vec<String>>> {
    let needle = required(query.name.as_deref(), "name")?;
    Ok(Json(state.repo.search_category_names(needle, SEARCH_LIMIT).await?))
}

async fn list_reports(
    state: AppState,
    kind: ReportableType,
    query: ReportQuery,
) -> AppResult<Json<Page<ReportEntry>>> {
    let status = ReportStatus::from_type_param(required(query.report_type.as_deref(), "type")?);
    let page = PageRequest::from_param(query.page.as_deref(), REPORTS_PER_PAGE);
    Ok(Json(state.repo.list_reports(kind, status, page).await?))
}

/// list_reported_submissions
///
/// [Admin Route] Reports filed against submissions, 50 per page, newest first,
/// with the reporter and the submission included.
#[utoipa::path(
    get,
    path = "/admin/reports/submissions",
    params(ReportQuery),
    responses(
        (status = 200, description = "Reported submissions", body = Page<ReportEntry>),
        (status = 422, description = "`type` is missing")
    )
)]
pub async fn list_reported_submissions(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<Page<ReportEntry>>> {
    list_reports(state, ReportableType::Submission, query).await
}

/// list_reported_comments
///
/// [Admin Route] Reports filed against comments; same rules as submissions.
#[utoipa::path(
    get,
    path = "/admin/reports/comments",
    params(ReportQuery),
    responses(
        (status = 200, description = "Reported comments", body = Page<ReportEntry>),
        (status = 422, description = "`type` is missing")
    )
)]
pub async fn list_reported_comments(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<Page<ReportEntry>>> {
    list_reports(state, ReportableType::Comment, query).await
}
