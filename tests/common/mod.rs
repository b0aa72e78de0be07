#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use tower::ServiceExt;
use voten_admin::{
    AppState,
    config::AppConfig,
    create_router,
    models::{
        Category, Comment, DashboardStats, Report, ReportEntry, ReportStatus, ReportTarget,
        ReportableType, Submission, User,
    },
    pagination::{Page, PageRequest},
    repository::{RepoResult, Repository, RepositoryState},
};

pub const ADMIN_ID: i64 = 1;
pub const MEMBER_ID: i64 = 2;

// --- MOCK REPOSITORY IMPLEMENTATION ---

/// In-memory stand-in for Postgres. Listings honour the same ordering and
/// paging rules as the real store so handler behaviour can be checked end to end.
#[derive(Default)]
pub struct MockRepo {
    pub users: Vec<User>,
    pub categories: Vec<Category>,
    pub submissions: Vec<Submission>,
    pub comments: Vec<Comment>,
    pub reports: Vec<ReportEntry>,
    pub stats: DashboardStats,
    /// When true, every data query fails like a dropped connection.
    pub fail: bool,

    // --- Recorded interactions ---
    pub data_queries: AtomicUsize,
    pub last_search: Mutex<Option<String>>,
    pub last_report_query: Mutex<Option<(ReportableType, ReportStatus, PageRequest)>>,
}

impl MockRepo {
    pub fn with_default_users() -> Self {
        Self {
            users: vec![
                user(ADMIN_ID, "root", "administrator"),
                user(MEMBER_ID, "alice", "user"),
            ],
            ..Self::default()
        }
    }

    pub fn queries(&self) -> usize {
        self.data_queries.load(Ordering::SeqCst)
    }

    fn record(&self) -> RepoResult<()> {
        self.data_queries.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(sqlx::Error::PoolTimedOut)
        } else {
            Ok(())
        }
    }
}

fn newest_first<T: Clone>(items: &[T], id: impl Fn(&T) -> i64, page: PageRequest) -> Page<T> {
    let mut sorted = items.to_vec();
    sorted.sort_by_key(|item| std::cmp::Reverse(id(item)));
    let rows = sorted
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.probe_limit() as usize)
        .collect();
    Page::from_probe(rows, page)
}

#[async_trait]
impl Repository for MockRepo {
    // Authentication lookups are not counted as data queries.
    async fn get_user(&self, id: i64) -> RepoResult<Option<User>> {
        Ok(self.users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_stats(&self, _since: DateTime<Utc>) -> RepoResult<DashboardStats> {
        self.record()?;
        Ok(self.stats.clone())
    }

    async fn list_submissions(&self, page: PageRequest) -> RepoResult<Page<Submission>> {
        self.record()?;
        Ok(newest_first(&self.submissions, |s| s.id, page))
    }

    async fn list_comments(&self, page: PageRequest) -> RepoResult<Page<Comment>> {
        self.record()?;
        Ok(newest_first(&self.comments, |c| c.id, page))
    }

    async fn list_categories(&self, page: PageRequest) -> RepoResult<Page<Category>> {
        self.record()?;
        Ok(newest_first(&self.categories, |c| c.id, page))
    }

    async fn list_users(&self, page: PageRequest) -> RepoResult<Page<User>> {
        self.record()?;
        Ok(newest_first(&self.users, |u| u.id, page))
    }

    async fn search_usernames(&self, query: &str, limit: i64) -> RepoResult<Vec<String>> {
        self.record()?;
        *self.last_search.lock().unwrap() = Some(query.to_string());
        Ok(self
            .users
            .iter()
            .filter(|u| u.username.contains(query))
            .take(limit as usize)
            .map(|u| u.username.clone())
            .collect())
    }

    async fn search_category_names(&self, query: &str, limit: i64) -> RepoResult<Vec<String>> {
        self.record()?;
        *self.last_search.lock().unwrap() = Some(query.to_string());
        Ok(self
            .categories
            .iter()
            .filter(|c| c.name.contains(query))
            .take(limit as usize)
            .map(|c| c.name.clone())
            .collect())
    }

    async fn list_reports(
        &self,
        kind: ReportableType,
        status: ReportStatus,
        page: PageRequest,
    ) -> RepoResult<Page<ReportEntry>> {
        self.record()?;
        *self.last_report_query.lock().unwrap() = Some((kind, status, page));

        let mut matching: Vec<ReportEntry> = self
            .reports
            .iter()
            .filter(|e| e.report.reportable_type == kind)
            .filter(|e| e.report.is_resolved() == (status == ReportStatus::Solved))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            (b.report.created_at, b.report.id).cmp(&(a.report.created_at, a.report.id))
        });
        let rows = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.probe_limit() as usize)
            .collect();
        Ok(Page::from_probe(rows, page))
    }
}

// --- FIXTURES ---

pub fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, hour, 0, 0).unwrap()
}

pub fn user(id: i64, username: &str, role: &str) -> User {
    User {
        id,
        username: username.to_string(),
        email: format!("{}@example.com", username),
        role: role.to_string(),
        created_at: at(0),
    }
}

pub fn category(id: i64, name: &str) -> Category {
    Category {
        id,
        name: name.to_string(),
        description: None,
        created_at: at(0),
    }
}

pub fn submission(id: i64) -> Submission {
    Submission {
        id,
        user_id: MEMBER_ID,
        category_id: 1,
        title: format!("Submission {}", id),
        slug: format!("submission-{}", id),
        created_at: at(0),
    }
}

/// A comment that arrives from the store with one nested reply attached.
pub fn comment_with_reply(id: i64) -> Comment {
    Comment {
        id,
        submission_id: 1,
        user_id: MEMBER_ID,
        parent_id: None,
        body: format!("comment {}", id),
        created_at: at(0),
        children: vec![Comment {
            id: id + 10_000,
            parent_id: Some(id),
            ..Comment::default()
        }],
    }
}

pub fn report(id: i64, kind: ReportableType, resolved: bool, hour: u32) -> ReportEntry {
    let reportable = match kind {
        ReportableType::Submission => ReportTarget::Submission(submission(id)),
        ReportableType::Comment => ReportTarget::Comment(Comment {
            id,
            ..Comment::default()
        }),
    };
    ReportEntry {
        report: Report {
            id,
            reporter_id: MEMBER_ID,
            reportable_id: id,
            reportable_type: kind,
            subject: "spam".to_string(),
            description: None,
            created_at: at(hour),
            resolved_at: resolved.then(|| at(hour + 1)),
        },
        reporter: Some(user(MEMBER_ID, "alice", "user")),
        reportable: Some(reportable),
    }
}

// --- TEST UTILITIES ---

pub fn test_state(repo: Arc<MockRepo>) -> AppState {
    AppState {
        repo: repo as RepositoryState,
        config: AppConfig::default(),
    }
}

pub fn test_app(repo: Arc<MockRepo>) -> Router {
    create_router(test_state(repo))
}

/// Sends a GET through the full router. `actor` uses the local `x-user-id` bypass.
pub async fn get_json(
    app: Router,
    uri: &str,
    actor: Option<i64>,
) -> (StatusCode, serde_json::Value) {
    let mut request = Request::builder().method("GET").uri(uri);
    if let Some(id) = actor {
        request = request.header("x-user-id", id.to_string());
    }
    let response = app
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}
