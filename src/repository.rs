use crate::models::{
    Category, Comment, Counter, DashboardStats, Report, ReportEntry, ReportStatus, ReportTarget,
    ReportableType, Submission, User,
};
use crate::pagination::{Page, PageRequest};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, query_builder::QueryBuilder};
use std::collections::HashMap;
use std::sync::Arc;

/// Result type for every store operation. Failures are surfaced, never swallowed.
pub type RepoResult<T> = Result<T, sqlx::Error>;

/// Repository Trait
///
/// The read-only contract the admin handlers rely on. Handlers only ever see
/// `Arc<dyn Repository>`, so tests can substitute an in-memory implementation.
///
/// **Send + Sync + async_trait** are required to share the trait object across
/// Axum's task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Authentication ---
    // Fresh lookup on every request; the role is never cached.
    async fn get_user(&self, id: i64) -> RepoResult<Option<User>>;

    // --- Dashboard ---
    // Totals plus the number of rows created at or after `since`.
    async fn get_stats(&self, since: DateTime<Utc>) -> RepoResult<DashboardStats>;

    // --- Listings (newest id first) ---
    async fn list_submissions(&self, page: PageRequest) -> RepoResult<Page<Submission>>;
    async fn list_comments(&self, page: PageRequest) -> RepoResult<Page<Comment>>;
    async fn list_categories(&self, page: PageRequest) -> RepoResult<Page<Category>>;
    async fn list_users(&self, page: PageRequest) -> RepoResult<Page<User>>;

    // --- Substring search ---
    async fn search_usernames(&self, query: &str, limit: i64) -> RepoResult<Vec<String>>;
    async fn search_category_names(&self, query: &str, limit: i64) -> RepoResult<Vec<String>>;

    // --- Moderation ---
    // Reports against one kind of record, filtered by resolution state, with
    // reporter and target eagerly loaded. Newest report first.
    async fn list_reports(
        &self,
        kind: ReportableType,
        status: ReportStatus,
        page: PageRequest,
    ) -> RepoResult<Page<ReportEntry>>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// Tables that feed the dashboard counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CountedTable {
    Users,
    Categories,
    Submissions,
    Comments,
    Messages,
    SubmissionVotes,
    Reports,
}

impl CountedTable {
    fn name(self) -> &'static str {
        match self {
            CountedTable::Users => "users",
            CountedTable::Categories => "categories",
            CountedTable::Submissions => "submissions",
            CountedTable::Comments => "comments",
            CountedTable::Messages => "messages",
            CountedTable::SubmissionVotes => "submission_votes",
            CountedTable::Reports => "reports",
        }
    }

    // Soft-deleted (resolved) reports are hidden from the counters.
    fn soft_deletes(self) -> bool {
        matches!(self, CountedTable::Reports)
    }
}

/// Escapes LIKE wildcards so user input always matches as a literal substring.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn contains_pattern(query: &str) -> String {
    format!("%{}%", escape_like(query))
}

/// Raw `reports` row. The kind is known from the query filter, so it is not selected.
#[derive(FromRow)]
struct ReportRow {
    id: i64,
    reporter_id: i64,
    reportable_id: i64,
    subject: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl ReportRow {
    fn into_report(self, kind: ReportableType) -> Report {
        Report {
            id: self.id,
            reporter_id: self.reporter_id,
            reportable_id: self.reportable_id,
            reportable_type: kind,
            subject: self.subject,
            description: self.description,
            created_at: self.created_at,
            resolved_at: self.deleted_at,
        }
    }
}

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by PostgreSQL.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// counter
    ///
    /// Counts the total and the rows created since `since` in one statement, so
    /// both numbers come from the same snapshot and `today <= total` always holds.
    async fn counter(&self, table: CountedTable, since: DateTime<Utc>) -> RepoResult<Counter> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
            "SELECT COUNT(*) AS total, COUNT(*) FILTER (WHERE created_at >= ",
        );
        builder.push_bind(since);
        builder.push(") AS today FROM ");
        builder.push(table.name());
        if table.soft_deletes() {
            builder.push(" WHERE deleted_at IS NULL");
        }

        let (total, today): (i64, i64) = builder.build_query_as().fetch_one(&self.pool).await?;
        Ok(Counter { total, today })
    }

    async fn users_by_id(&self, ids: &[i64]) -> RepoResult<HashMap<i64, User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, email, role, created_at FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(users.into_iter().map(|u| (u.id, u)).collect())
    }

    async fn submissions_by_id(&self, ids: &[i64]) -> RepoResult<HashMap<i64, Submission>> {
        let submissions = sqlx::query_as::<_, Submission>(
            "SELECT id, user_id, category_id, title, slug, created_at FROM submissions WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(submissions.into_iter().map(|s| (s.id, s)).collect())
    }

    async fn comments_by_id(&self, ids: &[i64]) -> RepoResult<HashMap<i64, Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            "SELECT id, submission_id, user_id, parent_id, body, created_at FROM comments WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(comments.into_iter().map(|c| (c.id, c)).collect())
    }

    /// Loads the targets of a page of reports, keyed by `reportable_id`.
    async fn report_targets(
        &self,
        kind: ReportableType,
        ids: &[i64],
    ) -> RepoResult<HashMap<i64, ReportTarget>> {
        let targets = match kind {
            ReportableType::Submission => self
                .submissions_by_id(ids)
                .await?
                .into_iter()
                .map(|(id, s)| (id, ReportTarget::Submission(s)))
                .collect(),
            ReportableType::Comment => self
                .comments_by_id(ids)
                .await?
                .into_iter()
                .map(|(id, c)| (id, ReportTarget::Comment(c)))
                .collect(),
        };
        Ok(targets)
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    /// get_user
    ///
    /// Retrieves the account (and its role) needed for authentication and authorization.
    async fn get_user(&self, id: i64) -> RepoResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, role, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// get_stats
    ///
    /// Compiles all counters for the administrative dashboard.
    async fn get_stats(&self, since: DateTime<Utc>) -> RepoResult<DashboardStats> {
        Ok(DashboardStats::from_counters(
            self.counter(CountedTable::Users, since).await?,
            self.counter(CountedTable::Categories, since).await?,
            self.counter(CountedTable::Submissions, since).await?,
            self.counter(CountedTable::Comments, since).await?,
            self.counter(CountedTable::Messages, since).await?,
            self.counter(CountedTable::SubmissionVotes, since).await?,
            self.counter(CountedTable::Reports, since).await?,
        ))
    }

    async fn list_submissions(&self, page: PageRequest) -> RepoResult<Page<Submission>> {
        let rows = sqlx::query_as::<_, Submission>(
            r#"SELECT id, user_id, category_id, title, slug, created_at
               FROM submissions
               ORDER BY id DESC
               LIMIT $1 OFFSET $2"#,
        )
        .bind(page.probe_limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        Ok(Page::from_probe(rows, page))
    }

    /// list_comments
    ///
    /// Flat listing; replies are never loaded here.
    async fn list_comments(&self, page: PageRequest) -> RepoResult<Page<Comment>> {
        let rows = sqlx::query_as::<_, Comment>(
            r#"SELECT id, submission_id, user_id, parent_id, body, created_at
               FROM comments
               ORDER BY id DESC
               LIMIT $1 OFFSET $2"#,
        )
        .bind(page.probe_limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        Ok(Page::from_probe(rows, page))
    }

    async fn list_categories(&self, page: PageRequest) -> RepoResult<Page<Category>> {
        let rows = sqlx::query_as::<_, Category>(
            r#"SELECT id, name, description, created_at
               FROM categories
               ORDER BY id DESC
               LIMIT $1 OFFSET $2"#,
        )
        .bind(page.probe_limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        Ok(Page::from_probe(rows, page))
    }

    async fn list_users(&self, page: PageRequest) -> RepoResult<Page<User>> {
        let rows = sqlx::query_as::<_, User>(
            r#"SELECT id, username, email, role, created_at
               FROM users
               ORDER BY id DESC
               LIMIT $1 OFFSET $2"#,
        )
        .bind(page.probe_limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        Ok(Page::from_probe(rows, page))
    }

    /// search_usernames
    ///
    /// Case-sensitive substring match (`LIKE`), projected to the username column.
    async fn search_usernames(&self, query: &str, limit: i64) -> RepoResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT username FROM users WHERE username LIKE $1 ORDER BY id ASC LIMIT $2",
        )
        .bind(contains_pattern(query))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn search_category_names(&self, query: &str, limit: i64) -> RepoResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT name FROM categories WHERE name LIKE $1 ORDER BY id ASC LIMIT $2",
        )
        .bind(contains_pattern(query))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// list_reports
    ///
    /// Pages through reports for one target kind, then eager-loads reporters and
    /// targets with one `= ANY($1)` query each, the way an ORM `with()` would.
    async fn list_reports(
        &self,
        kind: ReportableType,
        status: ReportStatus,
        page: PageRequest,
    ) -> RepoResult<Page<ReportEntry>> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
            r#"SELECT id, reporter_id, reportable_id, subject, description, created_at, deleted_at
               FROM reports
               WHERE reportable_type = "#,
        );
        builder.push_bind(kind.as_str());
        builder.push(match status {
            ReportStatus::Solved => " AND deleted_at IS NOT NULL",
            ReportStatus::Unsolved => " AND deleted_at IS NULL",
        });
        // Tie-break on id so page boundaries are stable for equal timestamps.
        builder.push(" ORDER BY created_at DESC, id DESC LIMIT ");
        builder.push_bind(page.probe_limit());
        builder.push(" OFFSET ");
        builder.push_bind(page.offset());

        let rows: Vec<ReportRow> = builder.build_query_as().fetch_all(&self.pool).await?;
        let page = Page::from_probe(rows, page);

        let reporter_ids: Vec<i64> = page.data.iter().map(|r| r.reporter_id).collect();
        let target_ids: Vec<i64> = page.data.iter().map(|r| r.reportable_id).collect();

        let reporters = self.users_by_id(&reporter_ids).await?;
        let targets = self.report_targets(kind, &target_ids).await?;

        Ok(page.map(|row| {
            // Several reports may share a reporter or target, so clone rather than remove.
            let reporter = reporters.get(&row.reporter_id).cloned();
            let reportable = targets.get(&row.reportable_id).cloned();
            ReportEntry {
                report: row.into_report(kind),
                reporter,
                reportable,
            }
        }))
    }
}
