use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

// --- Store Records (Mapped to Database) ---

/// User
///
/// A registered account from the `users` table. The `role` column is what the
/// administrator check reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    // 'user' or 'administrator'.
    pub role: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// The role value that grants access to the admin dashboard.
pub const ADMINISTRATOR_ROLE: &str = "administrator";

/// Category
///
/// A community that submissions are posted into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Submission
///
/// A post inside a category. Vote tallies live in `submission_votes` and are
/// only aggregated by the dashboard counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Submission {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub title: String,
    pub slug: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Comment
///
/// A comment on a submission. `children` holds nested replies when a caller
/// has loaded the thread; it is not a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Comment {
    pub id: i64,
    pub submission_id: i64,
    pub user_id: i64,
    pub parent_id: Option<i64>,
    pub body: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[schema(no_recursion)]
    pub children: Vec<Comment>,
}

impl Comment {
    /// Drops any loaded replies so listings stay flat.
    pub fn without_children(mut self) -> Self {
        self.children.clear();
        self
    }
}

/// ReportableType
///
/// What kind of record a report points at. The lowercase name is the value
/// stored in `reports.reportable_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ReportableType {
    Submission,
    Comment,
}

impl ReportableType {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportableType::Submission => "submission",
            ReportableType::Comment => "comment",
        }
    }
}

/// ReportStatus
///
/// Resolution state used to filter report listings. Resolved reports are the
/// soft-deleted rows (`deleted_at IS NOT NULL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStatus {
    Solved,
    Unsolved,
}

impl ReportStatus {
    /// Interprets the `type` query value: "solved" selects resolved reports and
    /// every other value falls back to the unresolved queue.
    pub fn from_type_param(value: &str) -> Self {
        if value == "solved" {
            ReportStatus::Solved
        } else {
            ReportStatus::Unsolved
        }
    }
}

/// Report
///
/// A user complaint about a submission or a comment, from the `reports` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Report {
    pub id: i64,
    pub reporter_id: i64,
    pub reportable_id: i64,
    pub reportable_type: ReportableType,
    pub subject: String,
    pub description: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    /// Set once a moderator resolved the report.
    #[ts(type = "string | null")]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Report {
    pub fn is_resolved(&self) -> bool {
        self.resolved_at.is_some()
    }
}

/// ReportTarget
///
/// The eagerly loaded record a report points at. Serialized as
/// `{"submission": {...}}` or `{"comment": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ReportTarget {
    Submission(Submission),
    Comment(Comment),
}

/// ReportEntry
///
/// One row of a reported-content listing: the report, who filed it, and the
/// reported record. `reporter` and `reportable` are null when the referenced
/// row no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ReportEntry {
    pub report: Report,
    pub reporter: Option<User>,
    pub reportable: Option<ReportTarget>,
}

// --- Dashboard Schemas (Output) ---

/// DashboardStats
///
/// Output schema for GET /admin/stats. "Today" counters cover the trailing
/// 24 hours; every `*Today` value is bounded by its `*Total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardStats {
    pub users_total: i64,
    pub users_today: i64,
    pub categories_total: i64,
    pub categories_today: i64,
    pub submissions_total: i64,
    pub submissions_today: i64,
    pub comments_total: i64,
    pub comments_today: i64,
    pub messages_total: i64,
    pub messages_today: i64,
    pub submission_votes_total: i64,
    pub submission_votes_today: i64,
    /// Counts unresolved reports only.
    pub reports_total: i64,
    pub reports_today: i64,
}

/// Counter
///
/// A `(total, today)` pair for one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counter {
    pub total: i64,
    pub today: i64,
}

impl DashboardStats {
    pub fn from_counters(
        users: Counter,
        categories: Counter,
        submissions: Counter,
        comments: Counter,
        messages: Counter,
        submission_votes: Counter,
        reports: Counter,
    ) -> Self {
        Self {
            users_total: users.total,
            users_today: users.today,
            categories_total: categories.total,
            categories_today: categories.today,
            submissions_total: submissions.total,
            submissions_today: submissions.today,
            comments_total: comments.total,
            comments_today: comments.today,
            messages_total: messages.total,
            messages_today: messages.today,
            submission_votes_total: submission_votes.total,
            submission_votes_today: submission_votes.today,
            reports_total: reports.total,
            reports_today: reports.today,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_literal_solved_selects_resolved_reports() {
        assert_eq!(ReportStatus::from_type_param("solved"), ReportStatus::Solved);
        assert_eq!(ReportStatus::from_type_param("unsolved"), ReportStatus::Unsolved);
        assert_eq!(ReportStatus::from_type_param("Solved"), ReportStatus::Unsolved);
        assert_eq!(ReportStatus::from_type_param("anything"), ReportStatus::Unsolved);
    }

    #[test]
    fn without_children_clears_nested_replies() {
        let comment = Comment {
            id: 1,
            children: vec![Comment { id: 2, ..Comment::default() }],
            ..Comment::default()
        };

        assert!(comment.without_children().children.is_empty());
    }

    #[test]
    fn dashboard_stats_use_camel_case_keys() {
        let stats = DashboardStats {
            submission_votes_today: 3,
            ..DashboardStats::default()
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["submissionVotesToday"], 3);
        assert_eq!(json.as_object().unwrap().len(), 14);
    }

    #[test]
    fn report_target_is_keyed_by_kind() {
        let target = ReportTarget::Comment(Comment { id: 9, ..Comment::default() });

        let json = serde_json::to_value(&target).unwrap();
        assert_eq!(json["comment"]["id"], 9);
    }
}
