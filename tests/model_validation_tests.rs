use chrono::{TimeZone, Utc};
use voten_admin::{
    models::{
        Comment, Counter, DashboardStats, Report, ReportEntry, ReportTarget, ReportableType,
        Submission,
    },
    pagination::{Page, PageRequest},
};

fn sample_report(kind: ReportableType) -> Report {
    Report {
        id: 7,
        reporter_id: 3,
        reportable_id: 11,
        reportable_type: kind,
        subject: "Spam".to_string(),
        description: Some("Link farm".to_string()),
        created_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
        resolved_at: None,
    }
}

// --- Tests ---

#[test]
fn test_report_entry_json_shape() {
    let entry = ReportEntry {
        report: sample_report(ReportableType::Submission),
        reporter: None,
        reportable: Some(ReportTarget::Submission(Submission {
            id: 11,
            title: "Hello".to_string(),
            ..Submission::default()
        })),
    };

    let json = serde_json::to_value(&entry).unwrap();

    assert_eq!(json["report"]["reportable_type"], "submission");
    assert!(json["report"]["resolved_at"].is_null());
    // A reporter whose account is gone serializes as null rather than disappearing.
    assert!(json["reporter"].is_null());
    assert_eq!(json["reportable"]["submission"]["title"], "Hello");
}

#[test]
fn test_reportable_type_parses_lowercase_only() {
    let kind: ReportableType = serde_json::from_str("\"comment\"").unwrap();
    assert_eq!(kind, ReportableType::Comment);
    assert_eq!(kind.as_str(), "comment");

    assert!(serde_json::from_str::<ReportableType>("\"Comment\"").is_err());
}

#[test]
fn test_page_json_fields() {
    let page = Page::from_probe(
        vec![Comment { id: 1, ..Comment::default() }],
        PageRequest::new(1, 30),
    );

    let json = serde_json::to_value(&page).unwrap();

    for key in [
        "current_page",
        "per_page",
        "from",
        "to",
        "has_more_pages",
        "next_page",
        "prev_page",
        "data",
    ] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    assert!(json["next_page"].is_null());
    assert_eq!(json["data"][0]["children"], serde_json::json!([]));
}

#[test]
fn test_dashboard_stats_from_counters() {
    let c = |total, today| Counter { total, today };

    let stats = DashboardStats::from_counters(
        c(10, 1),
        c(20, 2),
        c(30, 3),
        c(40, 4),
        c(50, 5),
        c(60, 6),
        c(70, 7),
    );

    assert_eq!((stats.users_total, stats.users_today), (10, 1));
    assert_eq!((stats.messages_total, stats.messages_today), (50, 5));
    assert_eq!(
        (stats.submission_votes_total, stats.submission_votes_today),
        (60, 6)
    );
    assert_eq!((stats.reports_total, stats.reports_today), (70, 7));
}
