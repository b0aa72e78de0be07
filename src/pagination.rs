use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

pub const SUBMISSIONS_PER_PAGE: i64 = 10;
pub const COMMENTS_PER_PAGE: i64 = 30;
pub const CATEGORIES_PER_PAGE: i64 = 30;
pub const USERS_PER_PAGE: i64 = 30;
pub const REPORTS_PER_PAGE: i64 = 50;

/// PageRequest
///
/// A resolved page number plus page size. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Builds a request from the raw `page` query value. Anything that is not a
    /// positive integer resolves to the first page.
    pub fn from_param(raw: Option<&str>, per_page: i64) -> Self {
        let page = raw
            .and_then(|value| value.trim().parse::<i64>().ok())
            .filter(|page| *page >= 1)
            .unwrap_or(1);
        Self::new(page, per_page)
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// Row limit for the store query: one extra row reveals whether a next page exists.
    pub fn probe_limit(&self) -> i64 {
        self.per_page + 1
    }
}

/// Page
///
/// A "simple" page: it knows whether a following page exists but never counts
/// the whole collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Page<T> {
    pub current_page: i64,
    pub per_page: i64,
    /// 1-based position of the first record on this page.
    pub from: Option<i64>,
    /// 1-based position of the last record on this page.
    pub to: Option<i64>,
    pub has_more_pages: bool,
    pub next_page: Option<i64>,
    pub prev_page: Option<i64>,
    pub data: Vec<T>,
}

impl<T> Page<T> {
    /// Shapes the rows fetched with `probe_limit()` into a page, dropping the
    /// probe row if the store returned it.
    pub fn from_probe(mut rows: Vec<T>, request: PageRequest) -> Self {
        let per_page = usize::try_from(request.per_page).unwrap_or(usize::MAX);
        let has_more_pages = rows.len() > per_page;
        rows.truncate(per_page);

        let (from, to) = if rows.is_empty() {
            (None, None)
        } else {
            let first = request.offset() + 1;
            (Some(first), Some(first + rows.len() as i64 - 1))
        };

        Self {
            current_page: request.page,
            per_page: request.per_page,
            from,
            to,
            has_more_pages,
            next_page: has_more_pages.then_some(request.page + 1),
            prev_page: (request.page > 1).then_some(request.page - 1),
            data: rows,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            current_page: self.current_page,
            per_page: self.per_page,
            from: self.from,
            to: self.to,
            has_more_pages: self.has_more_pages,
            next_page: self.next_page,
            prev_page: self.prev_page,
            data: self.data.into_iter().map(f).collect(),
        }
    }
}
