//! Askama templates for the admin pages.
//!
//! Renderers here are pure: dataset in, HTML string out.

use askama::Template;
use axum::response::Html;

use crate::models::{AnalyticsSummary, AuditLogEntry, Farm, FarmPage, PageWindow};

/// Sign-in landing page
#[derive(Template)]
#[template(path = "admin/sign_in.html")]
pub struct SignInTemplate {
    pub error: Option<String>,
}

/// Analytics dashboard
#[derive(Template)]
#[template(path = "admin/analytics.html")]
pub struct AnalyticsTemplate {
    pub summary: AnalyticsSummary,
}

/// Audit log table
#[derive(Template)]
#[template(path = "admin/audit_logs.html")]
pub struct AuditLogsTemplate {
    pub entries: Vec<AuditLogEntry>,
}

/// Farm table with page controls
#[derive(Template)]
#[template(path = "admin/farms.html")]
pub struct FarmsTemplate {
    pub farms: Vec<Farm>,
    pub total_count: i64,
    pub pagination: Pagination,
}

/// Error page shown when a backend collaborator fails
#[derive(Template)]
#[template(path = "admin/error.html")]
pub struct ErrorTemplate {
    pub message: String,
}

/// Pagination
///
/// Page controls derived from a window and the total row count.
/// Pages are 1-based; an empty result set still has one (empty) page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: u32,
    pub current_page: u64,
    pub total_pages: u64,
    pub prev_offset: Option<u32>,
    pub next_offset: Option<u32>,
}

impl Pagination {
    pub fn new(window: PageWindow, total_count: i64) -> Self {
        let limit = window.limit.max(1);
        let total = u64::try_from(total_count).unwrap_or(0);
        let total_pages = total.div_ceil(u64::from(limit)).max(1);
        let current_page = u64::from(window.offset / limit) + 1;

        let prev_offset = (window.offset > 0).then(|| window.offset.saturating_sub(limit));
        let next = u64::from(window.offset) + u64::from(limit);
        let next_offset = if next < total {
            u32::try_from(next).ok()
        } else {
            None
        };

        Self {
            limit,
            current_page,
            total_pages,
            prev_offset,
            next_offset,
        }
    }
}

fn render_html<T: Template>(template: &T) -> Html<String> {
    Html(
        template
            .render()
            .unwrap_or_else(|e| format!("Template error: {e}")),
    )
}

pub fn render_sign_in(error: Option<String>) -> Html<String> {
    render_html(&SignInTemplate { error })
}

pub fn render_analytics(summary: AnalyticsSummary) -> Html<String> {
    render_html(&AnalyticsTemplate { summary })
}

pub fn render_audit_logs(entries: Vec<AuditLogEntry>) -> Html<String> {
    render_html(&AuditLogsTemplate { entries })
}

pub fn render_farms(page: FarmPage, window: PageWindow) -> Html<String> {
    let pagination = Pagination::new(window, page.total_count);
    render_html(&FarmsTemplate {
        farms: page.items,
        total_count: page.total_count,
        pagination,
    })
}

pub fn render_error_page(message: &str) -> String {
    ErrorTemplate {
        message: message.to_string(),
    }
    .render()
    .unwrap_or_else(|e| format!("Template error: {e}"))
}
