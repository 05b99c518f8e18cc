use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

/// Hard upper bound for a farms page window.
pub const MAX_FARMS_PAGE_SIZE: u32 = 200;

// --- Page Datasets (read from the data backend) ---

/// AnalyticsSummary
///
/// Headline counters for the admin dashboard. Computed entirely by the data
/// backend; the gate passes it through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct AnalyticsSummary {
    pub total_farms: i64,
    // Farms whose status is 'active'.
    pub active_farms: i64,
    pub total_users: i64,
    pub audit_events_last_24h: i64,
    pub farms_created_last_30_days: i64,
}

/// AuditLogEntry
///
/// One row of `public.audit_logs`, joined with the actor's email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct AuditLogEntry {
    pub id: i64,
    pub actor_id: Option<Uuid>,
    #[sqlx(default)]
    pub actor_email: Option<String>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<serde_json::Value>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Farm
///
/// A farm record from `public.farms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Farm {
    pub id: Uuid,
    pub name: String,
    // FK to public.profiles.id
    pub owner_id: Uuid,
    pub location: Option<String>,
    pub area_hectares: Option<f64>,
    // 'active' | 'inactive' | 'pending'
    pub status: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// FarmPage
///
/// One window of farms plus the size of the full matching set.
/// `total_count` never depends on the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct FarmPage {
    pub items: Vec<Farm>,
    pub total_count: i64,
}

// --- Pagination ---

/// PageWindow
///
/// A `(limit, offset)` pair. Unsigned fields make negative windows unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PageWindow {
    pub limit: u32,
    pub offset: u32,
}

impl PageWindow {
    /// Builds a window from optional request values. A missing limit falls back to
    /// `default_limit`; any limit is clamped to `1..=MAX_FARMS_PAGE_SIZE`.
    pub fn from_request(limit: Option<u32>, offset: Option<u32>, default_limit: u32) -> Self {
        Self {
            limit: limit
                .unwrap_or(default_limit)
                .clamp(1, MAX_FARMS_PAGE_SIZE),
            offset: offset.unwrap_or(0),
        }
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            limit: crate::config::DEFAULT_FARMS_PAGE_SIZE,
            offset: 0,
        }
    }
}

/// FarmsQuery
///
/// Query parameters accepted by the farms page and the farms API endpoint.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
pub struct FarmsQuery {
    /// Maximum number of farms to return (1..=200).
    pub limit: Option<u32>,
    /// Number of farms to skip.
    pub offset: Option<u32>,
}

// --- Auth Landing ---

/// SignInForm
///
/// Form body posted by the sign-in page. The password is forwarded to GoTrue and
/// never stored or logged.
#[derive(Debug, Clone, Deserialize)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}
