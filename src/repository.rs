use crate::{
    error::DataBackendError,
    models::{AnalyticsSummary, AuditLogEntry, Farm, FarmPage},
};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

/// Number of most recent audit entries shown on the audit page.
pub const AUDIT_LOG_LIMIT: i64 = 100;

/// Repository Trait
///
/// Read-only contract for the admin area's data backend. Every method either
/// returns the full dataset or a `DataBackendError`; there is no partial success.
///
/// **Send + Sync + async_trait** make `Arc<dyn Repository>` shareable across
/// Axum's task boundaries and substitutable by in-memory fakes in tests.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Headline counters for the dashboard.
    async fn get_analytics_data(&self) -> Result<AnalyticsSummary, DataBackendError>;

    /// Most recent audit entries, newest first.
    async fn get_audit_logs(&self) -> Result<Vec<AuditLogEntry>, DataBackendError>;

    /// One window of farms, newest first, plus the total number of farms.
    async fn get_all_farms(&self, limit: u32, offset: u32) -> Result<FarmPage, DataBackendError>;
}

/// RepositoryState
///
/// The shared handle to the data backend stored in `AppState`.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// `Repository` backed by the Supabase Postgres database. Runs as the service
/// role, so row-level security does not filter these admin reads.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    /// get_analytics_data
    ///
    /// All counters come from one statement so they describe the same snapshot.
    async fn get_analytics_data(&self) -> Result<AnalyticsSummary, DataBackendError> {
        let summary = sqlx::query_as::<_, AnalyticsSummary>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM farms) AS total_farms,
                (SELECT COUNT(*) FROM farms WHERE status = 'active') AS active_farms,
                (SELECT COUNT(*) FROM profiles) AS total_users,
                (SELECT COUNT(*) FROM audit_logs
                    WHERE created_at >= NOW() - INTERVAL '24 hours') AS audit_events_last_24h,
                (SELECT COUNT(*) FROM farms
                    WHERE created_at >= NOW() - INTERVAL '30 days') AS farms_created_last_30_days
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .inspect_err(|e| tracing::error!("get_analytics_data error: {:?}", e))?;

        Ok(summary)
    }

    /// get_audit_logs
    ///
    /// Joins `profiles` for the actor's email. Entries whose actor was deleted keep
    /// a `NULL` email rather than disappearing.
    async fn get_audit_logs(&self) -> Result<Vec<AuditLogEntry>, DataBackendError> {
        let entries = sqlx::query_as::<_, AuditLogEntry>(
            r#"
            SELECT
                a.id, a.actor_id, p.email AS actor_email, a.action,
                a.entity_type, a.entity_id, a.metadata, a.created_at
            FROM audit_logs a
            LEFT JOIN profiles p ON a.actor_id = p.id
            ORDER BY a.created_at DESC, a.id DESC
            LIMIT $1
            "#,
        )
        .bind(AUDIT_LOG_LIMIT)
        .fetch_all(&self.pool)
        .await
        .inspect_err(|e| tracing::error!("get_audit_logs error: {:?}", e))?;

        Ok(entries)
    }

    /// get_all_farms
    ///
    /// The count is a separate query so it stays correct when `offset` lies past
    /// the last row and the window comes back empty.
    async fn get_all_farms(&self, limit: u32, offset: u32) -> Result<FarmPage, DataBackendError> {
        let total_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM farms")
            .fetch_one(&self.pool)
            .await
            .inspect_err(|e| tracing::error!("count farms error: {:?}", e))?;

        let items = sqlx::query_as::<_, Farm>(
            r#"
            SELECT id, name, owner_id, location, area_hectares, status, created_at
            FROM farms
            ORDER BY created_at DESC, id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(&self.pool)
        .await
        .inspect_err(|e| tracing::error!("get_all_farms error: {:?}", e))?;

        Ok(FarmPage { items, total_count })
    }
}
