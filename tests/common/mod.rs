#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use farm_admin::{
    AppState,
    auth::{Session, SessionBackend, SessionTokens},
    config::AppConfig,
    error::{AuthBackendError, DataBackendError},
    models::{AnalyticsSummary, AuditLogEntry, Farm, FarmPage},
    repository::Repository,
};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use uuid::Uuid;

pub const VALID_TOKEN: &str = "valid-admin-token";
pub const ADMIN_ID: Uuid = Uuid::from_u128(456);
pub const GOOD_PASSWORD: &str = "correct-horse-battery-staple";

// --- MOCK SESSION BACKEND ---

/// In-memory stand-in for Supabase GoTrue. Only `VALID_TOKEN` resolves to a session.
#[derive(Default)]
pub struct MockSessionBackend {
    /// When true, every session lookup fails with a 503 from the "auth backend".
    pub fail: bool,
    pub session_calls: AtomicUsize,
    pub sign_out_calls: AtomicUsize,
}

impl MockSessionBackend {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn session_calls(&self) -> usize {
        self.session_calls.load(Ordering::SeqCst)
    }
}

pub fn admin_session() -> Session {
    Session {
        user_id: ADMIN_ID,
        email: Some("admin@farm.test".to_string()),
        role: Some("authenticated".to_string()),
    }
}

#[async_trait]
impl SessionBackend for MockSessionBackend {
    async fn get_current_session(
        &self,
        access_token: Option<&str>,
    ) -> Result<Option<Session>, AuthBackendError> {
        self.session_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AuthBackendError::UnexpectedStatus { status: 503 });
        }
        Ok((access_token == Some(VALID_TOKEN)).then(admin_session))
    }

    async fn sign_in_with_password(
        &self,
        _email: &str,
        password: &str,
    ) -> Result<Option<SessionTokens>, AuthBackendError> {
        if self.fail {
            return Err(AuthBackendError::UnexpectedStatus { status: 503 });
        }
        Ok((password == GOOD_PASSWORD).then(|| SessionTokens {
            access_token: VALID_TOKEN.to_string(),
            refresh_token: Some("refresh".to_string()),
            expires_in: Some(3600),
        }))
    }

    async fn sign_out(&self, _access_token: &str) -> Result<(), AuthBackendError> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// --- MOCK REPOSITORY ---

/// Pre-canned datasets plus call recording, so tests can assert on what the
/// handlers asked the data backend for.
pub struct MockRepoControl {
    pub analytics: AnalyticsSummary,
    pub audit_logs: Vec<AuditLogEntry>,
    pub farms: Vec<Farm>,
    /// When true, every query fails as if the database were unreachable.
    pub fail: bool,
    pub data_calls: AtomicUsize,
    pub farm_windows: Mutex<Vec<(u32, u32)>>,
}

impl Default for MockRepoControl {
    fn default() -> Self {
        MockRepoControl {
            analytics: AnalyticsSummary {
                total_farms: 30,
                active_farms: 21,
                total_users: 12,
                audit_events_last_24h: 7,
                farms_created_last_30_days: 4,
            },
            audit_logs: vec![],
            farms: sample_farms(30),
            fail: false,
            data_calls: AtomicUsize::new(0),
            farm_windows: Mutex::new(vec![]),
        }
    }
}

impl MockRepoControl {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn data_calls(&self) -> usize {
        self.data_calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), DataBackendError> {
        self.data_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(DataBackendError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Repository for MockRepoControl {
    async fn get_analytics_data(&self) -> Result<AnalyticsSummary, DataBackendError> {
        self.check()?;
        Ok(self.analytics.clone())
    }

    async fn get_audit_logs(&self) -> Result<Vec<AuditLogEntry>, DataBackendError> {
        self.check()?;
        Ok(self.audit_logs.clone())
    }

    async fn get_all_farms(&self, limit: u32, offset: u32) -> Result<FarmPage, DataBackendError> {
        self.check()?;
        self.farm_windows.lock().unwrap().push((limit, offset));
        Ok(FarmPage {
            items: self
                .farms
                .iter()
                .skip(offset as usize)
                .take(limit as usize)
                .cloned()
                .collect(),
            total_count: self.farms.len() as i64,
        })
    }
}

// --- FIXTURES ---

pub fn sample_farms(count: usize) -> Vec<Farm> {
    (1..=count)
        .map(|n| Farm {
            id: Uuid::from_u128(n as u128),
            name: format!("Farm {n:02}"),
            owner_id: ADMIN_ID,
            location: (n % 2 == 0).then(|| format!("Valley {n}")),
            area_hectares: Some(n as f64 * 1.5),
            status: if n % 3 == 0 { "inactive" } else { "active" }.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                + chrono::Duration::days(n as i64),
        })
        .collect()
}

pub fn sample_audit_entry(id: i64, action: &str) -> AuditLogEntry {
    AuditLogEntry {
        id,
        actor_id: Some(ADMIN_ID),
        actor_email: Some("admin@farm.test".to_string()),
        action: action.to_string(),
        entity_type: "farm".to_string(),
        entity_id: Some(Uuid::from_u128(1).to_string()),
        metadata: Some(serde_json::json!({ "field": "status" })),
        created_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
    }
}

/// Builds an AppState around the given mocks, keeping handles for assertions.
pub fn create_test_state(
    sessions: Arc<MockSessionBackend>,
    repo: Arc<MockRepoControl>,
) -> AppState {
    AppState {
        sessions,
        repo,
        config: AppConfig::default(),
    }
}
