use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
};
use axum_extra::extract::CookieJar;
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use std::{convert::Infallible, sync::Arc};
use uuid::Uuid;

use crate::{config::AppConfig, error::AuthBackendError};

/// Cookie holding the Supabase access token for the admin area.
pub const SESSION_COOKIE: &str = "sb-access-token";

/// Audience Supabase stamps on tokens of signed-in users.
const AUTHENTICATED_AUDIENCE: &str = "authenticated";

/// Claims
///
/// The subset of a Supabase access token payload needed to pre-validate it.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the `auth.users.id` of the signed-in user.
    pub sub: Uuid,
    /// Expiration Time (exp): tokens past this instant are treated as no session.
    pub exp: usize,
    pub aud: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Session
///
/// The identity asserted by the current request. Read, never mutated, by the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role: Option<String>,
}

/// SessionTokens
///
/// Tokens issued by GoTrue after a successful password sign-in.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// SessionBackend
///
/// Contract for the external identity service. Swappable so handlers and the
/// gate can be exercised against an in-memory fake.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// Resolves the session for `access_token`. `Ok(None)` means "no valid
    /// session" and is the expected outcome for anonymous or expired callers.
    async fn get_current_session(
        &self,
        access_token: Option<&str>,
    ) -> Result<Option<Session>, AuthBackendError>;

    /// Exchanges credentials for tokens. `Ok(None)` means the credentials were rejected.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<SessionTokens>, AuthBackendError>;

    /// Revokes the session behind `access_token`.
    async fn sign_out(&self, access_token: &str) -> Result<(), AuthBackendError>;
}

/// SessionState
///
/// The shared handle to the session backend stored in `AppState`.
pub type SessionState = Arc<dyn SessionBackend>;

/// GoTrueUser
///
/// Minimal view of the `/auth/v1/user` response body.
#[derive(Deserialize)]
struct GoTrueUser {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

/// SupabaseAuth
///
/// Session backend backed by Supabase GoTrue. Tokens are first verified locally
/// with the project's JWT secret; surviving tokens are then confirmed against
/// GoTrue so that revoked or deleted users lose access immediately.
#[derive(Clone)]
pub struct SupabaseAuth {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
    decoding_key: DecodingKey,
}

impl SupabaseAuth {
    pub fn new(supabase_url: &str, anon_key: &str, jwt_secret: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: supabase_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.supabase_url,
            &config.supabase_anon_key,
            &config.jwt_secret,
        )
    }

    /// Local signature, expiry and audience check. Any failure means "no session".
    fn verify_locally(&self, token: &str) -> Option<Claims> {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.set_audience(&[AUTHENTICATED_AUDIENCE]);

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!(reason = ?e.kind(), "access token rejected locally");
                None
            }
        }
    }
}

#[async_trait]
impl SessionBackend for SupabaseAuth {
    async fn get_current_session(
        &self,
        access_token: Option<&str>,
    ) -> Result<Option<Session>, AuthBackendError> {
        let Some(token) = access_token else {
            return Ok(None);
        };

        let Some(claims) = self.verify_locally(token) else {
            return Ok(None);
        };

        let response = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let user = response
                    .json::<GoTrueUser>()
                    .await
                    .map_err(|e| AuthBackendError::MalformedResponse(e.to_string()))?;

                // GoTrue is authoritative; the token's subject must match.
                if user.id != claims.sub {
                    tracing::warn!(token_sub = %claims.sub, user_id = %user.id, "token subject mismatch");
                    return Ok(None);
                }

                Ok(Some(Session {
                    user_id: user.id,
                    email: user.email.or(claims.email),
                    role: user.role.or(claims.role),
                }))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status => Err(AuthBackendError::UnexpectedStatus {
                status: status.as_u16(),
            }),
        }
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<SessionTokens>, AuthBackendError> {
        let response = self
            .client
            .post(format!("{}/auth/v1/token?grant_type=password", self.base_url))
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => response
                .json::<SessionTokens>()
                .await
                .map(Some)
                .map_err(|e| AuthBackendError::MalformedResponse(e.to_string())),
            // GoTrue answers bad credentials with 400 "invalid_grant".
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => Ok(None),
            status => Err(AuthBackendError::UnexpectedStatus {
                status: status.as_u16(),
            }),
        }
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthBackendError> {
        let response = self
            .client
            .post(format!("{}/auth/v1/logout", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        match response.status() {
            // An already-invalid token is as good as signed out.
            status if status.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(()),
            status => Err(AuthBackendError::UnexpectedStatus {
                status: status.as_u16(),
            }),
        }
    }
}

/// SessionCredentials
///
/// The raw access token carried by a request, if any: the `sb-access-token`
/// cookie first, then an `Authorization: Bearer` header. Extraction never
/// rejects; validating the token is the session backend's job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCredentials {
    pub access_token: Option<String>,
}

impl SessionCredentials {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }
}

impl<S> FromRequestParts<S> for SessionCredentials
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        if let Some(cookie) = jar.get(SESSION_COOKIE) {
            if !cookie.value().is_empty() {
                return Ok(Self::bearer(cookie.value()));
            }
        }

        let access_token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string);

        Ok(Self { access_token })
    }
}
