use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    api::{LoginResponse, RefreshResponse},
    utils::{storage::StoreError, token::claim_str},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionError {
    RefreshAccessTokenError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub organization_name: Option<String>,
}

impl SessionUser {
    pub fn display_name(&self) -> Option<&str> {
        self.full_name.as_deref().or(self.email.as_deref())
    }
}

/// The authenticated session. Once `error` is set the access token must not
/// be sent again; the user has to sign in anew.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub access_token_expires: DateTime<Utc>,
    pub issued_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<SessionError>,
    #[serde(default)]
    pub user: SessionUser,
}

/// Credentials returned by a successful refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub access_token_expires: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Failed to refresh access token: {0}")]
    RefreshFailed(String),
    #[error("Request failed: {0}")]
    Network(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::RefreshFailed(_) => "REFRESH_FAILED",
            AuthError::Network(_) => "REQUEST_FAILED",
            AuthError::InvalidRequest(_) => "INVALID_REQUEST",
            AuthError::Storage(err) => err.code(),
        }
    }
}

impl Session {
    /// Builds a session from a login response. Returns `None` when either
    /// token is missing.
    pub fn from_login(
        response: &LoginResponse,
        now: DateTime<Utc>,
        default_ttl: Duration,
    ) -> Option<Self> {
        let access_token = response.access()?.to_string();
        let refresh_token = response.refresh()?.to_string();
        let access_token_expires = token_expiry(now, response.expires_in(), default_ttl)?;

        let full_name = response
            .full_name
            .clone()
            .or_else(|| claim_str(&access_token, "full_name"));
        let user = SessionUser {
            email: response.email.clone(),
            full_name,
            organization: response
                .organization_id
                .clone()
                .or_else(|| response.organization.clone()),
            organization_name: response.organization_name.clone(),
        };

        Some(Self {
            access_token,
            refresh_token,
            access_token_expires,
            issued_at: now,
            error: None,
            user,
        })
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    pub fn needs_refresh(&self, now: DateTime<Utc>, skew: Duration) -> bool {
        self.access_token_expires
            .checked_sub_signed(skew)
            .map_or(true, |due| now >= due)
    }

    pub fn is_past_max_age(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        self.issued_at
            .checked_add_signed(max_age)
            .is_some_and(|end| now >= end)
    }

    /// Applies a refresh grant; the profile and the original issue time are
    /// kept, and the refresh token only changes when the server rotated it.
    pub fn renewed(&self, grant: TokenGrant) -> Self {
        Self {
            access_token: grant.access_token,
            refresh_token: grant
                .refresh_token
                .unwrap_or_else(|| self.refresh_token.clone()),
            access_token_expires: grant.access_token_expires,
            issued_at: self.issued_at,
            error: None,
            user: self.user.clone(),
        }
    }

    pub fn with_refresh_error(&self) -> Self {
        Self {
            error: Some(SessionError::RefreshAccessTokenError),
            ..self.clone()
        }
    }
}

impl TokenGrant {
    pub fn from_refresh(
        response: &RefreshResponse,
        now: DateTime<Utc>,
        default_ttl: Duration,
    ) -> Result<Self, AuthError> {
        if let Some(error) = &response.error {
            return Err(AuthError::RefreshFailed(format!(
                "backend returned error: {}",
                error
            )));
        }
        let access_token = response
            .access
            .clone()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AuthError::RefreshFailed("No access token in response".into()))?;
        let access_token_expires = token_expiry(now, response.expires_in, default_ttl)
            .ok_or_else(|| AuthError::RefreshFailed("Token lifetime out of range".into()))?;
        Ok(Self {
            access_token,
            refresh_token: response.refresh.clone().filter(|token| !token.is_empty()),
            access_token_expires,
        })
    }
}

/// Expiry of a token issued at `now`. The server-declared lifetime wins when
/// positive; `None` when it does not fit in a timestamp.
fn token_expiry(
    now: DateTime<Utc>,
    declared_secs: Option<i64>,
    default_ttl: Duration,
) -> Option<DateTime<Utc>> {
    let ttl = match declared_secs.filter(|secs| *secs > 0) {
        Some(secs) => Duration::try_seconds(secs)?,
        None => default_ttl,
    };
    now.checked_add_signed(ttl)
}
