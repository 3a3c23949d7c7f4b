use chrono::{DateTime, Duration, Utc};
use futures::lock::Mutex;
use std::rc::Rc;

use super::{
    auth::AuthStatus,
    session::{AuthError, Session, TokenGrant},
    session_store::SessionStore,
};
use crate::{
    api::{transport::HttpTransport, ApiError, AuthApi, LoginRequest, RefreshRequest},
    config::RuntimeConfig,
    utils::time::{Clock, SystemClock},
};

struct Inner {
    auth: AuthApi,
    store: Rc<dyn SessionStore>,
    clock: Rc<dyn Clock>,
    access_token_ttl: Duration,
    refresh_skew: Duration,
    max_age: Duration,
    refresh_lock: Mutex<()>,
}

/// Owns the session lifecycle: sign-in, silent token renewal and sign-out.
///
/// Renewal is single-flight. Callers that find the token due wait on one
/// lock; whoever gets it second re-reads the store and picks up the session
/// the first caller already renewed.
#[derive(Clone)]
pub struct SessionManager {
    inner: Rc<Inner>,
}

impl SessionManager {
    pub fn new(
        config: &RuntimeConfig,
        transport: Rc<dyn HttpTransport>,
        store: Rc<dyn SessionStore>,
    ) -> Self {
        Self::with_clock(config, transport, store, Rc::new(SystemClock))
    }

    pub fn with_clock(
        config: &RuntimeConfig,
        transport: Rc<dyn HttpTransport>,
        store: Rc<dyn SessionStore>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                auth: AuthApi::new(config.api_base_url.clone(), transport),
                store,
                clock,
                access_token_ttl: config.access_token_ttl(),
                refresh_skew: config.refresh_skew(),
                max_age: config.session_max_age(),
                refresh_lock: Mutex::new(()),
            }),
        }
    }

    fn now(&self) -> DateTime<Utc> {
        self.inner.clock.now()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = match self.inner.auth.login(&request).await {
            Ok(response) => response,
            Err(ApiError::Network(msg)) => {
                log::warn!("Login request failed: {}", msg);
                return Err(AuthError::Network(msg));
            }
            Err(ApiError::InvalidRequest(msg)) => {
                log::error!("Login request could not be built: {}", msg);
                return Err(AuthError::InvalidRequest(msg));
            }
            Err(err) => {
                log::info!("Login rejected ({})", err.code());
                return Err(AuthError::InvalidCredentials);
            }
        };

        let session = Session::from_login(&response, self.now(), self.inner.access_token_ttl)
            .ok_or_else(|| {
                log::warn!("Login response was missing tokens or had an unusable lifetime");
                AuthError::InvalidCredentials
            })?;
        self.inner.store.update(session.clone())?;
        log::info!("Signed in, access token valid until {}", session.access_token_expires);
        Ok(session)
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, AuthError> {
        let request = RefreshRequest {
            refresh: refresh_token.to_string(),
        };
        let response = self
            .inner
            .auth
            .refresh(&request)
            .await
            .map_err(|err| AuthError::RefreshFailed(err.to_string()))?;
        TokenGrant::from_refresh(&response, self.now(), self.inner.access_token_ttl)
    }

    /// Returns `session` untouched while its access token is fresh, otherwise
    /// renews it. Failures come back as a session with `error` set.
    pub async fn ensure_fresh_token(&self, session: Session) -> Session {
        if !session.is_valid() {
            return session;
        }
        if !session.needs_refresh(self.now(), self.inner.refresh_skew) {
            return session;
        }
        self.renew(session, false).await
    }

    /// Renews regardless of expiry, for an access token the backend rejected.
    pub async fn force_refresh(&self, session: Session) -> Session {
        if !session.is_valid() {
            return session;
        }
        self.renew(session, true).await
    }

    async fn renew(&self, stale: Session, forced: bool) -> Session {
        let _guard = self.inner.refresh_lock.lock().await;

        let Some(stored) = self.inner.store.get_current() else {
            log::info!("Session was cleared while waiting to refresh");
            return stale.with_refresh_error();
        };
        if stored.is_valid()
            && stored.access_token != stale.access_token
            && (forced || !stored.needs_refresh(self.now(), self.inner.refresh_skew))
        {
            return stored;
        }
        if !stored.is_valid() && stored.refresh_token == stale.refresh_token {
            return stored;
        }

        let renewed = match self.refresh(&stale.refresh_token).await {
            Ok(grant) => {
                log::debug!(
                    "Access token renewed, valid until {}",
                    grant.access_token_expires
                );
                stale.renewed(grant)
            }
            Err(err) => {
                log::warn!("Access token refresh failed: {}", err);
                stale.with_refresh_error()
            }
        };
        if let Err(err) = self.inner.store.update(renewed.clone()) {
            log::error!("Failed to persist session after refresh: {}", err);
        }
        renewed
    }

    /// The stored session, unless it outlived the maximum session age.
    pub fn current(&self) -> Option<Session> {
        let session = self.inner.store.get_current()?;
        if session.is_past_max_age(self.now(), self.inner.max_age) {
            log::info!("Session reached its maximum age, signing out");
            self.inner.store.clear();
            return None;
        }
        Some(session)
    }

    pub fn sign_out(&self) {
        self.inner.store.clear();
        log::info!("Signed out");
    }

    pub fn status(&self) -> AuthStatus {
        AuthStatus::of(self.current().as_ref())
    }

    pub async fn check(&self) -> AuthStatus {
        match self.current() {
            Some(session) => AuthStatus::of(Some(&self.ensure_fresh_token(session).await)),
            None => AuthStatus::Unauthenticated,
        }
    }
}
