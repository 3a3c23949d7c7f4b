use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::{cell::RefCell, rc::Rc};

use super::session::Session;
use crate::{
    config::RuntimeConfig,
    utils::{
        storage::{KeyValueStorage, StoreError},
        time::Clock,
    },
};

pub const SESSION_STORAGE_KEY: &str = "dashboard.session";

/// Holder of the current session, injected into everything that issues
/// authorized calls.
pub trait SessionStore {
    fn get_current(&self) -> Option<Session>;
    fn update(&self, session: Session) -> Result<(), StoreError>;
    fn clear(&self);
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: RefCell<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get_current(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    fn update(&self, session: Session) -> Result<(), StoreError> {
        *self.session.borrow_mut() = Some(session);
        Ok(())
    }

    fn clear(&self) {
        self.session.borrow_mut().take();
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    iat: i64,
    exp: i64,
    session: Session,
}

/// Persists the session as an HS256-signed JWT so a record edited in storage,
/// or written under another secret, is rejected on read. The record expires
/// `max_age` after the original login.
pub struct SignedSessionStore<S> {
    storage: S,
    secret: String,
    max_age: Duration,
    clock: Rc<dyn Clock>,
}

impl<S: KeyValueStorage> SignedSessionStore<S> {
    pub fn new(storage: S, config: &RuntimeConfig, clock: Rc<dyn Clock>) -> Self {
        Self {
            storage,
            secret: config.session_secret.clone(),
            max_age: config.session_max_age(),
            clock,
        }
    }

    fn decode_record(&self, raw: &str) -> Option<Session> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the injected clock below.
        validation.validate_exp = false;
        let data = match decode::<SessionClaims>(
            raw,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        ) {
            Ok(data) => data,
            Err(err) => {
                log::warn!("Discarding stored session that failed verification: {err}");
                return None;
            }
        };
        if data.claims.exp <= self.clock.now().timestamp() {
            log::info!("Stored session reached its maximum age");
            return None;
        }
        Some(data.claims.session)
    }
}

impl<S: KeyValueStorage> SessionStore for SignedSessionStore<S> {
    fn get_current(&self) -> Option<Session> {
        let raw = self.storage.get_item(SESSION_STORAGE_KEY)?;
        let session = self.decode_record(&raw);
        if session.is_none() {
            self.storage.remove_item(SESSION_STORAGE_KEY);
        }
        session
    }

    fn update(&self, session: Session) -> Result<(), StoreError> {
        let expires = session
            .issued_at
            .checked_add_signed(self.max_age)
            .ok_or_else(|| StoreError::Encode("session expiry out of range".into()))?;
        let claims = SessionClaims {
            iat: session.issued_at.timestamp(),
            exp: expires.timestamp(),
            session,
        };
        let record = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| StoreError::Encode(e.to_string()))?;
        self.storage.set_item(SESSION_STORAGE_KEY, &record)
    }

    fn clear(&self) {
        self.storage.remove_item(SESSION_STORAGE_KEY);
    }
}
