#[cfg(all(test, not(target_arch = "wasm32")))]
pub mod ssr;

#[cfg(test)]
pub mod helpers {
    use crate::state::{
        auth::{AuthState, AuthStatus},
        session::{Session, SessionUser},
    };
    use crate::utils::{navigation::Navigator, time::Clock};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use leptos::*;
    use std::cell::{Cell, RefCell};

    /// Clock frozen at a known instant, moved forward by hand.
    #[derive(Debug)]
    pub struct FixedClock {
        now: Cell<DateTime<Utc>>,
    }

    impl FixedClock {
        pub fn new() -> Self {
            Self {
                now: Cell::new(Self::default_instant()),
            }
        }

        pub fn default_instant() -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
        }

        pub fn advance(&self, by: Duration) {
            self.now.set(self.now.get() + by);
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.now.get()
        }
    }

    pub fn sample_session(now: DateTime<Utc>) -> Session {
        Session {
            access_token: "A1".into(),
            refresh_token: "R1".into(),
            access_token_expires: now + Duration::seconds(3600),
            issued_at: now,
            error: None,
            user: SessionUser {
                email: Some("a@b.com".into()),
                full_name: Some("Ada Lovelace".into()),
                organization: Some("org-1".into()),
                organization_name: Some("Acme".into()),
            },
        }
    }

    #[derive(Debug, Default)]
    pub struct RecordingNavigator {
        visited: RefCell<Vec<String>>,
    }

    impl RecordingNavigator {
        pub fn visited(&self) -> Vec<String> {
            self.visited.borrow().clone()
        }
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, path: &str) {
            self.visited.borrow_mut().push(path.to_string());
        }
    }

    pub fn provide_auth(status: AuthStatus) -> (ReadSignal<AuthState>, WriteSignal<AuthState>) {
        let (auth, set_auth) = create_signal(AuthState { status, user: None });
        provide_context((auth, set_auth));
        (auth, set_auth)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub use host::*;

    #[cfg(not(target_arch = "wasm32"))]
    mod host {
        use super::{sample_session, FixedClock};
        use crate::api::test_support::mock::MockServer;
        use crate::config::RuntimeConfig;
        use crate::state::{
            app::AppServices,
            session::Session,
            session_store::{MemorySessionStore, SessionStore},
        };
        use chrono::{DateTime, Utc};
        use std::rc::Rc;

        /// Services wired to `server` with an in-memory store and a frozen clock.
        pub fn services_for(server: &MockServer) -> (AppServices, Rc<FixedClock>) {
            let clock = Rc::new(FixedClock::new());
            let config = RuntimeConfig {
                api_base_url: server.url(""),
                ..RuntimeConfig::default()
            };
            let store: Rc<dyn SessionStore> = Rc::new(MemorySessionStore::new());
            let services =
                AppServices::assemble(&config, Rc::new(server.clone()), store, clock.clone());
            (services, clock)
        }

        pub fn sign_in(services: &AppServices, now: DateTime<Utc>) -> Session {
            let session = sample_session(now);
            services
                .store
                .update(session.clone())
                .expect("memory store accepts sessions");
            session
        }
    }
}
