use leptos::*;
use std::rc::Rc;

use super::{
    session_manager::SessionManager,
    session_store::{SessionStore, SignedSessionStore},
};
use crate::{
    api::{
        transport::{HttpTransport, ReqwestTransport},
        ApiClient,
    },
    config::{self, RuntimeConfig},
    utils::{
        storage::KeyValueStorage,
        time::{Clock, SystemClock},
    },
};

/// The services every authorized view shares. Built once at start-up and
/// handed to the component tree through context.
#[derive(Clone)]
pub struct AppServices {
    pub store: Rc<dyn SessionStore>,
    pub sessions: SessionManager,
    pub client: Rc<ApiClient>,
}

impl AppServices {
    pub fn from_config(config: &RuntimeConfig) -> Self {
        let clock: Rc<dyn Clock> = Rc::new(SystemClock);
        let store: Rc<dyn SessionStore> = Rc::new(SignedSessionStore::new(
            default_storage(),
            config,
            clock.clone(),
        ));
        Self::assemble(config, Rc::new(ReqwestTransport::new()), store, clock)
    }

    pub fn assemble(
        config: &RuntimeConfig,
        transport: Rc<dyn HttpTransport>,
        store: Rc<dyn SessionStore>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let sessions = SessionManager::with_clock(config, transport.clone(), store.clone(), clock);
        let client = Rc::new(ApiClient::new(config, transport, sessions.clone()));
        Self {
            store,
            sessions,
            client,
        }
    }

    pub fn provide(&self) {
        provide_context(self.clone());
    }
}

#[cfg(target_arch = "wasm32")]
fn default_storage() -> Rc<dyn KeyValueStorage> {
    Rc::new(crate::utils::storage::BrowserStorage)
}

#[cfg(not(target_arch = "wasm32"))]
fn default_storage() -> Rc<dyn KeyValueStorage> {
    Rc::new(crate::utils::storage::MemoryStorage::new())
}

pub fn use_services() -> AppServices {
    use_context::<AppServices>().unwrap_or_else(|| AppServices::from_config(&config::current()))
}
