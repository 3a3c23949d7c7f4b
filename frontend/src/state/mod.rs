pub mod app;
pub mod auth;
pub mod session;
pub mod session_manager;
pub mod session_store;

pub use app::{use_services, AppServices};
pub use auth::{use_auth, AuthProvider, AuthState, AuthStatus};
pub use session::{AuthError, Session, SessionError, SessionUser, TokenGrant};
pub use session_manager::SessionManager;
pub use session_store::{MemorySessionStore, SessionStore, SignedSessionStore};
