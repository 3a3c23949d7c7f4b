use leptos::*;

use super::{
    app::{use_services, AppServices},
    session::{AuthError, Session, SessionUser},
    session_manager::SessionManager,
};
use crate::api::LoginRequest;

type AuthContext = (ReadSignal<AuthState>, WriteSignal<AuthState>);

/// `Loading` until the first session check resolves; any state may go back
/// to `Loading` when the session is checked again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStatus {
    #[default]
    Loading,
    Authenticated,
    Unauthenticated,
    Error,
}

impl AuthStatus {
    pub fn of(session: Option<&Session>) -> Self {
        match session {
            None => AuthStatus::Unauthenticated,
            Some(session) if !session.is_valid() => AuthStatus::Error,
            Some(_) => AuthStatus::Authenticated,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub status: AuthStatus,
    pub user: Option<SessionUser>,
}

impl AuthState {
    pub fn unauthenticated() -> Self {
        Self {
            status: AuthStatus::Unauthenticated,
            user: None,
        }
    }

    fn from_session(session: Option<&Session>) -> Self {
        let status = AuthStatus::of(session);
        Self {
            status,
            user: session
                .filter(|_| status == AuthStatus::Authenticated)
                .map(|s| s.user.clone()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == AuthStatus::Authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.status == AuthStatus::Loading
    }
}

pub async fn resolve_auth_state(sessions: &SessionManager) -> AuthState {
    let session = match sessions.current() {
        Some(session) => Some(sessions.ensure_fresh_token(session).await),
        None => None,
    };
    AuthState::from_session(session.as_ref())
}

fn create_auth_context() -> AuthContext {
    // Starts as Loading so guarded children stay hidden until the check lands.
    let (auth_state, set_auth_state) = create_signal(AuthState::default());

    match use_context::<AppServices>() {
        Some(services) => spawn_local(async move {
            let state = resolve_auth_state(&services.sessions).await;
            set_auth_state.set(state);
        }),
        None => {
            log::warn!("No session services provided, treating visitor as signed out");
            set_auth_state.set(AuthState::unauthenticated());
        }
    }

    (auth_state, set_auth_state)
}

#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    let ctx = create_auth_context();
    provide_context::<AuthContext>(ctx);
    view! { <>{children()}</> }
}

pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().unwrap_or_else(|| create_signal(AuthState::default()))
}

pub async fn login_request(
    request: LoginRequest,
    sessions: &SessionManager,
    set_auth_state: WriteSignal<AuthState>,
) -> Result<(), AuthError> {
    set_auth_state.update(|state| state.status = AuthStatus::Loading);

    match sessions.login(&request.email, &request.password).await {
        Ok(session) => {
            set_auth_state.set(AuthState::from_session(Some(&session)));
            Ok(())
        }
        Err(error) => {
            set_auth_state.set(AuthState::unauthenticated());
            Err(error)
        }
    }
}

pub fn logout(sessions: &SessionManager, set_auth_state: WriteSignal<AuthState>) {
    sessions.sign_out();
    set_auth_state.set(AuthState::unauthenticated());
}

pub fn use_login_action() -> Action<LoginRequest, Result<(), AuthError>> {
    let (_auth, set_auth) = use_auth();
    let sessions = use_services().sessions;

    create_action(move |request: &LoginRequest| {
        let payload = request.clone();
        let sessions = sessions.clone();
        async move { login_request(payload, &sessions, set_auth).await }
    })
}

pub fn use_logout() -> impl Fn() + Clone + 'static {
    let (_auth, set_auth) = use_auth();
    let sessions = use_services().sessions;
    move || logout(&sessions, set_auth)
}
