use crate::{
    components::layout::LoadingSpinner,
    state::auth::{use_auth, AuthStatus},
    utils::navigation::{redirect_to_login, Navigator, LOGIN_PATH},
};
use leptos::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    Render,
    Fallback,
    RedirectToLogin,
}

pub fn guard_outcome(status: AuthStatus) -> GuardOutcome {
    match status {
        AuthStatus::Loading => GuardOutcome::Fallback,
        AuthStatus::Authenticated => GuardOutcome::Render,
        AuthStatus::Unauthenticated | AuthStatus::Error => GuardOutcome::RedirectToLogin,
    }
}

/// Chooses between protected content and its placeholder. Visitors without a
/// usable session are sent to the login view and see the placeholder until
/// the navigation happens.
pub fn guard<T>(
    status: AuthStatus,
    render: impl FnOnce() -> T,
    fallback: impl FnOnce() -> T,
    navigator: &dyn Navigator,
) -> T {
    match guard_outcome(status) {
        GuardOutcome::Render => render(),
        GuardOutcome::Fallback => fallback(),
        GuardOutcome::RedirectToLogin => {
            navigator.navigate(LOGIN_PATH);
            fallback()
        }
    }
}

#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let (auth, _) = use_auth();
    let outcome = create_memo(move |_| guard_outcome(auth.get().status));
    create_effect(move |_| {
        if outcome.get() == GuardOutcome::RedirectToLogin {
            redirect_to_login();
        }
    });
    view! {
        <Show
            when=move || outcome.get() == GuardOutcome::Render
            fallback=|| view! { <LoadingSpinner /> }
        >
            {children()}
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::RecordingNavigator;

    #[test]
    fn guard_outcome_covers_every_status() {
        assert_eq!(guard_outcome(AuthStatus::Loading), GuardOutcome::Fallback);
        assert_eq!(guard_outcome(AuthStatus::Authenticated), GuardOutcome::Render);
        assert_eq!(
            guard_outcome(AuthStatus::Unauthenticated),
            GuardOutcome::RedirectToLogin
        );
        assert_eq!(
            guard_outcome(AuthStatus::Error),
            GuardOutcome::RedirectToLogin
        );
    }

    #[test]
    fn guard_renders_content_only_when_authenticated() {
        let navigator = RecordingNavigator::default();
        let pick = |status| guard(status, || "content", || "fallback", &navigator);

        assert_eq!(pick(AuthStatus::Loading), "fallback");
        assert!(navigator.visited().is_empty());
        assert_eq!(pick(AuthStatus::Authenticated), "content");
        assert!(navigator.visited().is_empty());
    }

    #[test]
    fn guard_redirects_signed_out_and_failed_sessions() {
        let navigator = RecordingNavigator::default();
        assert_eq!(
            guard(
                AuthStatus::Unauthenticated,
                || "content",
                || "fallback",
                &navigator
            ),
            "fallback"
        );
        assert_eq!(
            guard(AuthStatus::Error, || "content", || "fallback", &navigator),
            "fallback"
        );
        assert_eq!(navigator.visited(), vec!["/user/login", "/user/login"]);
    }
}
