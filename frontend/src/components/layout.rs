use leptos::*;

#[component]
pub fn LoadingSpinner() -> impl IntoView {
    view! {
        <div class="flex justify-center items-center p-8" role="status" aria-label="Loading">
            <div class="animate-spin rounded-full h-8 w-8 border-b-2 border-action-primary-bg"></div>
        </div>
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::ssr::render_to_string;

    #[test]
    fn loading_spinner_is_announced_to_assistive_tech() {
        let html = render_to_string(|| view! { <LoadingSpinner /> });
        assert!(html.contains("animate-spin"));
        assert!(html.contains("role=\"status\""));
    }
}
