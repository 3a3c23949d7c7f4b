pub mod api;
pub mod components;
pub mod config;
pub mod logging;
pub mod pages;
pub mod state;
pub mod utils;

#[cfg(test)]
mod test_support;

/// Mounts a single board behind the sign-in guard.
#[cfg(target_arch = "wasm32")]
pub fn start(board_id: &str) {
    use leptos::*;

    logging::init();
    let services = state::AppServices::from_config(config::init());
    let board_id = board_id.to_string();
    log::info!("Starting dashboard frontend for board {}", board_id);

    mount_to_body(move || {
        services.provide();
        let board_id = board_id.clone();
        view! {
            <state::AuthProvider>
                <components::guard::RequireAuth>
                    <pages::BoardPage board_id=board_id.clone() />
                </components::guard::RequireAuth>
            </state::AuthProvider>
        }
    });
}
