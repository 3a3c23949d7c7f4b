pub const LOGIN_PATH: &str = "/user/login";

pub trait Navigator {
    fn navigate(&self, path: &str);
}

/// Navigates by assigning `window.location`, skipping the assignment when the
/// browser is already on the requested path.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn navigate(&self, path: &str) {
        set_location(path);
    }
}

#[cfg(target_arch = "wasm32")]
fn set_location(path: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let location = window.location();
    if let Ok(pathname) = location.pathname() {
        if pathname == path {
            return;
        }
    }
    if location.set_href(path).is_err() {
        log::warn!("Failed to navigate to {path}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn set_location(path: &str) {
    log::debug!("Navigation to {path} requested outside the browser");
}

pub fn redirect_to_login() {
    BrowserNavigator.navigate(LOGIN_PATH);
}
