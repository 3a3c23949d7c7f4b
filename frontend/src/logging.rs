/// Installs the panic hook and routes the `log` facade to the browser console.
/// Native hosts bring their own logger.
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Debug).is_err() {
            web_sys::console::warn_1(&"console logger already installed".into());
        }
    }
}

pub fn mask_secret(s: &str) -> String {
    if s.is_empty() {
        return "<empty>".into();
    }
    let prefix = s.chars().take(4).collect::<String>();
    format!("{}*** (len={})", prefix, s.len())
}

#[cfg(test)]
mod tests {
    use super::mask_secret;

    #[test]
    fn mask_secret_keeps_prefix_and_length_only() {
        assert_eq!(mask_secret(""), "<empty>");
        assert_eq!(mask_secret("abcdefgh"), "abcd*** (len=8)");
        assert_eq!(mask_secret("ab"), "ab*** (len=2)");
    }
}
