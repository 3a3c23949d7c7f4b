pub mod auth;
mod boards;
pub mod client;
mod organization;
pub mod transport;
pub mod types;

pub use auth::AuthApi;
pub use client::*;
pub use transport::{HttpTransport, RawResponse, ReqwestTransport};
pub use types::*;

#[cfg(all(test, not(target_arch = "wasm32")))]
pub mod test_support;
