use reqwest::Method;
use std::rc::Rc;

use super::{
    client::{build_url, encode_body, json_request},
    transport::{HttpTransport, RawResponse},
    types::{ApiError, LoginRequest, LoginResponse, RefreshRequest, RefreshResponse},
};
use crate::config::normalize_base_url;

pub const LOGIN_ENDPOINT: &str = "/api/v1/auth/login/";
pub const TOKEN_REFRESH_ENDPOINT: &str = "/api/v1/auth/token/refresh/";

/// The two unauthenticated endpoints that mint credentials. Kept apart from
/// `ApiClient` because the client itself depends on the session they produce.
#[derive(Clone)]
pub struct AuthApi {
    transport: Rc<dyn HttpTransport>,
    base_url: String,
}

impl AuthApi {
    pub fn new(base_url: impl Into<String>, transport: Rc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            base_url: normalize_base_url(&base_url.into()),
        }
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let response = self.post(LOGIN_ENDPOINT, request).await?;
        if !response.is_success() {
            return Err(ApiError::Http {
                status: response.status,
                body: response.body,
            });
        }
        response.json()
    }

    pub async fn refresh(&self, request: &RefreshRequest) -> Result<RefreshResponse, ApiError> {
        let response = self.post(TOKEN_REFRESH_ENDPOINT, request).await?;
        if !response.is_success() {
            return Err(ApiError::Http {
                status: response.status,
                body: response.body,
            });
        }
        response.json()
    }

    async fn post<B: serde::Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<RawResponse, ApiError> {
        let url = build_url(&self.base_url, endpoint, &[])?;
        let request = json_request(Method::POST, url, Some(encode_body(body)?), None)?;
        self.transport.execute(request).await
    }
}
