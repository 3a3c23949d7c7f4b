use reqwest::{
    header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Body, Method, Request, Url,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::rc::Rc;

use super::{
    transport::{HttpTransport, RawResponse},
    types::{ApiError, ResponseBody},
};
use crate::{
    config::{normalize_base_url, RuntimeConfig},
    state::session::Session,
    state::session_manager::SessionManager,
};

/// Request helper for every authorized backend call.
///
/// Each call resolves the current session, renews the access token when it
/// is about to expire and attaches it as a bearer credential. A `401` answer
/// triggers one forced refresh and one replay of the request; nothing else is
/// retried.
#[derive(Clone)]
pub struct ApiClient {
    transport: Rc<dyn HttpTransport>,
    base_url: String,
    sessions: SessionManager,
}

impl ApiClient {
    pub fn new(
        config: &RuntimeConfig,
        transport: Rc<dyn HttpTransport>,
        sessions: SessionManager,
    ) -> Self {
        Self::new_with_base_url(config.api_base_url.clone(), transport, sessions)
    }

    pub fn new_with_base_url(
        base_url: impl Into<String>,
        transport: Rc<dyn HttpTransport>,
        sessions: SessionManager,
    ) -> Self {
        Self {
            transport,
            base_url: normalize_base_url(&base_url.into()),
            sessions,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub async fn get(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<ResponseBody, ApiError> {
        self.send_with_refresh(Method::GET, endpoint, None, params)
            .await
    }

    pub async fn post<B>(
        &self,
        endpoint: &str,
        body: Option<&B>,
        params: &[(&str, &str)],
    ) -> Result<ResponseBody, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let body = body.map(encode_body).transpose()?;
        self.send_with_refresh(Method::POST, endpoint, body, params)
            .await
    }

    pub async fn put<B>(
        &self,
        endpoint: &str,
        body: Option<&B>,
        params: &[(&str, &str)],
    ) -> Result<ResponseBody, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let body = body.map(encode_body).transpose()?;
        self.send_with_refresh(Method::PUT, endpoint, body, params)
            .await
    }

    pub async fn delete(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<ResponseBody, ApiError> {
        self.send_with_refresh(Method::DELETE, endpoint, None, params)
            .await
    }

    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        decode_json(self.get(endpoint, &[]).await?)
    }

    pub async fn post_json<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        decode_json(self.post(endpoint, Some(body), &[]).await?)
    }

    async fn authorized_session(&self) -> Result<Session, ApiError> {
        let session = self.sessions.current().ok_or(ApiError::Unauthenticated)?;
        let session = self.sessions.ensure_fresh_token(session).await;
        if session.error.is_some() {
            return Err(ApiError::SessionExpired);
        }
        Ok(session)
    }

    async fn send_with_refresh(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Vec<u8>>,
        params: &[(&str, &str)],
    ) -> Result<ResponseBody, ApiError> {
        let url = build_url(&self.base_url, endpoint, params)?;
        let session = self.authorized_session().await?;

        let request = json_request(
            method.clone(),
            url.clone(),
            body.clone(),
            Some(&session.access_token),
        )?;
        let response = self.transport.execute(request).await?;
        if response.status != 401 {
            return decode_response(response);
        }

        log::warn!(
            "{} {} returned 401, forcing an access token refresh",
            method,
            url.path()
        );
        let renewed = self.sessions.force_refresh(session).await;
        if renewed.error.is_some() {
            return decode_response(response);
        }
        let retry = json_request(method, url, body, Some(&renewed.access_token))?;
        decode_response(self.transport.execute(retry).await?)
    }
}

pub(crate) fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<Vec<u8>, ApiError> {
    serde_json::to_vec(body)
        .map_err(|e| ApiError::InvalidRequest(format!("Failed to encode body: {}", e)))
}

pub(crate) fn build_url(
    base_url: &str,
    endpoint: &str,
    params: &[(&str, &str)],
) -> Result<Url, ApiError> {
    let raw = if endpoint.starts_with('/') {
        format!("{}{}", base_url, endpoint)
    } else {
        format!("{}/{}", base_url, endpoint)
    };
    let mut url = Url::parse(&raw)
        .map_err(|e| ApiError::InvalidRequest(format!("Invalid URL {}: {}", raw, e)))?;
    if !params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in params {
            pairs.append_pair(key, value);
        }
    }
    Ok(url)
}

pub(crate) fn json_request(
    method: Method,
    url: Url,
    body: Option<Vec<u8>>,
    bearer: Option<&str>,
) -> Result<Request, ApiError> {
    let mut request = Request::new(method, url);
    let headers = request.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Some(token) = bearer {
        let value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ApiError::InvalidRequest("Invalid token format".into()))?;
        headers.insert(AUTHORIZATION, value);
    }
    if let Some(bytes) = body {
        *request.body_mut() = Some(Body::from(bytes));
    }
    Ok(request)
}

pub(crate) fn decode_response(response: RawResponse) -> Result<ResponseBody, ApiError> {
    if !response.is_success() {
        log::debug!("Backend answered {}: {}", response.status, response.body);
        return Err(ApiError::Http {
            status: response.status,
            body: response.body,
        });
    }
    if response.is_json() {
        if response.body.trim().is_empty() {
            return Ok(ResponseBody::Json(Value::Null));
        }
        return response.json().map(ResponseBody::Json);
    }
    Ok(ResponseBody::Text(response.body))
}

pub(crate) fn decode_json<T: DeserializeOwned>(body: ResponseBody) -> Result<T, ApiError> {
    serde_json::from_value(body.into_json()?).map_err(|e| ApiError::Decode(e.to_string()))
}
