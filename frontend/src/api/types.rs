use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Backend ids arrive either as strings (UUIDs) or as integers depending on
/// the resource; both are normalized to strings.
pub(crate) fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

pub(crate) fn optional_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login payload. The backend has shipped both the short (`access`) and the
/// long (`access_token`) field names, so both are accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub access_token_expires_in: Option<i64>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "optional_id_string")]
    pub organization_id: Option<String>,
    #[serde(default, deserialize_with = "optional_id_string")]
    pub organization: Option<String>,
    #[serde(default)]
    pub organization_name: Option<String>,
}

impl LoginResponse {
    pub fn access(&self) -> Option<&str> {
        non_empty(self.access.as_deref()).or_else(|| non_empty(self.access_token.as_deref()))
    }

    pub fn refresh(&self) -> Option<&str> {
        non_empty(self.refresh.as_deref()).or_else(|| non_empty(self.refresh_token.as_deref()))
    }

    pub fn expires_in(&self) -> Option<i64> {
        self.access_token_expires_in.or(self.expires_in)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshResponse {
    #[serde(default)]
    pub access: Option<String>,
    #[serde(default)]
    pub refresh: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub error: Option<Value>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub title: String,
    #[serde(default, rename = "createdAt", alias = "created_at")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardList {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(
        default,
        rename = "boardId",
        alias = "board_id",
        deserialize_with = "optional_id_string"
    )]
    pub board_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(
        default,
        rename = "listId",
        alias = "list_id",
        deserialize_with = "optional_id_string"
    )]
    pub list_id: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub order: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateBoardRequest {
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateListRequest {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReorderListRequest {
    pub order: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderCardRequest {
    pub list_id: String,
    pub order: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCardRequest {
    pub source_list_id: String,
    pub dest_list_id: String,
    pub order: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationUser {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Body of a successful authorized call.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub fn into_json(self) -> Result<Value, ApiError> {
        match self {
            ResponseBody::Json(value) => Ok(value),
            ResponseBody::Text(text) if text.trim().is_empty() => Ok(Value::Null),
            ResponseBody::Text(text) => Err(ApiError::Decode(format!(
                "expected JSON response, got text: {}",
                truncate(&text, 120)
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("HTTP error! status: {status}")]
    Http { status: u16, body: String },
    #[error("Request failed: {0}")]
    Network(String),
    #[error("Failed to parse response: {0}")]
    Decode(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("No access token available")]
    Unauthenticated,
    #[error("Session expired, please sign in again")]
    SessionExpired,
}

impl ApiError {
    pub fn network(msg: impl Into<String>) -> Self {
        ApiError::Network(msg.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Http { status: 401, .. } => "UNAUTHORIZED",
            ApiError::Http { status: 403, .. } => "FORBIDDEN",
            ApiError::Http { status: 404, .. } => "NOT_FOUND",
            ApiError::Http { .. } => "HTTP_ERROR",
            ApiError::Network(_) => "REQUEST_FAILED",
            ApiError::Decode(_) => "DECODE_ERROR",
            ApiError::InvalidRequest(_) => "INVALID_REQUEST",
            ApiError::Unauthenticated => "UNAUTHENTICATED",
            ApiError::SessionExpired => "SESSION_EXPIRED",
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message suitable for a toast: the backend's own `message`, `detail` or
    /// `error` field when the error body carries one.
    pub fn user_message(&self) -> String {
        if let ApiError::Http { body, .. } = self {
            if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
                for key in ["message", "detail", "error"] {
                    if let Some(Value::String(msg)) = map.get(key) {
                        return msg.clone();
                    }
                }
            }
        }
        self.to_string()
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(max).collect();
        out.push('…');
        out
    }
}
