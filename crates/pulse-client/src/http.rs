//! Shared HTTP response helpers.
//!
//! Centralizes status-code checks so resource modules stay focused on request
//! construction. Error bodies follow the Django REST Framework shape, so the
//! human-readable message is pulled out of `detail`, `non_field_errors`, or the
//! per-field error lists.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// Check an HTTP response for error statuses.
///
/// Returns the response unchanged on success. Handles:
/// - **401 / 403** → [`ApiError::Unauthorized`]
/// - **404** → [`ApiError::NotFound`]
/// - **other non-success** → [`ApiError::Api`] with the extracted message
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = extract_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });
    tracing::debug!(status = status.as_u16(), %message, "request rejected");

    Err(match status.as_u16() {
        401 | 403 => ApiError::Unauthorized {
            status: status.as_u16(),
            message,
        },
        404 => ApiError::NotFound(message),
        code => ApiError::Api {
            status: code,
            message,
        },
    })
}

/// Check the response and decode its JSON body.
pub async fn json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    let resp = check_response(resp).await?;
    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
}

/// Check the response and discard its body (204, `{detail}` acknowledgements).
pub async fn empty(resp: reqwest::Response) -> Result<(), ApiError> {
    check_response(resp).await.map(drop)
}

/// Pull a readable message out of an error body.
///
/// Tries, in order: a bare JSON string, `non_field_errors` joined, `detail`,
/// then `field: messages` for each remaining field. Non-JSON bodies are
/// returned trimmed unless empty or HTML.
#[must_use]
pub fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let Ok(value) = serde_json::from_str::<Value>(trimmed) else {
        return (!trimmed.starts_with('<')).then(|| trimmed.to_string());
    };

    match value {
        Value::String(text) => Some(text),
        Value::Array(items) => join_messages(&items),
        Value::Object(map) => {
            if let Some(joined) = map
                .get("non_field_errors")
                .and_then(Value::as_array)
                .and_then(|items| join_messages(items))
            {
                return Some(joined);
            }
            if let Some(detail) = map.get("detail").and_then(Value::as_str) {
                return Some(detail.to_string());
            }
            let parts: Vec<String> = map
                .iter()
                .filter_map(|(field, errors)| {
                    let text = match errors {
                        Value::String(text) => Some(text.clone()),
                        Value::Array(items) => join_messages(items),
                        _ => None,
                    }?;
                    Some(format!("{field}: {text}"))
                })
                .collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => None,
    }
}

fn join_messages(items: &[Value]) -> Option<String> {
    let texts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
    (!texts.is_empty()).then(|| texts.join(" "))
}
