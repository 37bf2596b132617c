//! JSON response helpers.
//!
//! # Responsibilities
//! - Serialize handler payloads with `Content-Type: application/json`
//! - Build `{"error", "message"}` bodies from a status and a message
//! - Fall back to a plain-text 500 when serialization fails
//! - Carry per-request diagnostics (`RequestNote`) to the access log
//!
//! # Design Decisions
//! - The body is fully serialized before any response is built, so a
//!   failure can never leave a partial JSON body
//! - The fallback is produced exactly once; it never retries JSON

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Plain-text body sent when a JSON body cannot be produced.
pub const FALLBACK_BODY: &str = "Internal Server Error";

/// Diagnostics a handler attaches to its response for the access log and
/// request span. Never serialized to the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestNote {
    pub item_id: Option<String>,
    pub error: Option<String>,
}

impl RequestNote {
    pub fn item(id: impl Into<String>) -> Self {
        Self {
            item_id: Some(id.into()),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            item_id: None,
            error: Some(message.into()),
        }
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    /// Attach to a response. Fields set here win over a note already present.
    pub fn attach(self, mut response: Response) -> Response {
        let merged = match response.extensions_mut().remove::<RequestNote>() {
            Some(existing) => RequestNote {
                item_id: self.item_id.or(existing.item_id),
                error: self.error.or(existing.error),
            },
            None => self,
        };
        response.extensions_mut().insert(merged);
        response
    }
}

/// Failure to produce a response body.
#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("failed to serialize response body: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl IntoResponse for ResponseError {
    fn into_response(self) -> Response {
        let response = (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=utf-8"),
            )],
            FALLBACK_BODY,
        )
            .into_response();
        RequestNote::error(self.to_string()).attach(response)
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: &'a str,
}

/// Serialize `value` as the body of a `status` response.
///
/// On failure the error is logged and returned; its `IntoResponse` impl is
/// the plain-text 500 fallback.
pub fn write_json<T>(status: StatusCode, value: &T) -> Result<Response, ResponseError>
where
    T: Serialize + ?Sized,
{
    let body = serde_json::to_vec(value).map_err(|e| {
        tracing::error!(
            error = %e,
            status = status.as_u16(),
            "Failed to marshal JSON response"
        );
        ResponseError::from(e)
    })?;

    Ok((
        status,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )],
        body,
    )
        .into_response())
}

/// Build an error response whose `error` field is the reason phrase of
/// `status`.
pub fn write_error(status: StatusCode, message: &str) -> Response {
    let body = ErrorBody {
        error: status.canonical_reason().unwrap_or("Unknown Status"),
        message,
    };

    match write_json(status, &body) {
        Ok(response) => RequestNote::error(message).attach(response),
        Err(e) => {
            tracing::error!(
                status = status.as_u16(),
                original_message = message,
                "Failed to marshal error response, using plain text fallback"
            );
            e.into_response()
        }
    }
}
