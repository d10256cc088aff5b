use reqwest::{Response, StatusCode};
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// How much of an undecodable error body is kept in the error message.
const ERROR_BODY_PREVIEW_LENGTH: usize = 512;

/// An error returned by the Spotify Web API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Error)]
#[error("{message}")]
pub struct ApiError {
    /// A short description of the error.
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    /// The HTTP status code.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: u16,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub error: ApiError,
}

// a missing or null field is left at its zero value so the empty message fallback can take over
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reads a response's body. Returns early with [Error::Cancelled] if the token is cancelled before the whole body
/// has arrived.
pub(crate) async fn read_body(cancel: &CancellationToken, response: Response) -> Result<Vec<u8>> {
    tokio::select! {
        biased;

        _ = cancel.cancelled() => Err(Error::Cancelled),
        body = response.bytes() => Ok(body?.to_vec()),
    }
}

/// Reads the body of an unsuccessful response and turns it into an error.
pub(crate) async fn decode_error_response(cancel: &CancellationToken, response: Response) -> Error {
    let status = response.status();

    match read_body(cancel, response).await {
        Ok(body) => decode_error_body(status, &body).into(),
        Err(e) => e,
    }
}

/// Decodes an error from an unsuccessful response's status and body.
pub(crate) fn decode_error_body(status: StatusCode, body: &[u8]) -> ApiError {
    let reason = status.canonical_reason().unwrap_or("Unknown Status");

    if body.is_empty() {
        return ApiError {
            message: format!("HTTP {} {} (body empty)", status.as_u16(), reason),
            status: status.as_u16(),
        };
    }

    let mut error = match serde_json::from_slice::<ApiErrorResponse>(body) {
        Ok(response) => response.error,
        Err(_) => {
            let preview = &body[..body.len().min(ERROR_BODY_PREVIEW_LENGTH)];

            return ApiError {
                message: format!(
                    "couldn't decode error response ({} bytes): [{}]",
                    body.len(),
                    String::from_utf8_lossy(preview)
                ),
                status: status.as_u16(),
            };
        }
    };

    if error.status == 0 {
        error.status = status.as_u16();
    }

    // some failures come back with a useful status but an empty message, for example when the query string grows too
    // long. the caller only looks at the message so give them something to work with
    if error.message.is_empty() {
        error.message = format!("unexpected HTTP {} {} (empty error)", status.as_u16(), reason);
    }

    error
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_error_envelope() {
        let error = decode_error_body(
            StatusCode::NOT_FOUND,
            br#"{"error":{"message":"not found","status":404}}"#,
        );

        assert_eq!(
            error,
            ApiError {
                message: "not found".to_owned(),
                status: 404
            }
        );
    }

    #[test]
    fn empty_body_uses_reason_phrase() {
        let error = decode_error_body(StatusCode::NOT_FOUND, b"");

        assert_eq!(error.status, 404);
        assert!(error.message.contains("404"));
        assert!(error.message.contains("Not Found"));
    }

    #[test]
    fn empty_message_uses_reason_phrase() {
        let error = decode_error_body(StatusCode::URI_TOO_LONG, br#"{"error":{"message":"","status":414}}"#);

        assert_eq!(error.status, 414);
        assert!(error.message.contains("414"));
        assert!(error.message.contains("URI Too Long"));
    }

    #[test]
    fn null_message_uses_reason_phrase() {
        let error = decode_error_body(StatusCode::URI_TOO_LONG, br#"{"error":{"message":null,"status":414}}"#);

        assert_eq!(error.status, 414);
        assert_eq!(error.message, "unexpected HTTP 414 URI Too Long (empty error)");
    }

    #[test]
    fn envelope_without_error_object_uses_reason_phrase() {
        for body in [&br#"{}"#[..], br#"{"error":null}"#, br#"{"reason":"too long"}"#] {
            let error = decode_error_body(StatusCode::URI_TOO_LONG, body);

            assert_eq!(error.status, 414);
            assert_eq!(
                error.message, "unexpected HTTP 414 URI Too Long (empty error)",
                "body: {}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn missing_envelope_status_falls_back_to_response_status() {
        let error = decode_error_body(StatusCode::BAD_REQUEST, br#"{"error":{"message":"invalid id"}}"#);

        assert_eq!(error.status, 400);
        assert_eq!(error.message, "invalid id");
    }

    #[test]
    fn undecodable_body_is_embedded_in_message() {
        let error = decode_error_body(StatusCode::BAD_GATEWAY, b"<html>upstream</html>");

        assert_eq!(error.status, 502);
        assert!(error.message.contains("(21 bytes)"));
        assert!(error.message.contains("<html>upstream</html>"));
    }

    #[test]
    fn undecodable_body_preview_is_bounded() {
        let body = vec![b'x'; ERROR_BODY_PREVIEW_LENGTH * 4];
        let error = decode_error_body(StatusCode::INTERNAL_SERVER_ERROR, &body);

        assert!(error.message.contains(&format!("({} bytes)", body.len())));
        assert!(error.message.len() < ERROR_BODY_PREVIEW_LENGTH + 100);
    }
}
