//! Response shaping.
//!
//! A deployment picks one [`ResponseShape`]; handlers produce a
//! `Result<Success<T>, ApiError>` and let the shape turn it into a response.

use std::fmt;
use std::str::FromStr;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseShape {
    /// Bare entity on success, `{status, message}` on failure.
    #[default]
    Direct,
    /// `{status, message, data: {data}}` for every response.
    Enveloped,
}

/// Outer body of the enveloped shape
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: u16,
    pub message: String,
    pub data: EnvelopeData<T>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EnvelopeData<T> {
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, payload: T) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
            data: EnvelopeData { data: payload },
        }
    }
}

/// Body of a successful delete in the direct shape
#[derive(Debug, Serialize, Deserialize)]
pub struct Confirmation {
    pub message: String,
}

/// A successful result together with how each shape should present it.
pub struct Success<T> {
    pub status: StatusCode,
    /// Indication used by the enveloped shape.
    pub message: &'static str,
    pub body: T,
}

impl<T> Success<T> {
    pub fn ok(body: T) -> Self {
        Self { status: StatusCode::OK, message: "success", body }
    }

    pub fn created(body: T) -> Self {
        Self { status: StatusCode::CREATED, message: "success", body }
    }

    pub fn with_message(mut self, message: &'static str) -> Self {
        self.message = message;
        self
    }
}

impl ResponseShape {
    pub fn respond<T: Serialize>(self, result: Result<Success<T>, ApiError>) -> Response {
        match result {
            Ok(success) => self.success(success),
            Err(err) => self.failure(err),
        }
    }

    pub fn success<T: Serialize>(self, success: Success<T>) -> Response {
        match self {
            ResponseShape::Direct => (success.status, Json(success.body)).into_response(),
            ResponseShape::Enveloped => (
                success.status,
                Json(Envelope::new(success.status, success.message, success.body)),
            )
                .into_response(),
        }
    }

    /// Success that only carries a confirmation message.
    pub fn confirmation(self, message: &str) -> Response {
        match self {
            ResponseShape::Direct => self.success(Success::ok(Confirmation {
                message: message.to_string(),
            })),
            ResponseShape::Enveloped => self.success(Success::ok(message)),
        }
    }

    pub fn failure(self, err: ApiError) -> Response {
        match self {
            ResponseShape::Direct => err.into_response(),
            ResponseShape::Enveloped => {
                let status = err.status();
                err.log();
                (status, Json(Envelope::new(status, "error", err.to_string()))).into_response()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown response shape '{0}' (expected 'direct' or 'enveloped')")]
pub struct UnknownResponseShape(pub String);

impl FromStr for ResponseShape {
    type Err = UnknownResponseShape;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" | "plain" => Ok(ResponseShape::Direct),
            "enveloped" | "envelope" => Ok(ResponseShape::Enveloped),
            _ => Err(UnknownResponseShape(s.to_string())),
        }
    }
}

impl fmt::Display for ResponseShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseShape::Direct => f.write_str("direct"),
            ResponseShape::Enveloped => f.write_str("enveloped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;
    use serde_json::{json, Value};

    use super::*;

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn parses_shape_names() {
        assert_eq!("direct".parse::<ResponseShape>(), Ok(ResponseShape::Direct));
        assert_eq!(" Enveloped ".parse::<ResponseShape>(), Ok(ResponseShape::Enveloped));
        assert!("xml".parse::<ResponseShape>().is_err());
    }

    #[tokio::test]
    async fn direct_shape_returns_bare_body() {
        let response = ResponseShape::Direct.success(Success::created(json!({"name": "Pele"})));
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await, json!({"name": "Pele"}));
    }

    #[tokio::test]
    async fn direct_shape_errors_carry_status_and_message() {
        let response = ResponseShape::Direct.failure(ApiError::player_not_found());
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({"status": 404, "message": "Player with specified ID not found!"})
        );
    }

    #[tokio::test]
    async fn enveloped_shape_double_nests_payload() {
        let response = ResponseShape::Enveloped
            .success(Success::ok(vec![json!({"name": "Pele"})]).with_message("players"));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"status": 200, "message": "players", "data": {"data": [{"name": "Pele"}]}})
        );
    }

    #[tokio::test]
    async fn confirmation_depends_on_shape() {
        let direct = ResponseShape::Direct.confirmation("done");
        assert_eq!(body_json(direct).await, json!({"message": "done"}));

        let enveloped = ResponseShape::Enveloped.confirmation("done");
        assert_eq!(
            body_json(enveloped).await,
            json!({"status": 200, "message": "success", "data": {"data": "done"}})
        );
    }

    #[tokio::test]
    async fn enveloped_shape_wraps_errors() {
        let response = ResponseShape::Enveloped.failure(ApiError::MalformedInput("bad json".into()));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"status": 400, "message": "error", "data": {"data": "bad json"}})
        );
    }
}
