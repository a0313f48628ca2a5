use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::store::RepositoryError;

/// Successful resource outcome: an HTTP status plus an optional payload and message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceResponse<T> {
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ResourceResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status_code: StatusCode::OK.as_u16(),
            data: Some(data),
            message: None,
        }
    }

    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self {
            status_code: StatusCode::CREATED.as_u16(),
            data: Some(data),
            message: Some(message.into()),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ResourceResponse<()> {
    pub fn confirmed(message: impl Into<String>) -> Self {
        Self {
            status_code: StatusCode::OK.as_u16(),
            data: None,
            message: Some(message.into()),
        }
    }
}

impl<T: Serialize> IntoResponse for ResourceResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

/// Vote acknowledgement with the receipt fields flattened next to the message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoteResponse<T> {
    pub status_code: u16,
    pub message: &'static str,
    #[serde(flatten)]
    pub receipt: T,
}

impl<T> VoteResponse<T> {
    pub fn ok(message: &'static str, receipt: T) -> Self {
        Self {
            status_code: StatusCode::OK.as_u16(),
            message,
            receipt,
        }
    }
}

impl<T: Serialize> IntoResponse for VoteResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Every way a resource operation can refuse a request.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("Invalid JSON format.")]
    MalformedBody,
    #[error("{label} is required.")]
    MissingField {
        label: &'static str,
        field: &'static str,
    },
    #[error("Invalid value for {field}.")]
    InvalidField { field: &'static str },
    #[error("{0} not found.")]
    NotFound(&'static str),
    /// A body referenced another entity that does not exist.
    #[error("{0} not found.")]
    UnknownReference(&'static str),
    #[error("You didn't select a valid choice.")]
    InvalidChoice,
    #[error("Votes cannot be negative.")]
    VoteFloor,
    #[error("Vote limit reached for this choice.")]
    VoteCeiling,
    #[error("Not found.")]
    UnknownRoute,
    #[error("Method not allowed.")]
    MethodNotAllowed,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ResourceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ResourceError::NotFound(_) | ResourceError::UnknownRoute => StatusCode::NOT_FOUND,
            ResourceError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ResourceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ResourceError::MalformedBody
            | ResourceError::MissingField { .. }
            | ResourceError::InvalidField { .. }
            | ResourceError::UnknownReference(_)
            | ResourceError::InvalidChoice
            | ResourceError::VoteFloor => StatusCode::BAD_REQUEST,
            ResourceError::VoteCeiling => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for ResourceError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ResourceError::Repository(err) = &self {
            tracing::error!(error = %err, "poll store failure");
        }

        let payload = match &self {
            ResourceError::VoteFloor => json!({
                "status_code": status.as_u16(),
                "message": self.to_string(),
            }),
            ResourceError::MissingField { field, .. } | ResourceError::InvalidField { field } => {
                json!({
                    "status_code": status.as_u16(),
                    "error": self.to_string(),
                    "field": field,
                })
            }
            _ => json!({
                "status_code": status.as_u16(),
                "error": self.to_string(),
            }),
        };

        (status, Json(payload)).into_response()
    }
}
