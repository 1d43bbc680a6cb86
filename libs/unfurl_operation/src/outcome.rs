use std::fmt::Display;

use http::StatusCode;
use http::header::{CONTENT_TYPE, HeaderValue};
use serde_json::{Value, json};
use unfurl::body::error_body;

#[derive(Debug, Clone, PartialEq)]
/// The result of an operation: an HTTP status and, optionally, a JSON resource.
pub struct Outcome {
    status: StatusCode,
    resource: Option<Value>,
}

impl Outcome {
    /// Build an outcome from a raw status code.
    ///
    /// When `status` is `None`, it defaults to `200 OK` if there is a resource
    /// and to `204 No Content` otherwise.
    /// It fails if `status` is not a known HTTP status code.
    pub fn new(
        status: Option<u16>,
        resource: Option<Value>,
    ) -> Result<Self, InvalidStatusError> {
        let status = match status {
            Some(code) => StatusCode::from_u16(code)
                .ok()
                .filter(|s| s.canonical_reason().is_some())
                .ok_or(InvalidStatusError { status: code })?,
            None if resource.is_some() => StatusCode::OK,
            None => StatusCode::NO_CONTENT,
        };
        Ok(Self { status, resource })
    }

    pub fn with_status(status: StatusCode, resource: Option<Value>) -> Self {
        Self { status, resource }
    }

    /// `200 OK`, with `resource` as body.
    pub fn ok(resource: Value) -> Self {
        Self::with_status(StatusCode::OK, Some(resource))
    }

    /// `204 No Content`.
    pub fn no_content() -> Self {
        Self::with_status(StatusCode::NO_CONTENT, None)
    }

    /// An error outcome, with a body built by [`error_body`].
    pub fn error(
        status: StatusCode,
        error_type: &str,
        error_message: impl Display,
        meta: Value,
    ) -> Self {
        Self::with_status(status, Some(error_body(error_type, error_message, meta)))
    }

    /// `404 Not Found`.
    pub fn not_found() -> Self {
        Self::error(
            StatusCode::NOT_FOUND,
            "not_found",
            "The requested resource could not be found",
            json!({}),
        )
    }

    /// `403 Forbidden`.
    pub fn forbidden() -> Self {
        Self::error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "You are not authorized to access the requested resource",
            json!({}),
        )
    }

    /// `500 Internal Server Error`, without any detail.
    pub fn internal_server_error() -> Self {
        Self::error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_server_error",
            "There was an error processing your request",
            json!({}),
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn resource(&self) -> Option<&Value> {
        self.resource.as_ref()
    }

    pub fn into_resource(self) -> Option<Value> {
        self.resource
    }

    /// `true` for `2xx` statuses.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Convert the outcome into an HTTP response.
    ///
    /// The resource, if any, is serialized as JSON.
    pub fn into_response(self) -> http::Response<String> {
        let Some(resource) = self.resource else {
            let mut response = http::Response::new(String::new());
            *response.status_mut() = self.status;
            return response;
        };
        let mut response = http::Response::new(resource.to_string());
        *response.status_mut() = self.status;
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{status} is not a valid HTTP status code")]
/// The error returned by [`Outcome::new`] for unknown status codes.
pub struct InvalidStatusError {
    status: u16,
}

impl InvalidStatusError {
    /// The offending status code.
    pub fn status(&self) -> u16 {
        self.status
    }
}
