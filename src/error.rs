use std::any::Any;

use axum::{
    body::Body,
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde::Serialize;
use tower_http::catch_panic::ResponseForPanic;

const GENERIC_MESSAGE: &str = "Something went wrong!";

pub trait ResponseError: std::error::Error + Send + Sync {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Whether fallback responses carry the cause chain of the failure.
#[derive(Clone, Copy, Debug, Default)]
pub struct ErrorDetails(pub bool);

/// Failure that escaped the form handlers, rendered with the fallback body.
#[derive(Debug)]
pub struct Error {
    reason: Box<dyn ResponseError>,
    expose_details: bool,
}

impl<T: ResponseError + 'static> From<T> for Error {
    fn from(e: T) -> Self {
        Error {
            reason: Box::new(e),
            expose_details: false,
        }
    }
}

impl Error {
    pub fn with_details(mut self, details: ErrorDetails) -> Self {
        self.expose_details = details.0;
        self
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.reason.status_code();
        let errors = {
            let mut errors = vec![self.reason.to_string()];

            let mut current = self.reason.source();
            while let Some(reason) = current {
                errors.push(format!("{}", reason));
                current = reason.source();
            }
            // Transparent wrappers repeat their source's message.
            errors.dedup();

            errors
        };

        tracing::error!(errors = ?errors, status_code = %status_code, "response failed");

        let message = errors[0].clone();
        let stack = self.expose_details.then(|| errors.join("\n    caused by: "));

        fallback_response(status_code, message, stack)
    }
}

#[derive(Serialize)]
struct FallbackBody {
    success: bool,
    status: u16,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    stack: Option<String>,
}

fn fallback_response(status_code: StatusCode, message: String, stack: Option<String>) -> Response {
    let message = if message.is_empty() {
        GENERIC_MESSAGE.to_string()
    } else {
        message
    };

    (
        status_code,
        Json(FallbackBody {
            success: false,
            status: status_code.as_u16(),
            message,
            stack,
        }),
    )
        .into_response()
}

/// Renders a handler panic with the fallback body.
#[derive(Clone, Copy, Debug, Default)]
pub struct PanicResponse {
    details: ErrorDetails,
}

impl PanicResponse {
    pub fn new(details: ErrorDetails) -> Self {
        PanicResponse { details }
    }
}

impl ResponseForPanic for PanicResponse {
    type ResponseBody = Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> Response<Body> {
        let payload = if let Some(s) = err.downcast_ref::<String>() {
            Some(s.clone())
        } else {
            err.downcast_ref::<&str>().map(|s| s.to_string())
        };

        tracing::error!(panic = ?payload, "request handler panicked");

        let stack = payload.filter(|_| self.details.0);
        fallback_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            GENERIC_MESSAGE.to_string(),
            stack,
        )
    }
}
