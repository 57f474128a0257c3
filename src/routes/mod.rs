pub mod contact;
mod form_or_json;
pub mod health_check;
pub mod register;

pub use form_or_json::{BodyRejection, FormOrJson};

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde::Serialize;

#[derive(Serialize)]
struct Acknowledgement {
    message: &'static str,
    status: u16,
}

#[derive(Serialize)]
struct DispatchFailure<'a> {
    message: &'a str,
    status: u16,
    error: String,
}

fn acknowledge(message: &'static str) -> Response {
    (
        StatusCode::OK,
        Json(Acknowledgement {
            message,
            status: StatusCode::OK.as_u16(),
        }),
    )
        .into_response()
}

/// Every dispatch failure collapses into a 500 carrying the transport's message.
fn dispatch_failure(message: &str, reason: &anyhow::Error) -> Response {
    let status = StatusCode::INTERNAL_SERVER_ERROR;
    tracing::error!(error.cause_chain = ?reason, "{}", message);

    (
        status,
        Json(DispatchFailure {
            message,
            status: status.as_u16(),
            error: reason.to_string(),
        }),
    )
        .into_response()
}
