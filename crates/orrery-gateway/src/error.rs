// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Gateway error type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use orrery_app_core::contact::ContactResponse;
use thiserror::Error;

/// Failure talking to an upstream provider or configuring the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A required secret was not provided.
    #[error("{0} is not configured")]
    MissingSecret(&'static str),
    /// The provider answered with a non-success status.
    #[error("{0}")]
    Upstream(String),
    /// The request never completed (DNS, TLS, timeout, ...).
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// An `--allow-origin` value is not a valid header value.
    #[error("invalid allowed origin {0:?}")]
    InvalidOrigin(String),
}

/// Every gateway failure is a delivery failure from the visitor's side:
/// 500 with `{ "error": "<message>" }`.
impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ContactResponse::failed(self.to_string())),
        )
            .into_response()
    }
}
