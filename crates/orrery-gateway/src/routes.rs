// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! HTTP surface: `/send-contact-email` and `/chat`.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use orrery_app_core::chat::{ChatError, ChatRequest, ChatResponse};
use orrery_app_core::contact::{ContactMessage, ContactResponse};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{error, info, warn};

use crate::chat::{
    ChatUpstream, CompletionRequest, EMPTY_COMPLETION_REPLY, FAILURE_ERROR, FAILURE_REPLY,
};
use crate::error::GatewayError;
use crate::mail::{contact_email, MailSender, Mailbox};

/// Request headers browsers may send with either route.
const ALLOWED_HEADERS: [&str; 8] = [
    "authorization",
    "x-client-info",
    "apikey",
    "content-type",
    "x-supabase-client-platform",
    "x-supabase-client-platform-version",
    "x-supabase-client-runtime",
    "x-supabase-client-runtime-version",
];

/// Shared handler state.
pub struct AppState {
    /// Contact e-mail delivery.
    pub mailer: Arc<dyn MailSender>,
    /// Chat completions.
    pub chat: Arc<dyn ChatUpstream>,
    /// Contact e-mail sender and recipients.
    pub mailbox: Mailbox,
    /// Model id forwarded upstream.
    pub chat_model: String,
}

/// CORS policy: any origin when `origins` is empty, else exactly those.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, GatewayError> {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        let values = origins
            .iter()
            .map(|o| HeaderValue::from_str(o).map_err(|_| GatewayError::InvalidOrigin(o.clone())))
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(values)
    };
    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers(ALLOWED_HEADERS.map(HeaderName::from_static)))
}

/// Build the gateway router.
pub fn router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/send-contact-email", post(send_contact_email).options(preflight))
        .route("/chat", post(chat).options(preflight))
        .layer(cors)
        .with_state(Arc::new(state))
}

fn reply<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, Json(body)).into_response()
}

// Preflights carrying `Access-Control-Request-Method` are answered by the
// CORS layer; bare OPTIONS probes land here.
async fn preflight() -> &'static str {
    "ok"
}

async fn send_contact_email(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let submitted: ContactMessage = match serde_json::from_slice(&body) {
        Ok(message) => message,
        Err(err) => {
            error!(%err, "contact body unreadable");
            let failed = ContactResponse::failed(err.to_string());
            return reply(StatusCode::INTERNAL_SERVER_ERROR, failed);
        }
    };
    let message = match submitted.validated() {
        Ok(message) => message,
        Err(err) => {
            warn!(%err, "contact form rejected");
            return reply(StatusCode::BAD_REQUEST, ContactResponse::failed(err.to_string()));
        }
    };

    info!(from = %message.email, "sending contact form email");
    let email = contact_email(&message, &state.mailbox);
    match state.mailer.send(&email).await {
        Ok(id) => {
            info!(?id, "contact email sent");
            reply(StatusCode::OK, ContactResponse::sent(id))
        }
        Err(err) => {
            error!(%err, "contact email delivery failed");
            err.into_response()
        }
    }
}

fn chat_failure() -> Response {
    reply(
        StatusCode::INTERNAL_SERVER_ERROR,
        ChatResponse {
            response: Some(FAILURE_REPLY.to_owned()),
            error: Some(FAILURE_ERROR.to_owned()),
        },
    )
}

async fn chat(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let request: ChatRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            error!(%err, "chat body unreadable");
            return chat_failure();
        }
    };
    if request.message.is_empty() {
        return reply(
            StatusCode::BAD_REQUEST,
            ChatResponse {
                response: None,
                error: Some(ChatError::EmptyMessage.to_string()),
            },
        );
    }

    let upstream = CompletionRequest::for_visitor(&request, &state.chat_model);
    match state.chat.complete(&upstream).await {
        Ok(content) => {
            let response = content
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| EMPTY_COMPLETION_REPLY.to_owned());
            reply(
                StatusCode::OK,
                ChatResponse {
                    response: Some(response),
                    error: None,
                },
            )
        }
        Err(err) => {
            error!(%err, "chat completion failed");
            chat_failure()
        }
    }
}
