// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Chat widget conversation model and the `/chat` wire types.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Greeting shown when the widget opens. Never sent upstream.
pub const GREETING: &str = "Ask anything about IBIT 👋";
/// Assistant text when the gateway answered without a reply.
pub const EMPTY_REPLY_FALLBACK: &str = "I couldn't process that. Please try again.";
/// Assistant text when the request failed in transit.
pub const TRANSPORT_FALLBACK: &str = "Sorry, I'm having trouble connecting. Please try again.";
/// Number of trailing history entries forwarded to the model.
pub const HISTORY_WINDOW: usize = 10;

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// System prompt (gateway only).
    System,
    /// Site visitor.
    User,
    /// Model reply.
    Assistant,
}

/// One conversation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Speaker.
    pub role: ChatRole,
    /// Text content.
    pub content: String,
}

impl ChatTurn {
    /// Build a turn.
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// New user message. Absent or empty is rejected by the gateway.
    #[serde(default)]
    pub message: String,
    /// Prior turns, oldest first.
    #[serde(default)]
    pub conversation_history: Vec<ChatTurn>,
}

/// Response of `POST /chat`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Assistant reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    /// Error summary on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Reasons a message cannot be sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChatError {
    /// Input was empty or whitespace.
    #[error("Message is required")]
    EmptyMessage,
    /// A reply is still pending.
    #[error("a reply is still pending")]
    AwaitingReply,
}

/// Last [`HISTORY_WINDOW`] entries of `history`.
pub fn truncate_history(history: &[ChatTurn]) -> &[ChatTurn] {
    &history[history.len().saturating_sub(HISTORY_WINDOW)..]
}

/// Client-side conversation state.
///
/// The transcript always starts with the greeting; everything after it is
/// real conversation and is forwarded as history.
#[derive(Debug, Clone)]
pub struct ChatSession {
    transcript: Vec<ChatTurn>,
    awaiting: bool,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// Fresh session holding only the greeting.
    pub fn new() -> Self {
        Self {
            transcript: vec![ChatTurn::new(ChatRole::Assistant, GREETING)],
            awaiting: false,
        }
    }

    /// Everything shown in the widget, greeting first.
    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    /// Whether the typing indicator is visible.
    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting
    }

    /// Append the user's message and build the request to send.
    ///
    /// History is captured before the new message is appended, so it holds
    /// the prior turns only. The message is sent as typed.
    pub fn send(&mut self, input: &str) -> Result<ChatRequest, ChatError> {
        if input.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if self.awaiting {
            return Err(ChatError::AwaitingReply);
        }
        let request = ChatRequest {
            message: input.to_owned(),
            conversation_history: self.transcript[1..].to_vec(),
        };
        self.transcript.push(ChatTurn::new(ChatRole::User, input));
        self.awaiting = true;
        Ok(request)
    }

    /// Record the outcome of the request built by [`ChatSession::send`] and
    /// return the appended assistant turn.
    pub fn receive<E: std::fmt::Display>(&mut self, outcome: Result<ChatResponse, E>) -> &ChatTurn {
        self.awaiting = false;
        let content = match outcome {
            Ok(body) => body
                .response
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| EMPTY_REPLY_FALLBACK.to_owned()),
            Err(err) => {
                warn!(%err, "chat request failed");
                TRANSPORT_FALLBACK.to_owned()
            }
        };
        self.transcript.push(ChatTurn::new(ChatRole::Assistant, content));
        &self.transcript[self.transcript.len() - 1]
    }
}
