// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Chat assistant proxy: prompt assembly and the completions upstream.

use std::time::Duration;

use async_trait::async_trait;
use orrery_app_core::chat::{truncate_history, ChatRequest, ChatRole, ChatTurn};
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Default chat-completions endpoint.
pub const CHAT_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
/// Default model id.
pub const CHAT_MODEL: &str = "google/gemini-3-flash-preview";
/// Reply cap sent upstream.
pub const MAX_TOKENS: u32 = 500;
/// Sampling temperature sent upstream.
pub const TEMPERATURE: f32 = 0.7;
/// Reply used when the model returns no content.
pub const EMPTY_COMPLETION_REPLY: &str =
    "I'm sorry, I couldn't process that request. Please try again.";
/// Error summary returned on any failure.
pub const FAILURE_ERROR: &str = "Failed to process request";
/// Assistant text returned on any failure.
pub const FAILURE_REPLY: &str =
    "I'm experiencing some technical difficulties. Please try again in a moment.";

/// System prompt describing the company the assistant represents.
pub const SYSTEM_CONTEXT: &str = "\
You are the IBIT AI Assistant, a helpful and knowledgeable representative of IBIT (Innovative Business & Information Technology).

About IBIT:
- IBIT is a technology company specializing in IT solutions, digital transformation, and business services
- IBIT provides IT infrastructure, network solutions, server management, and cloud services
- Expertise includes cybersecurity, software development, data center management, and IT consulting
- IBIT serves businesses of all sizes, from startups to enterprises

Core services:
1. IT Infrastructure - setup, maintenance, and optimization
2. Network Solutions - enterprise networking, WiFi deployment, and connectivity
3. Cloud Services - migration, management, and hybrid solutions
4. Cybersecurity - audits, implementation, and 24/7 monitoring
5. Software Development - custom applications, web platforms, and mobile apps
6. Data Center Services - hosting, colocation, and managed services
7. IT Consulting - strategic planning and digital transformation guidance

Contact:
- Visitors can reach the team through the contact form on the website
- The team responds within 24 hours

Response guidelines:
- Be professional, friendly, and helpful
- Keep answers brief (2-3 sentences) unless more detail is needed
- For pricing questions, suggest contacting the team for a custom quote
";

/// Body sent to the completions endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    /// Model id.
    pub model: String,
    /// System context, trailing history, then the new user message.
    pub messages: Vec<ChatTurn>,
    /// Reply cap.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

impl CompletionRequest {
    /// Assemble the upstream request for a visitor request.
    pub fn for_visitor(request: &ChatRequest, model: &str) -> Self {
        let history = truncate_history(&request.conversation_history);
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatTurn::new(ChatRole::System, SYSTEM_CONTEXT));
        messages.extend_from_slice(history);
        messages.push(ChatTurn::new(ChatRole::User, request.message.as_str()));
        Self {
            model: model.to_owned(),
            messages,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }
}

/// Completion port.
#[async_trait]
pub trait ChatUpstream: Send + Sync {
    /// Run `request`; returns the first choice's content, if any.
    async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>, GatewayError>;
}

#[derive(Deserialize, Default)]
struct Completion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// [`ChatUpstream`] speaking the OpenAI-compatible completions protocol.
#[derive(Debug, Clone)]
pub struct CompletionsClient {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl CompletionsClient {
    /// Client posting to `url`. A missing key fails each call, not startup.
    pub fn new(
        url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            api_key,
        })
    }
}

#[async_trait]
impl ChatUpstream for CompletionsClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>, GatewayError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(GatewayError::MissingSecret("LOVABLE_API_KEY"))?;
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(key)
            .json(request)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GatewayError::Upstream(format!(
                "completions endpoint returned {status}: {detail}"
            )));
        }
        let completion: Completion = response.json().await?;
        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_is_system_history_then_message() {
        let history: Vec<_> = (0..12)
            .map(|i| ChatTurn::new(ChatRole::User, format!("turn {i}")))
            .collect();
        let req = ChatRequest {
            message: "What about cloud?".into(),
            conversation_history: history,
        };
        let up = CompletionRequest::for_visitor(&req, CHAT_MODEL);
        assert_eq!(up.messages.len(), 12);
        assert_eq!(up.messages[0].role, ChatRole::System);
        assert_eq!(up.messages[1].content, "turn 2");
        assert_eq!(up.messages[11], ChatTurn::new(ChatRole::User, "What about cloud?"));
        assert_eq!(up.max_tokens, 500);
    }

    #[test]
    fn first_choice_content_is_extracted() {
        let body = r#"{"choices":[{"message":{"content":"Hi!"}},{"message":{"content":"no"}}]}"#;
        let parsed: Completion = serde_json::from_str(body).unwrap_or_default();
        let first =
            parsed.choices.into_iter().next().and_then(|c| c.message).and_then(|m| m.content);
        assert_eq!(first.as_deref(), Some("Hi!"));
    }
}
