// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory upstreams for gateway handler tests.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use orrery_gateway::chat::{ChatUpstream, CompletionRequest};
use orrery_gateway::mail::{MailSender, OutgoingEmail};
use orrery_gateway::GatewayError;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// Mail sender that records every e-mail instead of delivering it.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    failure: Mutex<Option<String>>,
}

impl RecordingMailer {
    /// Mailer that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mailer whose provider rejects every send with `message`.
    pub fn rejecting(message: &str) -> Self {
        let mailer = Self::default();
        *lock(&mailer.failure) = Some(message.to_owned());
        mailer
    }

    /// E-mails accepted so far.
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        lock(&self.sent).clone()
    }
}

#[async_trait]
impl MailSender for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<Option<String>, GatewayError> {
        if let Some(message) = lock(&self.failure).clone() {
            return Err(GatewayError::Upstream(message));
        }
        let mut sent = lock(&self.sent);
        sent.push(email.clone());
        Ok(Some(format!("msg_{}", sent.len())))
    }
}

/// Chat upstream returning a scripted reply.
#[derive(Debug, Default)]
pub struct ScriptedChat {
    reply: Mutex<Option<String>>,
    fail: Mutex<bool>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedChat {
    /// Upstream answering every request with `reply`.
    pub fn replying(reply: &str) -> Self {
        let chat = Self::default();
        *lock(&chat.reply) = Some(reply.to_owned());
        chat
    }

    /// Upstream answering with no choices.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Upstream failing every request.
    pub fn failing() -> Self {
        let chat = Self::default();
        *lock(&chat.fail) = true;
        chat
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl ChatUpstream for ScriptedChat {
    async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>, GatewayError> {
        lock(&self.requests).push(request.clone());
        if *lock(&self.fail) {
            return Err(GatewayError::Upstream("completions endpoint returned 503".into()));
        }
        Ok(lock(&self.reply).clone())
    }
}
