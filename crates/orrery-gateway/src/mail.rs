// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Contact-form e-mail rendering and delivery.

use std::time::Duration;

use async_trait::async_trait;
use orrery_app_core::contact::ContactMessage;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Default Resend endpoint.
pub const RESEND_URL: &str = "https://api.resend.com/emails";

/// Outgoing e-mail, serialized as the Resend request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    /// Sender mailbox, e.g. `Site <noreply@example.com>`.
    pub from: String,
    /// Recipients.
    pub to: Vec<String>,
    /// Reply-to address (the visitor).
    pub reply_to: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
}

/// Sender and recipients for contact e-mails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    /// `from` header.
    pub from: String,
    /// Recipient list.
    pub to: Vec<String>,
}

/// Delivery port.
#[async_trait]
pub trait MailSender: Send + Sync {
    /// Send `email`; returns the provider's message id when it reports one.
    async fn send(&self, email: &OutgoingEmail) -> Result<Option<String>, GatewayError>;
}

/// Escape the five HTML-significant characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a validated contact message into an e-mail for `mailbox`.
///
/// Every visitor-supplied field is escaped; message newlines become `<br />`.
pub fn contact_email(message: &ContactMessage, mailbox: &Mailbox) -> OutgoingEmail {
    let name = escape_html(&message.name);
    let email = escape_html(&message.email);
    let body = escape_html(&message.message).replace('\n', "<br />");
    let html = format!(
        "<h2>New Contact Form Submission</h2>\n\
         <p><strong>Name:</strong> {name}</p>\n\
         <p><strong>Email:</strong> {email}</p>\n\
         <hr />\n\
         <h3>Message:</h3>\n\
         <p>{body}</p>\n\
         <hr />\n\
         <p style=\"color: #666; font-size: 12px;\">\
         This message was sent from the website contact form.</p>\n"
    );
    OutgoingEmail {
        from: mailbox.from.clone(),
        to: mailbox.to.clone(),
        reply_to: message.email.clone(),
        subject: format!("New Contact Form Message from {}", message.name),
        html,
    }
}

#[derive(Deserialize)]
struct Sent {
    id: Option<String>,
}

#[derive(Deserialize, Default)]
struct Rejected {
    message: Option<String>,
}

/// [`MailSender`] backed by the Resend HTTP API.
#[derive(Debug, Clone)]
pub struct ResendMailer {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl ResendMailer {
    /// Mailer posting to `url`. A missing key fails each send, not startup.
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
impl MailSender for ResendMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<Option<String>, GatewayError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(GatewayError::MissingSecret("RESEND_API_KEY"))?;
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(key)
            .json(email)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let rejected: Rejected = response.json().await.unwrap_or_default();
            return Err(GatewayError::Upstream(
                rejected
                    .message
                    .unwrap_or_else(|| format!("mail provider returned {status}")),
            ));
        }
        let sent: Sent = response.json().await?;
        Ok(sent.id)
    }
}
