// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Command-line and environment configuration.

use std::{net::SocketAddr, path::PathBuf, time::Duration};

use clap::Parser;

use crate::{chat, mail};

/// Gateway arguments. Secrets are read from the environment.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Orrery contact/chat gateway")]
pub struct Args {
    /// TCP listener (e.g. 0.0.0.0:8788)
    #[arg(long, default_value = "0.0.0.0:8788")]
    pub listen: SocketAddr,
    /// Allowed CORS origins (repeatable). If none provided, any origin is allowed.
    #[arg(long)]
    pub allow_origin: Vec<String>,
    /// Resend API key
    #[arg(long, env = "RESEND_API_KEY", hide_env_values = true)]
    pub resend_api_key: Option<String>,
    /// Chat completions API key
    #[arg(long, env = "LOVABLE_API_KEY", hide_env_values = true)]
    pub lovable_api_key: Option<String>,
    /// Resend e-mail endpoint
    #[arg(long, default_value = mail::RESEND_URL)]
    pub resend_url: String,
    /// Chat completions endpoint
    #[arg(long, default_value = chat::CHAT_URL)]
    pub chat_url: String,
    /// Chat model id
    #[arg(long, default_value = chat::CHAT_MODEL)]
    pub chat_model: String,
    /// Sender mailbox for contact e-mails
    #[arg(long, default_value = "IBIT Website <noreply@innovatebitech.com>")]
    pub mail_from: String,
    /// Recipient for contact e-mails (repeatable)
    #[arg(long, default_value = "support@innovatebitech.com")]
    pub mail_to: Vec<String>,
    /// Upstream request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub upstream_timeout_secs: u64,
    /// TLS certificate (PEM). If provided, key must also be provided.
    #[arg(long)]
    pub tls_cert: Option<PathBuf>,
    /// TLS private key (PEM). If provided, cert must also be provided.
    #[arg(long)]
    pub tls_key: Option<PathBuf>,
}

impl Args {
    /// Upstream timeout as a `Duration`.
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    /// Sender and recipients for contact e-mails.
    pub fn mailbox(&self) -> mail::Mailbox {
        mail::Mailbox {
            from: self.mail_from.clone(),
            to: self.mail_to.clone(),
        }
    }
}
