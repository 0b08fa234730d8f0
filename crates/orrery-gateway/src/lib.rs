// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! HTTP gateway for the Orrery showcase.
//!
//! Two routes back the site's server-side collaborators: a contact-form mail
//! relay and a chat assistant proxy. Upstream providers sit behind the
//! [`mail::MailSender`] and [`chat::ChatUpstream`] ports so handlers can be
//! exercised without network access.

pub mod chat;
pub mod error;
pub mod mail;
pub mod routes;
pub mod settings;

pub use error::GatewayError;
pub use routes::{cors_layer, router, AppState};
pub use settings::Args;
