// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Visitor-facing state that is neither layout nor rendering: stored
//! settings and quality preferences, the contact form, the chat widget and
//! the notifications they raise. The wasm bridge and the gateway both
//! depend on this crate; it knows nothing about either.

pub mod chat;
pub mod config;
pub mod config_port;
pub mod contact;
pub mod prefs;
pub mod toast;
