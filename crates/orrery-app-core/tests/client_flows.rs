// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs, clippy::unwrap_used)]
//! Client-side flows: saved prefs shaping the detected profile, the contact
//! form against scripted responses, and a multi-turn chat.

use std::time::Duration;

use orrery_app_core::chat::{
    truncate_history, ChatResponse, ChatRole, ChatSession, ChatTurn, GREETING, HISTORY_WINDOW,
    TRANSPORT_FALLBACK,
};
use orrery_app_core::config::{ConfigError, ConfigService, PREFS_KEY};
use orrery_app_core::contact::{
    is_valid_email, ContactError, ContactForm, ContactResponse, SubmitOutcome, FAILED_TITLE,
};
use orrery_app_core::prefs::ShowcasePrefs;
use orrery_app_core::toast::{ToastKind, ToastService};
use orrery_core::{LayoutVariant, PerformanceTier};
use orrery_dry_tests::config::FailMode;
use orrery_dry_tests::{profile_for, DevicePreset, InMemoryConfigStore};
use proptest::prelude::*;

#[test]
fn saved_quality_cap_applies_to_detected_profile() {
    let store = InMemoryConfigStore::new();
    let service = ConfigService::new(store.clone());
    let prefs = ShowcasePrefs {
        tier_cap: Some(PerformanceTier::Medium),
        layout_override: Some(LayoutVariant::Mobile),
        ..ShowcasePrefs::default()
    };
    service.save(PREFS_KEY, &prefs).unwrap();

    // A second session reads the same store.
    let next = ConfigService::new(store);
    let loaded: ShowcasePrefs = next.load_or_default(PREFS_KEY);
    assert_eq!(loaded, prefs);
    let profile = loaded.apply(profile_for(DevicePreset::Workstation));
    assert_eq!(profile.tier, PerformanceTier::Medium);
    assert!(!profile.enable_glow);
    assert!(profile.can_render_3d);
    assert_eq!(loaded.layout_for(1440.0), LayoutVariant::Mobile);
}

#[test]
fn unreadable_prefs_fall_back_to_defaults() {
    let store = InMemoryConfigStore::new();
    store.fail(FailMode::OnLoad);
    let service = ConfigService::new(store);
    assert!(matches!(
        service.load::<ShowcasePrefs>(PREFS_KEY),
        Err(ConfigError::Other(_))
    ));
    assert_eq!(service.load_or_default::<ShowcasePrefs>(PREFS_KEY), ShowcasePrefs::default());
}

#[test]
fn malformed_email_never_leaves_the_client() {
    let mut toasts = ToastService::new(4);
    let mut form = ContactForm::new();
    form.name = "Ada".into();
    form.email = "not-an-email".into();
    form.message = "hello".into();
    let err = form.begin_submit(&mut toasts, Duration::ZERO).unwrap_err();
    assert_eq!(err, ContactError::InvalidEmail);
    assert!(!form.is_submitting());
    let shown = toasts.visible(Duration::ZERO);
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].kind, ToastKind::Error);
    assert_eq!(shown[0].title, FAILED_TITLE);
    assert_eq!(shown[0].body.as_deref(), Some("Invalid email format"));
    // Fields are kept for correction.
    assert_eq!(form.email, "not-an-email");
}

#[test]
fn failed_then_retried_submission() {
    let mut toasts = ToastService::new(4);
    let mut form = ContactForm::new();
    form.name = " Ada ".into();
    form.email = "ada@example.com".into();
    form.message = "Hi there".into();

    let payload = form.begin_submit(&mut toasts, Duration::ZERO).unwrap();
    assert_eq!(payload.name, "Ada");
    assert_eq!(
        form.begin_submit(&mut toasts, Duration::from_millis(10)),
        Err(ContactError::InFlight)
    );
    let outcome = form.finish_submit(
        Ok::<_, String>(ContactResponse::failed("Failed to send email")),
        &mut toasts,
        Duration::from_millis(20),
    );
    assert_eq!(outcome, SubmitOutcome::Failed);
    assert_eq!(form.name, " Ada ");

    form.begin_submit(&mut toasts, Duration::from_secs(1)).unwrap();
    let outcome = form.finish_submit(
        Ok::<_, String>(ContactResponse::sent(Some("msg_1".into()))),
        &mut toasts,
        Duration::from_secs(2),
    );
    assert_eq!(outcome, SubmitOutcome::Sent);
    assert!(form.name.is_empty() && form.email.is_empty() && form.message.is_empty());
    let kinds: Vec<_> = toasts
        .visible(Duration::from_secs(2))
        .into_iter()
        .map(|t| t.kind)
        .collect();
    assert_eq!(kinds, [ToastKind::Error, ToastKind::Success]);
}

#[test]
fn conversation_forwards_prior_turns_only() {
    let mut chat = ChatSession::new();
    let first = chat.send("What is IBIT?").unwrap();
    assert!(first.conversation_history.is_empty());
    chat.receive(Ok::<_, String>(ChatResponse {
        response: Some("A spot bitcoin ETF.".into()),
        error: None,
    }));

    let second = chat.send("Fees?").unwrap();
    let roles: Vec<_> = second.conversation_history.iter().map(|t| t.role).collect();
    assert_eq!(roles, [ChatRole::User, ChatRole::Assistant]);
    assert!(second.conversation_history.iter().all(|t| t.content != GREETING));

    let reply = chat.receive(Err::<ChatResponse, _>("connection reset"));
    assert_eq!(reply.content, TRANSPORT_FALLBACK);
    assert_eq!(chat.transcript().len(), 5);
    assert!(!chat.is_awaiting_reply());
}

proptest! {
    #[test]
    fn forwarded_history_is_the_newest_suffix(n in 0usize..40) {
        let history: Vec<ChatTurn> = (0..n)
            .map(|i| {
                let role = if i % 2 == 0 { ChatRole::User } else { ChatRole::Assistant };
                ChatTurn::new(role, i.to_string())
            })
            .collect();
        let kept = truncate_history(&history);
        prop_assert_eq!(kept.len(), n.min(HISTORY_WINDOW));
        prop_assert!(history.ends_with(kept));
    }

    #[test]
    fn whitespace_in_the_local_part_fails_validation(
        local in "[a-z]{1,8}",
        domain in "[a-z]{1,8}",
    ) {
        let valid = format!("{local}@{domain}.com");
        let spaced = format!("{local} x@{domain}.com");
        prop_assert!(is_valid_email(&valid));
        prop_assert!(!is_valid_email(&spaced));
    }
}
