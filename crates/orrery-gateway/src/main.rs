// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `orrery-gateway`: serves `/send-contact-email` and `/chat`.

use std::{sync::Arc, time::Duration};

use anyhow::{bail, Context, Result};
use axum::Router;
use axum_server::{tls_rustls::RustlsConfig, Handle};
use clap::Parser;
use orrery_gateway::{
    chat::CompletionsClient, cors_layer, mail::ResendMailer, router, AppState, Args,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DRAIN_GRACE: Duration = Duration::from_secs(5);

fn app_state(args: &Args) -> Result<AppState> {
    if args.resend_api_key.is_none() {
        warn!("RESEND_API_KEY missing; /send-contact-email will answer 500");
    }
    if args.lovable_api_key.is_none() {
        warn!("LOVABLE_API_KEY missing; /chat will answer 500");
    }
    let timeout = args.upstream_timeout();
    let mailer = ResendMailer::new(args.resend_url.clone(), args.resend_api_key.clone(), timeout)
        .context("mail client")?;
    let chat = CompletionsClient::new(args.chat_url.clone(), args.lovable_api_key.clone(), timeout)
        .context("chat client")?;
    Ok(AppState {
        mailer: Arc::new(mailer),
        chat: Arc::new(chat),
        mailbox: args.mailbox(),
        chat_model: args.chat_model.clone(),
    })
}

/// Start draining connections once Ctrl+C arrives.
fn drain_on_interrupt(handle: Handle<std::net::SocketAddr>) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("interrupt received; draining");
                handle.graceful_shutdown(Some(DRAIN_GRACE));
            }
            Err(err) => warn!(%err, "no interrupt handler; stop the process to exit"),
        }
    });
}

async fn serve(args: Args, app: Router) -> Result<()> {
    let handle = Handle::new();
    drain_on_interrupt(handle.clone());
    let service = app.into_make_service();

    let tls = match (args.tls_cert, args.tls_key) {
        (Some(cert), Some(key)) => Some(
            RustlsConfig::from_pem_file(cert, key)
                .await
                .context("tls certificate or key")?,
        ),
        (None, None) => None,
        _ => bail!("--tls-cert and --tls-key go together"),
    };

    if let Some(tls) = tls {
        info!(addr = %args.listen, "gateway up (https)");
        axum_server::bind_rustls(args.listen, tls)
            .handle(handle)
            .serve(service)
            .await?;
    } else {
        info!(addr = %args.listen, "gateway up (http)");
        axum_server::bind(args.listen).handle(handle).serve(service).await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let app = router(app_state(&args)?, cors_layer(&args.allow_origin)?);
    serve(args, app).await
}
