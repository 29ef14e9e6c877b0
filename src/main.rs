// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use clap::Parser;
use dns_services_webhook::{
    config::WebhookConfig,
    credentials::KubeSecretSource,
    provider::http_client,
    solver::DnsServicesSolver,
    webhook::{serve, AppState},
};
use kube::Client;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

fn main() -> Result<()> {
    let config = WebhookConfig::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .thread_name("dns-services-webhook")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(config))
}

fn init_logging() {
    // Respects RUST_LOG (default: info) and RUST_LOG_FORMAT (json | text)
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

async fn async_main(config: WebhookConfig) -> Result<()> {
    init_logging();

    config.validate()?;
    info!(
        group = %config.group_name,
        listen_addr = %config.listen_addr,
        "Starting dns.services webhook"
    );
    if let Some(zone) = config.test_zone_name() {
        warn!(zone = %zone, "Test zone override is active");
    }

    debug!("Initializing Kubernetes client");
    let client = Client::try_default()
        .await
        .context("failed to initialize Kubernetes client")?;
    debug!("Kubernetes client initialized successfully");

    let http = http_client(config.provider_timeout()).context("failed to build HTTP client")?;
    let solver = DnsServicesSolver::new(Arc::new(KubeSecretSource::new(client)), http)
        .with_test_zone_name(config.test_zone_name());

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;

    serve(
        listener,
        AppState::new(&config.group_name, Arc::new(solver)),
        shutdown_signal(),
    )
    .await?;

    info!("Webhook stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
