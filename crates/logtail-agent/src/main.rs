// Copyright 2025-Present the logtail contributors
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

mod config;
mod http_client;
mod sink;

use config::AgentConfig;
use http_client::HttpLogsClient;
use logtail_core::publisher::ChannelPublisher;
use logtail_core::registry::FileRegistry;
use logtail_core::supervisor::Supervisor;
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

const REMOTE_API_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
pub async fn main() {
    let log_level = env::var("LOGTAIL_LOG_LEVEL")
        .map(|val| val.to_lowercase())
        .unwrap_or("info".to_string());

    let env_filter = format!("hyper=off,reqwest=off,{}", log_level);

    #[allow(clippy::expect_used)]
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_new(env_filter).expect("could not parse log level in configuration"),
        )
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true)
        .without_time()
        .finish();

    #[allow(clippy::expect_used)]
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    debug!("Logging subsystem enabled");

    let config = match AgentConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Error creating config on agent startup: {e}");
            return;
        }
    };

    let registry = match FileRegistry::open(&config.registry_path) {
        Ok(registry) => Arc::new(registry),
        Err(e) => {
            error!(
                "Error opening registry at {}: {e}",
                config.registry_path.display()
            );
            return;
        }
    };

    let client = match HttpLogsClient::new(config.endpoint.clone(), REMOTE_API_TIMEOUT) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Error creating remote API client: {e}");
            return;
        }
    };

    let (publisher, events_rx) = ChannelPublisher::new();
    let sink_task = tokio::spawn(sink::stdout_sink(events_rx));

    let supervisor = match Supervisor::new(
        config.group_configs(),
        client,
        registry,
        Arc::new(publisher),
    ) {
        Ok(supervisor) => supervisor,
        Err(e) => {
            error!("Error creating supervisor: {e}");
            return;
        }
    };

    info!(
        groups = config.groups.len(),
        endpoint = %config.endpoint,
        "logtail agent started"
    );
    let handle = supervisor.start();

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Error waiting for shutdown signal: {e}");
    }
    info!("Shutting down logtail agent");

    handle.stop().await;
    // The supervisor owned the last publisher clones; the sink drains the
    // channel and exits on its own.
    let _ = sink_task.await;
}
