//! Credential Broker
//!
//! Caches credentials announced by `credential.issued` events and answers
//! `credential.requested` events with `credential.provided`.

use anyhow::Result;
use credbroker_config::{BrokerConfig, LogFormat};
use credbroker_logging::{init_console_logging, init_logging};
use credential_broker::{BrokerCell, BrokerWorker};
use message_bus_client::memory::InMemoryBus;
use message_bus_client::nats::NatsClient;
use message_bus_client::traits::MessageBusClient;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = BrokerConfig::from_env()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    // Initialize logging
    match config.log_format {
        LogFormat::Json => init_logging(&config.service_name, config.log_level()),
        LogFormat::Console => init_console_logging(&config.service_name, config.log_level()),
    }

    info!(
        message_bus_url = config.message_bus_url(),
        "Configuration loaded"
    );

    // Connect to message bus
    let message_bus: Arc<dyn MessageBusClient> = if config.message_bus.is_in_memory() {
        warn!("Using in-process message bus; no external producer can reach this broker");
        Arc::new(InMemoryBus::new())
    } else {
        let client = NatsClient::new(
            config.message_bus_url(),
            config.message_bus.stream_name.clone(),
            Some(config.subject_prefix().to_string()),
        )
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to message bus: {}", e))?;
        Arc::new(client)
    };

    info!(client = message_bus.client_type(), "Connected to message bus");

    // One broker per process, owned here and handed to the worker
    let brokers = BrokerCell::new();
    let worker = BrokerWorker::new(message_bus, brokers.get_or_init());

    info!("Starting event processing");
    let worker_handle = tokio::spawn(async move {
        if let Err(e) = worker.run().await {
            error!(error = %e, "Worker error");
        }
    });

    // Wait for shutdown signal
    info!("Credential Broker running. Press Ctrl+C to stop.");
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received");
        }
        Err(err) => {
            error!(error = %err, "Unable to listen for shutdown signal");
        }
    }

    worker_handle.abort();
    info!("Credential Broker stopped");

    Ok(())
}
