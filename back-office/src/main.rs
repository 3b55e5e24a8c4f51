//! Back-office console entry point
//!
//! Wires the HTTP booking client, the list controller, and the relay
//! subscription together, then surfaces relay alerts until shutdown.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::broadcast::error::RecvError;

use back_office::core::BookingController;
use back_office::{AppConfig, logger, relay_router};
use booking_client::{HttpBookingClient, RelayConnection};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config = AppConfig::from_env();
    logger::init_logger_with_file(&config.log_level, config.log_dir.as_deref());

    tracing::info!(store_url = %config.store_url, relay_addr = %config.relay_addr, "Starting back-office console");

    let client = Arc::new(HttpBookingClient::new(&config.client_config())?);
    let controller = Arc::new(BookingController::new(client, config.request_timeout()));

    match controller.refresh().await {
        Ok(count) => tracing::info!(reservations = count, "Initial list loaded"),
        Err(e) => tracing::warn!(error = %e, "Initial list fetch failed, starting empty"),
    }

    // One relay subscription for the process lifetime; the connection
    // manager guarantees a second connect attempt never races this one
    let relay = RelayConnection::new(config.relay_addr.clone(), "back-office-console");
    let relay_client = match relay.ensure_connected().await {
        Ok(client) => Some(client),
        Err(e) => {
            tracing::warn!(error = %e, "Relay unavailable, continuing without live events");
            None
        }
    };

    match relay_client {
        Some(relay_client) => {
            let mut events = relay_client.subscribe();
            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    event = events.recv() => match event {
                        Ok(msg) => {
                            if let Some(alert) = relay_router::route(&msg) {
                                tracing::info!(title = %alert.title, "{}", alert.body);
                                if alert.navigate.is_some() {
                                    // The console follows the offered
                                    // navigation; the list re-derives truth
                                    // from the store on arrival
                                    if let Err(e) = controller.refresh().await {
                                        tracing::warn!(error = %e, "Refresh after relay alert failed");
                                    }
                                }
                            }
                        }
                        Err(RecvError::Closed) => {
                            tracing::warn!("Relay stream closed");
                            break;
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Relay events dropped");
                        }
                    },
                }
            }
        }
        None => {
            tokio::signal::ctrl_c().await?;
        }
    }

    relay.disconnect().await;
    tracing::info!("Back-office console stopped");
    Ok(())
}
