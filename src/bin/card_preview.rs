//! Desktop preview server for the train card.
//!
//! Runs the card behind the HTTP bridge, allowing you to:
//! - Open the preview page at http://localhost:8080
//! - Push host state with `POST /api/states`
//! - Press controls and watch the service calls at `GET /api/commands`
//!
//! # Usage
//!
//! ```sh
//! cargo run --bin card_preview --features web -- "Polar Express" 8080
//! ```
//!
//! Both arguments are optional. Set `RUST_LOG=debug` to see every dispatched
//! command and frame loop change.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lionel_train_card::registry::{lionel_card_info, CardRegistry};
use lionel_train_card::services::{run_server, SharedCardState, WebServerConfig};
use lionel_train_card::{CardConfig, WebConfig};

const DEFAULT_DEVICE: &str = "Polar Express";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let device = args.next().unwrap_or_else(|| DEFAULT_DEVICE.to_string());
    let mut web = WebConfig::default();
    if let Some(port) = args.next() {
        web = web.with_port(port.parse().context("port must be a number")?);
    }

    let mut registry = CardRegistry::new();
    registry.register(lionel_card_info())?;

    let config = CardConfig::default().with_device(&device);
    let state = Arc::new(SharedCardState::new(config)?);
    let server_config = WebServerConfig::from_config(&web);

    info!(device = %device, "starting card preview");
    info!("  Preview: http://{}", server_config.addr);
    info!("  API:     http://{}/api/view", server_config.addr);

    run_server(state, server_config)
        .await
        .context("preview server failed")
}
