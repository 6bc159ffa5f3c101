#![forbid(unsafe_code)]
//! minichain node: serves the ledger API and reconciles with peers.

use clap::Parser;
use minichain::api::{run_api_server, ApiState};
use minichain::config::load_config;
use minichain::ledger::Ledger;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "minichain-node", about = "Minimal proof-of-work ledger node")]
struct Args {
    /// Node identifier, used as the recipient of mining rewards
    #[arg(long)]
    node_id: Option<String>,

    /// API port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Peer address to register at startup (repeatable)
    #[arg(long = "peer")]
    peers: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = load_config()?;

    let node_id = args.node_id.unwrap_or(config.node.identifier);
    let port = args.port.unwrap_or(config.network.api_port);

    info!(%node_id, port, "starting minichain node");

    let mut ledger = Ledger::new(node_id);
    for peer in config.network.bootstrap_peers.iter().chain(args.peers.iter()) {
        info!(peer = %peer, "registering bootstrap peer");
        ledger.register_peer(peer.clone());
    }

    let state = ApiState::new(Arc::new(RwLock::new(ledger)))?;
    run_api_server(state, port).await
}
