// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! gs-events: Event tap for a session gateway.
//!
//! Attaches the listener stack to one gateway instance and logs the decoded
//! user lifecycle events. Useful for verifying the gateway's event
//! extension end to end without running the full operator.

use std::sync::Arc;

use clap::Parser;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use gs_operator::Listener;

/// gs-events: session gateway event tap
#[derive(Parser, Debug)]
#[command(name = "gs-events")]
#[command(about = "Logs user lifecycle events from a session gateway")]
struct Args {
    /// WebSocket URL of the gateway's event endpoint
    #[arg(short, long)]
    url: String,

    /// Namespace label for the gateway instance
    #[arg(long, default_value = "default")]
    namespace: String,

    /// Name label for the gateway instance
    #[arg(long, default_value = "gateway")]
    name: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting gs-events");
    info!("  Target: {} in {}", args.name, args.namespace);
    info!("  URL: {}", args.url);

    let listener = Arc::new(Listener::new());
    listener.add(&args.namespace, &args.name, &args.url).await;

    let token = CancellationToken::new();
    let (event_tx, mut event_rx) = mpsc::channel(16);
    let (err_tx, mut err_rx) = mpsc::channel(16);
    let (done_tx, done_rx) = oneshot::channel();

    {
        let listener = Arc::clone(&listener);
        let token = token.clone();
        tokio::spawn(async move {
            listener.listen(token, event_tx, err_tx, done_tx).await;
        });
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            Some(event) = event_rx.recv() => {
                info!(
                    namespace = %event.namespace,
                    name = %event.name,
                    username = %event.username,
                    "user event"
                );
            }
            Some(err) = err_rx.recv() => warn!("{err}"),
        }
    }

    info!("Shutting down");
    token.cancel();
    let _ = done_rx.await;

    Ok(())
}
