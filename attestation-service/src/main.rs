//! X1 validator attestation service.
//!
//! One validator's half of the bridge: watch a burn on Solana, check it is
//! final, and hand the user a signature over the canonical digest that the
//! X1 light client will verify against the registered validator set.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use solana_sdk::signer::Signer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod context;
mod error;
mod finality;
mod observer;
mod routes;
mod signer;

use crate::context::ServiceContext;
use crate::finality::DEFAULT_FINALITY_SLOTS;

#[derive(Parser, Debug)]
#[command(name = "attestation-service", about, version)]
struct Args {
    /// Validator Ed25519 keypair: base58 or a JSON byte array (id.json)
    #[arg(long, env = "VALIDATOR_PRIVATE_KEY", hide_env_values = true)]
    validator_private_key: String,

    /// Source chain RPC endpoint to observe burns on
    #[arg(long, env = "SOURCE_RPC", default_value = "https://api.mainnet-beta.solana.com")]
    source_rpc: String,

    /// Port for the attestation HTTP API
    #[arg(long, env = "LISTEN_PORT", default_value_t = 3000)]
    listen_port: u16,

    /// Slots a burn must sit behind the confirmed tip before signing
    #[arg(long, env = "FINALITY_SLOTS", default_value_t = DEFAULT_FINALITY_SLOTS)]
    finality_slots: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,attestation_service=debug")),
        )
        .init();

    let args = Args::parse();

    let ctx = ServiceContext::new(
        args.source_rpc,
        &args.validator_private_key,
        args.finality_slots,
    )?;

    info!("X1 attestation service starting");
    info!("  Validator: {}", ctx.keypair.pubkey());
    info!("  Source RPC: {}", ctx.source_rpc_url);
    info!("  Finality: {} slots", ctx.finality_slots);
    for asset in bridge_core::Asset::ALL {
        info!("  Asset {}: {} ({})", asset.code(), asset.name(), asset.source_mint());
    }

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.listen_port))
        .await
        .with_context(|| format!("failed to bind port {}", args.listen_port))?;
    info!("  Listening on 0.0.0.0:{}", args.listen_port);

    axum::serve(listener, routes::router(Arc::new(ctx)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server terminated")?;

    Ok(())
}

/// Resolve on SIGINT or SIGTERM. In-flight attestation requests finish;
/// abandoned ones need no cleanup because the service holds no state.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install sigterm handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
