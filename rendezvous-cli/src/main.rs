use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use rendezvous_server::{
    DEFAULT_ID_ALPHABET, DEFAULT_ID_LENGTH, DEFAULT_MAX_BODY_BYTES, RegistryConfig, RelayConfig,
    RelayServer,
};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Pairs WebRTC offers and answers through short-lived room codes.
#[derive(Parser, Debug)]
#[command(name = "rendezvous-relay")]
#[command(bin_name = "rendezvous-relay")]
struct Args {
    #[arg(long, env = "RELAY_LISTEN_ADDR", default_value = "0.0.0.0:3000")]
    listen: SocketAddr,

    /// How long a room waits to be paired, in milliseconds.
    #[arg(long, env = "RELAY_ROOM_TTL_MS", default_value_t = 60_000)]
    room_ttl_ms: u64,

    #[arg(long, env = "RELAY_ID_ALPHABET", default_value = DEFAULT_ID_ALPHABET)]
    id_alphabet: String,

    #[arg(long, env = "RELAY_ID_LENGTH", default_value_t = DEFAULT_ID_LENGTH)]
    id_length: usize,

    #[arg(long, env = "RELAY_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    max_body_bytes: usize,
}

impl Args {
    fn into_config(self) -> RelayConfig {
        let registry = RegistryConfig::default()
            .with_ttl(Duration::from_millis(self.room_ttl_ms))
            .with_ids(self.id_alphabet, self.id_length);

        RelayConfig {
            listen_addr: self.listen,
            registry,
            max_body_bytes: self.max_body_bytes,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Args::parse().into_config();
    let listen_addr = config.listen_addr;

    let server = RelayServer::new(config).context("Invalid relay configuration")?;
    let listener = TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", listen_addr))?;

    println!(
        "{} {}",
        "🚀 Rendezvous relay ready on".green().bold(),
        format!("http://{}", listen_addr).cyan()
    );
    info!(
        "Rooms live for {:?}, ids are {} symbols long",
        server.registry().config().room_ttl,
        server.registry().config().id_length
    );

    server.serve(listener).await.context("Relay server failed")?;
    Ok(())
}
