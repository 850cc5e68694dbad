use clap::Parser;
use log::{error, info};
use server::game::World;
use server::registry::ConnectionRegistry;
use server::{broadcast, network};
use shared::{BOT_COUNT, TICK_INTERVAL_MS};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::RwLock;

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Server IP address to bind to
    #[clap(short = 'H', long, default_value = "127.0.0.1")]
    host: String,
    /// Server port to listen on
    #[clap(short, long, default_value = "8080")]
    port: u16,
    /// Number of wandering bots to simulate
    #[clap(short, long, default_value_t = BOT_COUNT)]
    bots: usize,
    /// Broadcast interval in milliseconds
    #[clap(short, long, default_value_t = TICK_INTERVAL_MS)]
    tick_ms: u64,
}

/// Main-method of the application.
/// Parses command-line arguments, binds the listener, then spawns the
/// accept loop and the broadcast loop.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    // Failing to bind is the only fatal startup error.
    let address = format!("{}:{}", args.host, args.port);
    let listener = TcpListener::bind(&address).await?;
    info!("Game server listening on ws://{}", address);

    let world = Arc::new(RwLock::new(World::new(args.bots)));
    let registry = Arc::new(RwLock::new(ConnectionRegistry::new()));

    let network_handle = {
        let world = Arc::clone(&world);
        let registry = Arc::clone(&registry);
        tokio::spawn(network::run(listener, world, registry))
    };

    let broadcast_handle = tokio::spawn(broadcast::run(
        world,
        registry,
        Duration::from_millis(args.tick_ms),
    ));

    // Handle shutdown gracefully
    tokio::select! {
        result = network_handle => {
            if let Err(e) = result {
                error!("Network task panicked: {}", e);
            }
        }
        result = broadcast_handle => {
            if let Err(e) = result {
                error!("Broadcast task panicked: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    }

    Ok(())
}
