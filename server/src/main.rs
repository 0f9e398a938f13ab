use clap::Parser;
use log::{error, info};
use server::network::{Server, ServerConfig};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server IP address to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value = "5001")]
    port: u16,

    /// Maximum number of concurrent connections
    #[arg(long, default_value = "256")]
    max_players: usize,

    /// Seconds a finished game is kept before eviction
    #[arg(long, default_value = "300")]
    finished_ttl_secs: u64,

    /// Seconds between eviction sweeps
    #[arg(long, default_value = "30")]
    sweep_interval_secs: u64,

    /// Outbound messages buffered per connection before dropping
    #[arg(long, default_value = "64")]
    outbound_queue: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = ServerConfig {
        max_players: args.max_players,
        finished_ttl: Duration::from_secs(args.finished_ttl_secs),
        sweep_interval: Duration::from_secs(args.sweep_interval_secs.max(1)),
        outbound_queue: args.outbound_queue.max(1),
    };

    let address = format!("{}:{}", args.host, args.port);
    let server = Server::bind(&address, config).await?;

    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                error!("Server stopped: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
