use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use dht_harvest::config::CrawlerConfig;
use dht_harvest::constants::{
    CRAWL_INTERVAL, DEFAULT_PORT, MAX_QUEUED_NODES, NEIGHBOR_PREFIX_LEN, REJOIN_DELAY,
    REJOIN_INTERVAL,
};
use dht_harvest::dht::DhtServer;
use dht_harvest::sink::{DirectorySink, LogSink, Sink};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dht-harvest")]
#[command(version)]
#[command(about = "Collect info hashes announced on the BitTorrent DHT", long_about = None)]
struct Cli {
    /// UDP address to listen on
    #[arg(short, long, default_value_t = SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)))]
    bind: SocketAddr,

    /// Bootstrap node (host:port), repeatable; defaults to the well-known routers
    #[arg(long = "bootstrap", value_name = "HOST:PORT")]
    bootstrap: Vec<String>,

    /// Create one directory per harvested info hash under this path
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Milliseconds between two crawl steps
    #[arg(long, default_value_t = CRAWL_INTERVAL.as_millis() as u64,
          value_parser = clap::value_parser!(u64).range(1..))]
    crawl_interval_ms: u64,

    /// Seconds before the first rejoin check
    #[arg(long, default_value_t = REJOIN_DELAY.as_secs())]
    rejoin_delay_secs: u64,

    /// Seconds between rejoin checks
    #[arg(long, default_value_t = REJOIN_INTERVAL.as_secs(),
          value_parser = clap::value_parser!(u64).range(1..))]
    rejoin_interval_secs: u64,

    /// Leading bytes of an advertised id copied from the peer's target
    #[arg(long, default_value_t = NEIGHBOR_PREFIX_LEN as u8,
          value_parser = clap::value_parser!(u8).range(0..=20))]
    neighbor_prefix: u8,

    /// Maximum nodes waiting to be crawled (0 for no limit)
    #[arg(long, default_value_t = MAX_QUEUED_NODES)]
    max_queue: usize,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn config(&self) -> CrawlerConfig {
        let mut config = CrawlerConfig {
            bind: self.bind,
            crawl_interval: Duration::from_millis(self.crawl_interval_ms),
            rejoin_delay: Duration::from_secs(self.rejoin_delay_secs),
            rejoin_interval: Duration::from_secs(self.rejoin_interval_secs),
            neighbor_prefix_len: usize::from(self.neighbor_prefix),
            max_queue_len: (self.max_queue > 0).then_some(self.max_queue),
            ..CrawlerConfig::default()
        };
        if !self.bootstrap.is_empty() {
            config.bootstrap = self.bootstrap.clone();
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let sink: Arc<dyn Sink> = match &cli.output_dir {
        Some(dir) => {
            info!("Recording info hashes under {}", dir.display());
            Arc::new(DirectorySink::new(dir)?)
        }
        None => Arc::new(LogSink),
    };

    let server = DhtServer::bind(cli.config(), sink).await?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            return;
        }
        info!("Shutting down");
        on_signal.cancel();
    });

    server.run(cancel).await?;
    Ok(())
}
