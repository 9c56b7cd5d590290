//! crossroad binary: parse config, install logging, pick a counter backend,
//! serve until SIGTERM / Ctrl-C.

use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crossroad::{Config, CounterStore, DemoService, MemoryCounter, RedisCounter, Server, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .init();

    let addr = config.socket_addr()?;

    let counter: Arc<dyn CounterStore> = match &config.redis_url {
        Some(url) => {
            info!(key = %config.counter_key, "visit counter backed by redis");
            Arc::new(RedisCounter::open(url, config.counter_key.clone())?)
        }
        None => {
            warn!("REDIS_URL not set, visit counter is in-memory and resets on restart");
            Arc::new(MemoryCounter::new())
        }
    };

    let service = DemoService::new(counter).with_counter_timeout(config.counter_timeout());
    let app = routes::app(Arc::new(service));

    Server::bind(addr).serve(app).await?;
    Ok(())
}
