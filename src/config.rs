//! Startup configuration.
//!
//! Every flag can also come from the environment, so the service runs the
//! same under a process manager, in a container, or from a shell.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use clap::Parser;

use crate::counter::DEFAULT_COUNTER_KEY;
use crate::error::Error;

/// Port used when the bind value is a bare host.
pub const DEFAULT_PORT: u16 = 5000;

/// A small HTTP demo service.
#[derive(Parser, Debug, Clone)]
#[command(name = "crossroad", version, about)]
pub struct Config {
    /// Address to listen on: `host` or `host:port`
    #[arg(long, env = "CROSSROAD_BIND")]
    pub bind: String,

    /// Redis URL holding the visit counter; an in-memory counter is used when absent
    #[arg(long, env = "REDIS_URL")]
    pub redis_url: Option<String>,

    /// Name of the counter key
    #[arg(long, env = "CROSSROAD_COUNTER_KEY", default_value = DEFAULT_COUNTER_KEY)]
    pub counter_key: String,

    /// Counter round-trip timeout in milliseconds
    #[arg(long, env = "CROSSROAD_COUNTER_TIMEOUT_MS", default_value_t = 2000)]
    pub counter_timeout_ms: u64,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Config {
    pub fn socket_addr(&self) -> Result<SocketAddr, Error> {
        resolve_bind(&self.bind)
    }

    pub fn counter_timeout(&self) -> Duration {
        Duration::from_millis(self.counter_timeout_ms)
    }

    /// Default `tracing` filter for the verbosity level; `RUST_LOG` wins.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Parses `host:port`, `[v6]:port`, or a bare IP that gets [`DEFAULT_PORT`].
pub fn resolve_bind(value: &str) -> Result<SocketAddr, Error> {
    let value = value.trim();
    if let Ok(addr) = value.parse::<SocketAddr>() {
        return Ok(addr);
    }
    value
        .trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, DEFAULT_PORT))
        .map_err(|source| Error::InvalidAddress { addr: value.to_owned(), source })
}
