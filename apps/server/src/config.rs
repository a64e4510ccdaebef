use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub static_dir: String,
    /// Per-subscriber buffer of the grocery change broadcaster.
    pub event_buffer: usize,
    pub hub_keep_alive: Duration,
    pub seed_default_items: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("INDKOB_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid INDKOB_LISTEN_ADDR")?;
        let cors_allow = std::env::var("INDKOB_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("INDKOB_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        let static_dir = std::env::var("INDKOB_STATIC_DIR").unwrap_or_else(|_| "dist".into());
        let event_buffer: usize = std::env::var("INDKOB_EVENT_BUFFER")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v| *v > 0)
            .unwrap_or(256);
        let keep_alive_secs: u64 = std::env::var("INDKOB_HUB_KEEP_ALIVE_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(15);
        let seed_default_items = std::env::var("INDKOB_SEED_DEFAULT_ITEMS")
            .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no"))
            .unwrap_or(true);
        Ok(Self {
            listen_addr,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            static_dir,
            event_buffer,
            hub_keep_alive: Duration::from_secs(keep_alive_secs.max(1)),
            seed_default_items,
        })
    }
}
