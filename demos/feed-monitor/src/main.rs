//! Listens for telemetry and logs every feed change.
//!
//! ```text
//! feed-monitor [bind_addr] [capture_path]
//! RUST_LOG=debug feed-monitor 0.0.0.0:5005 udp_raw_buffer.log
//! ```
//!
//! Snapshot sizes are logged at `info`, full JSON at `debug`.

use std::path::PathBuf;

use serde::Serialize;
use tacfeed::prelude::*;
use tacfeed::protocol::JsonCodec;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

fn config_from_args(mut args: impl Iterator<Item = String>) -> IngestConfig {
    let defaults = IngestConfig::default();
    IngestConfig {
        bind_addr: args.next().unwrap_or(defaults.bind_addr.clone()),
        capture_path: args.next().map(PathBuf::from),
        ..defaults
    }
}

async fn monitor<S: Serialize>(feed: &'static str, mut rx: FeedReceiver<S>, len: fn(&S) -> usize) {
    while let Some(event) = rx.recv().await {
        match event {
            FeedEvent::Snapshot(snapshot) => {
                info!(feed, records = len(&snapshot), "snapshot");
                match JsonCodec.encode(&*snapshot) {
                    Ok(bytes) => debug!(feed, json = %String::from_utf8_lossy(&bytes)),
                    Err(e) => warn!(feed, error = %e, "snapshot not encodable"),
                }
            }
            FeedEvent::Cleared => info!(feed, "cleared"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let handle = tacfeed::bind(config_from_args(std::env::args().skip(1))).await?;

    tokio::spawn(monitor("members", handle.subscribe_members().await?, |s| s.len()));
    tokio::spawn(monitor("targets", handle.subscribe_targets().await?, |s| s.len()));
    tokio::spawn(monitor("engagements", handle.subscribe_engagements().await?, |s| s.len()));
    tokio::spawn(monitor("threats", handle.subscribe_threats().await?, |s| s.len()));

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted");
            handle.shutdown().await?;
        }
        _ = handle.closed() => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_config_from_args_defaults() {
        let cfg = config_from_args(args(&[]));
        assert_eq!(cfg.bind_addr, "0.0.0.0:5005");
        assert!(cfg.capture_path.is_none());
    }

    #[test]
    fn test_config_from_args_bind_and_capture() {
        let cfg = config_from_args(args(&["127.0.0.1:6000", "raw.log"]));
        assert_eq!(cfg.bind_addr, "127.0.0.1:6000");
        assert_eq!(cfg.capture_path, Some(PathBuf::from("raw.log")));
    }

    #[tokio::test]
    async fn test_monitor_ends_when_feed_closes() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<FeedEvent<Vec<u32>>>();
        tx.send(FeedEvent::Snapshot(std::sync::Arc::new(vec![1, 2]))).unwrap();
        tx.send(FeedEvent::Cleared).unwrap();
        drop(tx);
        monitor("test", rx, |s| s.len()).await;
    }
}
