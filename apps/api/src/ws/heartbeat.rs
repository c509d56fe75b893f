use std::sync::Arc;
use std::time::Duration;

use super::manager::WsManager;

const HEARTBEAT_INTERVAL_SECS: u64 = 30;

/// Spawns a task that pings every connected socket on a fixed interval.
pub fn start_heartbeat(ws_manager: Arc<WsManager>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(HEARTBEAT_INTERVAL_SECS));

        loop {
            interval.tick().await;
            let count = ws_manager.connection_count().await;
            tracing::debug!(count, "WebSocket heartbeat ping");
            ws_manager.ping_all().await;
        }
    })
}
