//! Event hub and streaming configuration.

use serde::{Deserialize, Serialize};

/// Event hub (SSE push) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Outbound channel buffer size per subscriber.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// How long a publish waits on one subscriber before evicting it,
    /// in milliseconds.
    #[serde(default = "default_publish_timeout")]
    pub publish_timeout_ms: u64,
    /// Idle heartbeat interval for open streams in seconds.
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_seconds: u64,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: default_channel_buffer(),
            publish_timeout_ms: default_publish_timeout(),
            heartbeat_interval_seconds: default_heartbeat_interval(),
        }
    }
}

fn default_channel_buffer() -> usize {
    10
}

fn default_publish_timeout() -> u64 {
    1000
}

fn default_heartbeat_interval() -> u64 {
    3
}
