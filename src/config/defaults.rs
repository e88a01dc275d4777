//! Default configuration values
//!
//! Centralized so serde defaults and `Default` impls cannot drift apart.

/// Baud rate the bridge firmware runs its serial link at
pub fn baud_rate() -> u32 {
    921_600
}

/// Blocking-read timeout per attempt (milliseconds)
pub fn read_timeout_ms() -> u64 {
    2_000
}

/// Idle sleep between polls after an empty or timed-out read (milliseconds)
pub fn idle_poll_ms() -> u64 {
    100
}

/// Seconds between drop-count summaries
pub fn report_interval_secs() -> u64 {
    1
}

/// Whether ports are provisioned over AT commands before monitoring
pub fn provision() -> bool {
    true
}

/// Pause after each provisioning command (milliseconds)
pub fn settle_ms() -> u64 {
    1_000
}

/// Service UUID the bridge firmware publishes notifications under
pub fn service_uuid() -> String {
    "4fafc201-1fb5-459e-8fcc-c5c9c331914b".to_string()
}

/// Notification characteristic within the service
pub fn characteristic_uuid() -> String {
    "beb5483e-36e1-4688-b7f5-ea07361b26a8".to_string()
}
