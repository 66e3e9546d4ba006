/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Maximum optimistic-concurrency retries for ticket mutations
pub const MAX_VERSION_RETRIES: u32 = 3;

/// Polling interval for the notification outbox worker (seconds)
pub const OUTBOX_POLL_INTERVAL_SECS: u64 = 5;

/// Batch size drained from the outbox per poll
pub const OUTBOX_BATCH_SIZE: i64 = 20;
