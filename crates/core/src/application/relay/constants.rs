// Relay constants (no magic values)
use std::time::Duration;

/// Sleep between polls when the outbox is empty (500ms)
pub const IDLE_SLEEP_DURATION: Duration = Duration::from_millis(500);

/// Sleep after a relay error before the next attempt (1s)
pub const ERROR_RECOVERY_SLEEP_DURATION: Duration = Duration::from_secs(1);

/// Maximum outbox rows handed to the queue per drain
pub const DISPATCH_BATCH_SIZE: i64 = 32;
