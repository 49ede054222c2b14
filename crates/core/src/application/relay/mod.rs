// Outbox Relay - drains committed outbox rows into the queue

pub mod constants;
mod shutdown;

pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};

use constants::*;

use crate::error::Result;
use crate::port::{OutboxRepository, QueueGateway, TimeProvider};
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// Background relay: the second phase of the durable submission path.
///
/// Submission commits the task row and its queue payload together; this loop
/// hands the payloads to the queue afterwards. A row is only stamped
/// `dispatched_at` after the queue accepts it, so delivery is at-least-once:
/// a crash between enqueue and stamp replays the message on the next drain.
pub struct OutboxRelay {
    outbox: Arc<dyn OutboxRepository>,
    queue: Arc<dyn QueueGateway>,
    time_provider: Arc<dyn TimeProvider>,
}

impl OutboxRelay {
    pub fn new(
        outbox: Arc<dyn OutboxRepository>,
        queue: Arc<dyn QueueGateway>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            outbox,
            queue,
            time_provider,
        }
    }

    /// Run the relay loop with graceful shutdown support.
    pub async fn run(&self, mut shutdown: ShutdownToken) -> Result<()> {
        info!("Outbox relay started");
        loop {
            if shutdown.is_shutdown() {
                info!("Outbox relay shutting down");
                break;
            }
            match self.drain_once().await {
                Ok(dispatched) => {
                    if dispatched == 0 {
                        tokio::select! {
                            _ = sleep(IDLE_SLEEP_DURATION) => {},
                            _ = shutdown.wait() => {
                                info!("Outbox relay interrupted during idle");
                                break;
                            }
                        }
                    }
                }
                Err(e) => {
                    error!("Outbox relay error: {}", e);
                    tokio::select! {
                        _ = sleep(ERROR_RECOVERY_SLEEP_DURATION) => {},
                        _ = shutdown.wait() => {
                            info!("Outbox relay interrupted during error recovery");
                            break;
                        }
                    }
                }
            }
        }
        info!("Outbox relay stopped");
        Ok(())
    }

    /// Dispatch one batch of undispatched rows, oldest first.
    ///
    /// An enqueue failure stops the batch and leaves the row undispatched;
    /// the next tick retries it, keeping per-queue ordering intact. Returns
    /// the number of rows handed to the queue.
    pub async fn drain_once(&self) -> Result<usize> {
        let batch = self.outbox.fetch_undispatched(DISPATCH_BATCH_SIZE).await?;
        let mut dispatched = 0usize;

        for row in batch {
            match self.queue.enqueue(&row.payload, &row.queue, 0).await {
                Ok(msg_id) => {
                    self.outbox
                        .mark_dispatched(row.id, self.time_provider.now_millis())
                        .await?;
                    dispatched += 1;
                    debug!(
                        outbox_id = row.id,
                        task_id = %row.task_id,
                        queue = %row.queue,
                        msg_id,
                        "outbox row dispatched"
                    );
                }
                Err(e) => {
                    warn!(
                        outbox_id = row.id,
                        task_id = %row.task_id,
                        queue = %row.queue,
                        "enqueue failed, row retried next tick: {}", e
                    );
                    break;
                }
            }
        }

        Ok(dispatched)
    }
}
