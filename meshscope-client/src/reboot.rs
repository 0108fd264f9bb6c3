use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::api::NodeClient;
use crate::error::ClientError;

pub const DEFAULT_DELAY: Duration = Duration::from_secs(5);
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);

/// Something that tells whether the node answers again.
pub trait StatusProbe {
    fn probe(&self) -> impl Future<Output = Result<(), ClientError>> + Send;
}

impl StatusProbe for NodeClient {
    fn probe(&self) -> impl Future<Output = Result<(), ClientError>> + Send {
        async move { self.status_report().await.map(|_| ()) }
    }
}

/// Polls a rebooting node until it answers, at a fixed interval.
#[derive(Debug, Clone, Copy)]
pub struct RebootPoller {
    delay: Duration,
    interval: Duration,
}

impl RebootPoller {
    pub fn new(delay: Duration, interval: Duration) -> Self {
        Self { delay, interval }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits `delay`, then probes every `interval` until a probe succeeds.
    ///
    /// Returns the number of probes sent. There is no attempt limit; the
    /// loop ends only on success or when `cancel` fires.
    pub async fn wait_until_up<P: StatusProbe>(
        &self,
        probe: &P,
        cancel: &CancellationToken,
    ) -> Result<u32, ClientError> {
        tokio::select! {
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
            _ = tokio::time::sleep(self.delay) => {}
        }

        let mut attempts: u32 = 0;
        loop {
            attempts += 1;

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    log::info!("Reboot poll cancelled after {} attempt(s)", attempts - 1);
                    return Err(ClientError::Cancelled);
                }
                result = probe.probe() => match result {
                    Ok(()) => {
                        log::info!("Node is back after {} attempt(s)", attempts);
                        return Ok(attempts);
                    }
                    Err(e) => log::debug!("Node not up yet (attempt {}): {}", attempts, e),
                },
            }

            tokio::select! {
                _ = cancel.cancelled() => return Err(ClientError::Cancelled),
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }
}

impl Default for RebootPoller {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY, DEFAULT_INTERVAL)
    }
}
