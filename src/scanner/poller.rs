use reqwest::Client;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::food::types::IngredientSet;
use crate::scanner::{ScanError, ScanSource};

/// Re-reads the scan artifact on a fixed interval and publishes a freshly
/// extracted [`IngredientSet`] whenever its `raw_output` changes.
pub struct ScanPoller {
    source: ScanSource,
    interval: Duration,
    client: Client,
}

/// Stops the polling task. Dropping the handle also ends the task.
pub struct PollerHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Err(e) = self.task.await {
            log::warn!("Scan poller ended abnormally: {}", e);
        }
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl ScanPoller {
    pub fn new(source: ScanSource, interval: Duration, client: Client) -> Self {
        Self {
            source,
            interval,
            client,
        }
    }

    /// Starts polling. The receiver starts out holding an empty set.
    pub fn spawn(self) -> (PollerHandle, watch::Receiver<IngredientSet>) {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let (set_tx, set_rx) = watch::channel(IngredientSet::new());

        let task = tokio::spawn(async move {
            log::info!("Polling {} every {:?}", self.source, self.interval);
            let mut interval = tokio::time::interval(self.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut last_raw: Option<String> = None;

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        // A read in flight must not delay shutdown.
                        let read = tokio::select! {
                            result = self.source.read_artifact(&self.client) => result,
                            _ = shutdown_rx.recv() => {
                                log::debug!("Scan poller stopped during a read");
                                break;
                            }
                        };
                        match read {
                            Ok(artifact) => {
                                if last_raw.as_deref() == Some(artifact.raw_output.as_str()) {
                                    continue;
                                }
                                let set = artifact.ingredients();
                                log::info!("New scan with {} ingredient(s)", set.len());
                                last_raw = Some(artifact.raw_output);
                                if set_tx.send(set).is_err() {
                                    log::debug!("Scan receiver dropped, stopping poller");
                                    break;
                                }
                            }
                            Err(ScanError::NotFound(_)) => {
                                log::debug!("No scan at {} yet", self.source);
                            }
                            Err(e) => log::warn!("Scan poll failed: {}", e),
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        log::debug!("Scan poller received shutdown signal");
                        break;
                    }
                }
            }
        });

        (PollerHandle { shutdown_tx, task }, set_rx)
    }
}
