use crate::sync::sync_job::SyncJob;
use log::{error, info};
use std::future::Future;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};

/// Runs a `SyncJob` on a fixed interval until shutdown.
pub struct Scheduler {
    job: SyncJob,
    interval: Duration,
}

impl Scheduler {
    pub fn new(job: SyncJob, interval: Duration) -> Self {
        Self { job, interval }
    }

    /// Shutdown is only observed between cycles, a running cycle always finishes.
    /// Returns the number of cycles run.
    pub async fn run<F>(&self, shutdown: F) -> usize
    where
        F: Future<Output = ()>,
    {
        info!("Collecting feeds every {:?}", self.interval);

        let mut interval = time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tokio::pin!(shutdown);

        let mut cycles = 0;

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping after {} cycles", cycles);
                    break;
                }
                _ = interval.tick() => {}
            }

            self.run_cycle().await;
            cycles += 1;
        }

        cycles
    }

    async fn run_cycle(&self) {
        if let Err(error) = self.job.execute().await {
            error!("Sync cycle failed: {}", error);
        }
    }
}
