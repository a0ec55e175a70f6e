use super::{Command, CommandError, Context};
use crate::config;
use crate::db::PgStore;
use crate::sync::{Scheduler, SyncJob};
use log::{error, info};
use std::sync::Arc;
use tokio::runtime;

static COMMAND: &str = "agg";

/// Polls feeds until Ctrl-C or SIGTERM.
pub struct Agg {}

impl Agg {
    pub fn command() -> &'static str {
        COMMAND
    }
}

impl Command for Agg {
    fn command(&self) -> &'static str {
        Self::command()
    }

    fn usage(&self) -> &'static str {
        "agg <interval>"
    }

    fn response(&self, context: &Context, args: &[String]) -> Result<String, CommandError> {
        self.expect_args(args, 1)?;

        let interval = config::parse_interval(&args[0])?;

        let store = Arc::new(PgStore::new(context.pool.clone()));
        let job = SyncJob::new(
            store.clone(),
            store,
            context.config.sync_workers,
            context.config.sync_lease,
        );
        let scheduler = Scheduler::new(job, interval);

        let tokio_runtime = runtime::Builder::new_multi_thread()
            .thread_name("sync-pool")
            .worker_threads(2)
            .max_blocking_threads(context.config.sync_workers + 1)
            .enable_all()
            .build()
            .map_err(|error| CommandError::Runtime {
                msg: error.to_string(),
            })?;

        let cycles = tokio_runtime.block_on(scheduler.run(shutdown_signal()));

        info!("Scheduler stopped");

        Ok(format!("Stopped after {} sync cycles", cycles))
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", error);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                error!("Failed to listen for SIGTERM: {}", error);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
