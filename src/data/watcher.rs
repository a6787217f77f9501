//! Background thread that polls the data sources for changes.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{RecvTimeoutError, Sender, bounded};
use log::{debug, warn};

use crate::data::store::DataStore;
use crate::error::{HassyError, Result};

/// Handle to a running watcher thread. Dropping it stops the thread.
pub struct WatcherHandle {
    shutdown: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl WatcherHandle {
    /// Stop the watcher and wait for its thread to exit.
    pub fn stop(mut self) -> Result<()> {
        self.shutdown_and_join()
    }

    fn shutdown_and_join(&mut self) -> Result<()> {
        // Dropping the sender disconnects the channel and wakes the thread.
        self.shutdown.take();
        if let Some(thread) = self.thread.take() {
            thread
                .join()
                .map_err(|_| HassyError::other("data watcher thread panicked"))?;
        }
        Ok(())
    }
}

impl Drop for WatcherHandle {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown_and_join() {
            warn!("{e}");
        }
    }
}

/// Check `store` for source changes every `interval` on a background thread.
pub fn spawn_watcher(store: Arc<DataStore>, interval: Duration) -> Result<WatcherHandle> {
    let (shutdown_tx, shutdown_rx) = bounded::<()>(0);

    let thread = thread::Builder::new()
        .name("hassy-data-watcher".to_string())
        .spawn(move || {
            debug!("Data watcher started with interval {interval:?}");
            loop {
                match shutdown_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if let Err(e) = store.check_for_changes() {
                            warn!("Keeping data version {}: {}", store.version(), e);
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            debug!("Data watcher stopped");
        })?;

    Ok(WatcherHandle {
        shutdown: Some(shutdown_tx),
        thread: Some(thread),
    })
}
