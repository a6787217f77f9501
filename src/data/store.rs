//! Hot-reloadable store of normalization data.
//!
//! The [`DataStore`] keeps the current [`Snapshot`] behind an `ArcSwap`:
//!
//! - Reads happen on every normalization call and never lock
//! - Reloads build a complete new snapshot off to the side, then swap it in
//! - A reader that already holds an `Arc<Snapshot>` keeps using it until it
//!   is done, even if a reload lands in the meantime
//!
//! A failed reload leaves the previous snapshot in service.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use log::{info, warn};
use parking_lot::Mutex;

use crate::config::HassyConfig;
use crate::data::loader::{load_files, source_markers};
use crate::data::snapshot::{ExceptionSet, Snapshot, SourceMarkers, VariantMap};
use crate::error::{HassyError, Result};

/// Where a file-backed store reads its data from.
#[derive(Debug, Clone)]
pub struct DataSources {
    /// Path of the JSON Lines variant source.
    pub variants_path: PathBuf,
    /// Path of the JSON exception source.
    pub exceptions_path: PathBuf,
    /// Expand exception words with their `ة`/`ه` counterpart.
    pub expand_taa_marbuta: bool,
}

impl DataSources {
    /// Data sources named by a configuration.
    pub fn from_config(config: &HassyConfig) -> Self {
        DataSources {
            variants_path: config.variants_path.clone(),
            exceptions_path: config.exceptions_path.clone(),
            expand_taa_marbuta: config.expand_taa_marbuta_exceptions,
        }
    }

    fn markers(&self) -> Result<SourceMarkers> {
        source_markers(&self.variants_path, &self.exceptions_path)
            .map_err(|e| HassyError::data_load(e.to_string()))
    }

    // `markers` must be read before parsing so a write racing the parse is
    // picked up by the next check.
    fn load(&self, version: u64, markers: SourceMarkers) -> Result<Snapshot> {
        let (variants, exceptions) = load_files(
            &self.variants_path,
            &self.exceptions_path,
            self.expand_taa_marbuta,
        )?;
        Ok(Snapshot::new(version, variants, exceptions, Some(markers)))
    }
}

/// Store of versioned snapshots with change detection and reload.
pub struct DataStore {
    sources: Option<DataSources>,
    current: ArcSwap<Snapshot>,
    check_interval: Duration,
    last_check: Mutex<Instant>,
    reload_lock: Mutex<()>,
    failed_markers: Mutex<Option<SourceMarkers>>,
}

impl DataStore {
    /// Load the sources and create a store serving version 1.
    ///
    /// Fails with [`HassyError::DataLoad`]; without a valid first snapshot
    /// there is nothing to serve.
    pub fn open(sources: DataSources, check_interval: Duration) -> Result<Self> {
        let snapshot = sources
            .markers()
            .and_then(|markers| sources.load(1, markers))
            .map_err(|e| match e {
                HassyError::DataLoad(_) => e,
                other => HassyError::data_load(other.to_string()),
            })?;
        info!(
            "Data store opened at version 1 ({} variants, {} exceptions)",
            snapshot.variants().len(),
            snapshot.exceptions().len()
        );

        Ok(DataStore {
            sources: Some(sources),
            current: ArcSwap::from_pointee(snapshot),
            check_interval,
            last_check: Mutex::new(Instant::now()),
            reload_lock: Mutex::new(()),
            failed_markers: Mutex::new(None),
        })
    }

    /// Create a file-backed store from a configuration.
    pub fn from_config(config: &HassyConfig) -> Result<Self> {
        Self::open(
            DataSources::from_config(config),
            config.reload_check_interval,
        )
    }

    /// Create a store over in-memory data. It never checks files; new data
    /// is installed with [`DataStore::install`].
    pub fn in_memory(variants: VariantMap, exceptions: ExceptionSet) -> Self {
        Self::from_snapshot(Snapshot::new(1, variants, exceptions, None))
    }

    /// Create an in-memory store serving `snapshot` as is.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        DataStore {
            sources: None,
            current: ArcSwap::from_pointee(snapshot),
            check_interval: Duration::MAX,
            last_check: Mutex::new(Instant::now()),
            reload_lock: Mutex::new(()),
            failed_markers: Mutex::new(None),
        }
    }

    /// Create an in-memory store with no data.
    pub fn empty() -> Self {
        Self::in_memory(VariantMap::new(), ExceptionSet::new())
    }

    /// The latest valid snapshot.
    ///
    /// At most once per check interval this also looks at the source files
    /// and reloads them if they changed. If another caller is already
    /// checking, the current snapshot is returned without waiting.
    pub fn current(&self) -> Arc<Snapshot> {
        self.maybe_check();
        self.current.load_full()
    }

    /// The latest snapshot, without looking at the files.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Version of the snapshot currently in service.
    pub fn version(&self) -> u64 {
        self.current.load().version()
    }

    /// The configured sources, if this store is file-backed.
    pub fn sources(&self) -> Option<&DataSources> {
        self.sources.as_ref()
    }

    fn maybe_check(&self) {
        if self.sources.is_none() {
            return;
        }
        let Some(mut last_check) = self.last_check.try_lock() else {
            return;
        };
        if last_check.elapsed() < self.check_interval {
            return;
        }
        *last_check = Instant::now();
        drop(last_check);

        if let Err(e) = self.check_for_changes() {
            warn!("Keeping data version {}: {}", self.version(), e);
        }
    }

    /// Reload if the source markers differ from the serving snapshot's.
    ///
    /// Returns `Ok(true)` when a new snapshot was installed. Markers that
    /// already failed to load are not retried until the files change again.
    pub fn check_for_changes(&self) -> Result<bool> {
        let Some(sources) = &self.sources else {
            return Ok(false);
        };

        let markers = source_markers(&sources.variants_path, &sources.exceptions_path)
            .map_err(|e| HassyError::data_reload(e.to_string()))?;
        if self.current.load().markers() == Some(markers) {
            return Ok(false);
        }
        if *self.failed_markers.lock() == Some(markers) {
            return Ok(false);
        }

        self.reload().map(|_| true)
    }

    /// Parse the sources anew and install the result.
    ///
    /// On failure the previous snapshot stays in service and the error is
    /// returned as [`HassyError::DataReload`]. In-memory stores return the
    /// current snapshot unchanged.
    pub fn reload(&self) -> Result<Arc<Snapshot>> {
        let Some(sources) = &self.sources else {
            return Ok(self.current.load_full());
        };
        self.reload_with(|version, markers| sources.load(version, markers))
    }

    fn reload_with<F>(&self, load: F) -> Result<Arc<Snapshot>>
    where
        F: FnOnce(u64, SourceMarkers) -> Result<Snapshot>,
    {
        let _guard = self.reload_lock.lock();
        let previous = self.current.load_full();
        let version = previous.version() + 1;

        let Some(sources) = &self.sources else {
            return Ok(previous);
        };
        let markers = match sources.markers() {
            Ok(markers) => markers,
            Err(e) => return Err(reload_failed(previous.version(), e)),
        };

        match load(version, markers) {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                self.current.store(Arc::clone(&snapshot));
                *self.failed_markers.lock() = None;
                info!(
                    "Data reloaded: version {} -> {} ({} variants, {} exceptions)",
                    previous.version(),
                    version,
                    snapshot.variants().len(),
                    snapshot.exceptions().len()
                );
                Ok(snapshot)
            }
            Err(e) => {
                // Only the files as this parse saw them are known bad; they
                // may have been rewritten since.
                *self.failed_markers.lock() = Some(markers);
                Err(reload_failed(previous.version(), e))
            }
        }
    }

    /// Install new in-memory data as the next version.
    pub fn install(&self, variants: VariantMap, exceptions: ExceptionSet) -> Arc<Snapshot> {
        let _guard = self.reload_lock.lock();
        let version = self.current.load().version() + 1;
        let snapshot = Arc::new(Snapshot::new(version, variants, exceptions, None));
        self.current.store(Arc::clone(&snapshot));
        info!("Installed in-memory data as version {version}");
        snapshot
    }

    /// Re-publish the current data under a new version number.
    ///
    /// Everything keyed to the old version (cached words) stops being served.
    pub fn bump_version(&self) -> Arc<Snapshot> {
        let _guard = self.reload_lock.lock();
        let previous = self.current.load_full();
        let snapshot = Arc::new(previous.with_version(previous.version() + 1));
        self.current.store(Arc::clone(&snapshot));
        snapshot
    }
}

fn reload_failed(serving: u64, e: HassyError) -> HassyError {
    let err = e.into_reload();
    warn!("Reload failed, still serving version {serving}: {err}");
    err
}

impl std::fmt::Debug for DataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataStore")
            .field("sources", &self.sources)
            .field("version", &self.version())
            .field("check_interval", &self.check_interval)
            .finish()
    }
}
