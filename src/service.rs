//! The facade front ends talk to.
//!
//! [`HassyService`] owns one data store, one normalizer and one stats
//! collector for the life of the process. It validates input, normalizes,
//! builds and renders the diff, and counts the result.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use hassy::config::HassyConfig;
//! use hassy::data::DataStore;
//! use hassy::diff::RenderTarget;
//! use hassy::service::HassyService;
//!
//! let service = HassyService::from_store(Arc::new(DataStore::empty()), HassyConfig::default());
//! let response = service.normalize_text("قال الرجل", RenderTarget::Plain).unwrap();
//! assert_eq!(response.normalized, "كال الرجل");
//! assert_eq!(response.stats.total_words, 2);
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info};
use parking_lot::Mutex;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::HassyConfig;
use crate::data::store::DataStore;
use crate::data::watcher::{WatcherHandle, spawn_watcher};
use crate::diff::render::{
    AnsiRenderConfig, HtmlRenderConfig, RenderTarget, render_ansi, render_html,
};
use crate::diff::segment::{ChangeSummary, DiffSegment, change_summary, word_diff};
use crate::error::{HassyError, Result};
use crate::normalizer::cache::CacheStats;
use crate::normalizer::engine::Normalizer;
use crate::normalizer::result::NormalizationResult;
use crate::stats::{Stats, StatsCollector, StatsSummary};

/// Everything a front end shows for one normalized text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizeResponse {
    pub original: String,
    pub normalized: String,
    /// The diff rendered for `target`.
    pub rendered: String,
    pub target: RenderTarget,
    pub segments: Vec<DiffSegment>,
    pub summary: ChangeSummary,
    /// Aggregate counters including this call. The unknown-word map is
    /// only available from [`HassyService::get_stats`].
    pub stats: StatsSummary,
    pub snapshot_version: u64,
}

/// Description of the data currently in service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataInfo {
    pub version: u64,
    pub variants_loaded: usize,
    pub canonical_forms: usize,
    pub exceptions_loaded: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Process-wide normalization service.
pub struct HassyService {
    config: HassyConfig,
    store: Arc<DataStore>,
    normalizer: Normalizer,
    stats: StatsCollector,
    html: HtmlRenderConfig,
    ansi: AnsiRenderConfig,
    watcher: Mutex<Option<WatcherHandle>>,
}

impl HassyService {
    /// Load the configured data files and build the service.
    ///
    /// Fails with [`HassyError::DataLoad`] if the files cannot be loaded,
    /// or [`HassyError::Config`] if `config` is invalid.
    pub fn new(config: HassyConfig) -> Result<Self> {
        config.validate()?;
        let store = DataStore::from_config(&config)?;
        Ok(Self::from_store(Arc::new(store), config))
    }

    /// Build the service over an existing store.
    pub fn from_store(store: Arc<DataStore>, config: HassyConfig) -> Self {
        let normalizer = Normalizer::with_config(Arc::clone(&store), &config);
        HassyService {
            config,
            store,
            normalizer,
            stats: StatsCollector::new(),
            html: HtmlRenderConfig::default(),
            ansi: AnsiRenderConfig::default(),
            watcher: Mutex::new(None),
        }
    }

    pub fn with_html_config(mut self, html: HtmlRenderConfig) -> Self {
        self.html = html;
        self
    }

    pub fn with_ansi_config(mut self, ansi: AnsiRenderConfig) -> Self {
        self.ansi = ansi;
        self
    }

    pub fn config(&self) -> &HassyConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<DataStore> {
        &self.store
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Reject empty, whitespace-only, and oversized input.
    pub fn validate_text(&self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(HassyError::validation("text is empty"));
        }
        let length = text.chars().count();
        if length > self.config.max_text_length {
            return Err(HassyError::validation(format!(
                "text is {} characters long; the limit is {}",
                length, self.config.max_text_length
            )));
        }
        Ok(())
    }

    /// Validate, normalize and count `text`.
    pub fn normalize(&self, text: &str) -> Result<NormalizationResult> {
        self.validate_text(text)?;
        let result = self.normalizer.normalize_text(text)?;
        self.stats.record(&result);
        Ok(result)
    }

    /// Normalize `text` and render its diff for `target`.
    pub fn normalize_text(&self, text: &str, target: RenderTarget) -> Result<NormalizeResponse> {
        let result = self.normalize(text)?;
        let segments = word_diff(&result);
        let rendered = self.render(&segments, target);

        Ok(NormalizeResponse {
            summary: change_summary(&segments),
            stats: self.stats.summary(),
            snapshot_version: result.snapshot_version,
            original: result.original,
            normalized: result.normalized,
            rendered,
            target,
            segments,
        })
    }

    /// Render `segments` with this service's HTML and terminal settings.
    pub fn render(&self, segments: &[DiffSegment], target: RenderTarget) -> String {
        match target {
            RenderTarget::Html => render_html(segments, &self.html),
            RenderTarget::Ansi => render_ansi(segments, &self.ansi),
            RenderTarget::Plain => segments.iter().map(|s| s.normalized.as_str()).collect(),
        }
    }

    /// Normalize many texts in parallel. Each text is validated on its own;
    /// one rejected text does not affect the others.
    pub fn normalize_batch<S>(
        &self,
        texts: &[S],
        target: RenderTarget,
    ) -> Vec<Result<NormalizeResponse>>
    where
        S: AsRef<str> + Sync,
    {
        texts
            .par_iter()
            .map(|text| self.normalize_text(text.as_ref(), target))
            .collect()
    }

    pub fn get_stats(&self) -> Stats {
        self.stats.snapshot()
    }

    /// Unknown words, most frequent first.
    pub fn unknown_words(&self) -> Vec<(String, u64)> {
        self.stats.unknown_words()
    }

    pub fn reset_stats(&self) {
        self.stats.clear();
        info!("Statistics reset");
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.normalizer.cache_stats()
    }

    pub fn clear_cache(&self) {
        self.normalizer.clear_cache();
        info!("Word cache cleared");
    }

    /// Reload the data files now.
    ///
    /// On [`HassyError::DataReload`] the previous data stays in service.
    pub fn reload(&self) -> Result<DataInfo> {
        let snapshot = self.store.reload()?;
        debug!("Serving data version {}", snapshot.version());
        Ok(self.data_info())
    }

    pub fn data_info(&self) -> DataInfo {
        let snapshot = self.store.snapshot();
        DataInfo {
            version: snapshot.version(),
            variants_loaded: snapshot.variants().len(),
            canonical_forms: snapshot.variants().canonical_count(),
            exceptions_loaded: snapshot.exceptions().len(),
            loaded_at: snapshot.loaded_at(),
        }
    }

    /// Poll the data files on a background thread at the configured
    /// interval. Calling it again replaces the running watcher.
    pub fn start_watcher(&self) -> Result<()> {
        let handle = spawn_watcher(Arc::clone(&self.store), self.config.reload_check_interval)?;
        if let Some(previous) = self.watcher.lock().replace(handle) {
            previous.stop()?;
        }
        Ok(())
    }

    pub fn stop_watcher(&self) -> Result<()> {
        match self.watcher.lock().take() {
            Some(handle) => handle.stop(),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for HassyService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HassyService")
            .field("config", &self.config)
            .field("normalizer", &self.normalizer)
            .finish()
    }
}
