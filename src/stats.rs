//! Aggregate counters across normalization calls.

use std::collections::BTreeMap;

use ahash::AHashMap;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::diff::segment::percentage;
use crate::normalizer::result::NormalizationResult;

/// The word counters alone, cheap enough to take on every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total_words: u64,
    pub changed_words: u64,
    pub unchanged_words: u64,
    /// Rounded to one decimal; 0.0 when no words were counted.
    pub change_percentage: f64,
    /// Snapshot version of the most recently recorded result.
    pub last_snapshot_version: Option<u64>,
}

/// Point-in-time copy of the collected statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub total_words: u64,
    pub changed_words: u64,
    pub unchanged_words: u64,
    /// Rounded to one decimal; 0.0 when no words were counted.
    pub change_percentage: f64,
    /// Occurrences of each word no data entry or rule applied to.
    pub unknown_variants: BTreeMap<String, u64>,
    /// Snapshot version of the most recently recorded result.
    pub last_snapshot_version: Option<u64>,
    /// When counting started (creation or last reset).
    pub since: DateTime<Utc>,
}

#[derive(Debug, Default, Clone, Copy)]
struct WordCounts {
    total: u64,
    changed: u64,
    // 0 means nothing recorded; snapshot versions start at 1
    last_version: u64,
}

impl WordCounts {
    fn summary(&self) -> StatsSummary {
        StatsSummary {
            total_words: self.total,
            changed_words: self.changed,
            unchanged_words: self.total - self.changed,
            change_percentage: percentage(self.changed, self.total),
            last_snapshot_version: (self.last_version != 0).then_some(self.last_version),
        }
    }
}

/// Thread-safe collector of word statistics.
///
/// The counters of one result are added under a short lock of their own, so
/// readers never see a half-counted result. The unknown-word map has its own
/// mutex. Recording and reading share an epoch read lock; only
/// [`StatsCollector::clear`] takes it exclusively, so a result is either
/// counted entirely or not at all.
#[derive(Debug)]
pub struct StatsCollector {
    counts: Mutex<WordCounts>,
    unknown: Mutex<AHashMap<String, u64>>,
    since: Mutex<DateTime<Utc>>,
    epoch: RwLock<()>,
}

impl Default for StatsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsCollector {
    pub fn new() -> Self {
        StatsCollector {
            counts: Mutex::new(WordCounts::default()),
            unknown: Mutex::new(AHashMap::new()),
            since: Mutex::new(Utc::now()),
            epoch: RwLock::new(()),
        }
    }

    /// Count the words of one result.
    pub fn record(&self, result: &NormalizationResult) {
        let _epoch = self.epoch.read();

        {
            let mut counts = self.counts.lock();
            counts.total += result.word_count() as u64;
            counts.changed += result.changed_count() as u64;
            counts.last_version = result.snapshot_version;
        }

        let mut unknown_words = result.unknown_words().peekable();
        if unknown_words.peek().is_some() {
            let mut unknown = self.unknown.lock();
            for word in unknown_words {
                *unknown.entry(word.to_string()).or_insert(0) += 1;
            }
        }
    }

    /// Share of changed words, rounded to one decimal.
    pub fn change_percentage(&self) -> f64 {
        self.summary().change_percentage
    }

    /// The counters without the unknown-word map. Constant time.
    pub fn summary(&self) -> StatsSummary {
        let _epoch = self.epoch.read();
        self.counts.lock().summary()
    }

    /// Copy of all counters and the unknown-word map.
    ///
    /// Results recorded while the copy is taken may show up in the counters
    /// but not yet in the map.
    pub fn snapshot(&self) -> Stats {
        let _epoch = self.epoch.read();

        let summary = self.counts.lock().summary();
        let unknown_variants = self
            .unknown
            .lock()
            .iter()
            .map(|(word, count)| (word.clone(), *count))
            .collect();

        Stats {
            total_words: summary.total_words,
            changed_words: summary.changed_words,
            unchanged_words: summary.unchanged_words,
            change_percentage: summary.change_percentage,
            unknown_variants,
            last_snapshot_version: summary.last_snapshot_version,
            since: *self.since.lock(),
        }
    }

    /// Unknown words with their counts, most frequent first, ties in
    /// lexicographic order.
    pub fn unknown_words(&self) -> Vec<(String, u64)> {
        let mut words: Vec<(String, u64)> = {
            let _epoch = self.epoch.read();
            self.unknown
                .lock()
                .iter()
                .map(|(word, count)| (word.clone(), *count))
                .collect()
        };
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        words
    }

    /// Reset every counter and restart the `since` clock.
    pub fn clear(&self) {
        let _epoch = self.epoch.write();
        *self.counts.lock() = WordCounts::default();
        self.unknown.lock().clear();
        *self.since.lock() = Utc::now();
    }
}
