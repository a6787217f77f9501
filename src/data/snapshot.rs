//! Immutable, versioned copies of the normalization data.
//!
//! A [`Snapshot`] bundles one [`VariantMap`] and one [`ExceptionSet`] under a
//! version number. Snapshots are never mutated once built; a reload builds a
//! new one and the store swaps the pointer.

use std::time::SystemTime;

use ahash::{AHashMap, AHashSet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::rules::taa_marbuta::{HAA, TAA_MARBUTA};
use crate::analysis::tokenizer::letter_run::LetterRunTokenizer;
use crate::error::{HassyError, Result};

/// One record of the variant source: a canonical form and its variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRecord {
    /// The standardized spelling.
    pub canonical: String,
    /// Non-standard spellings that normalize to `canonical`.
    pub variants: Vec<String>,
}

// Entries are matched against single word tokens, so anything else could
// never match, or would rewrite one word into several.
fn check_word(role: &str, word: &str) -> Result<()> {
    if word.trim().is_empty() {
        return Err(HassyError::data_load(format!("{role} must be a non-empty string")));
    }
    if !LetterRunTokenizer::new().is_single_word(word) {
        return Err(HassyError::data_load(format!(
            "{role} '{word}' is not a single word"
        )));
    }
    Ok(())
}

/// Mapping from variant spelling to canonical spelling.
///
/// Many variants may share a canonical form, but each variant has exactly
/// one canonical form.
#[derive(Debug, Clone, Default)]
pub struct VariantMap {
    entries: AHashMap<String, String>,
    canonicals: AHashSet<String>,
}

impl VariantMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from records, rejecting conflicting or empty entries.
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = VariantRecord>,
    {
        let mut map = VariantMap::new();
        for record in records {
            map.insert_record(&record)?;
        }
        Ok(map)
    }

    /// Add every variant of `record`.
    pub fn insert_record(&mut self, record: &VariantRecord) -> Result<()> {
        check_word("canonical", &record.canonical)?;
        for variant in &record.variants {
            self.insert(variant, &record.canonical)?;
        }
        self.canonicals.insert(record.canonical.clone());
        Ok(())
    }

    /// Map `variant` to `canonical`.
    ///
    /// Returns `Ok(false)` when the identical mapping already exists and
    /// fails when `variant` already maps to a different canonical form.
    pub fn insert(&mut self, variant: &str, canonical: &str) -> Result<bool> {
        check_word("variant", variant)?;
        check_word("canonical", canonical)?;

        match self.entries.get(variant) {
            Some(existing) if existing == canonical => Ok(false),
            Some(existing) => Err(HassyError::data_load(format!(
                "variant '{variant}' maps to both '{existing}' and '{canonical}'"
            ))),
            None => {
                self.entries.insert(variant.to_string(), canonical.to_string());
                self.canonicals.insert(canonical.to_string());
                Ok(true)
            }
        }
    }

    /// Canonical form of `variant`, if any.
    pub fn get(&self, variant: &str) -> Option<&str> {
        self.entries.get(variant).map(String::as_str)
    }

    /// Whether `word` is the canonical form of some record.
    pub fn is_canonical(&self, word: &str) -> bool {
        self.canonicals.contains(word)
    }

    /// Number of variant entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct canonical forms.
    pub fn canonical_count(&self) -> usize {
        self.canonicals.len()
    }

    /// Iterate over `(variant, canonical)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(v, c)| (v.as_str(), c.as_str()))
    }
}

/// Words exempt from letter rules.
#[derive(Debug, Clone, Default)]
pub struct ExceptionSet {
    words: AHashSet<String>,
}

impl ExceptionSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from words, rejecting empty strings.
    pub fn from_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = ExceptionSet::new();
        for word in words {
            set.insert(word)?;
        }
        Ok(set)
    }

    /// Add a word. Returns `Ok(false)` if it was already present.
    pub fn insert<S: Into<String>>(&mut self, word: S) -> Result<bool> {
        let word = word.into();
        if word.trim().is_empty() {
            return Err(HassyError::data_load("exception words must be non-empty strings"));
        }
        Ok(self.words.insert(word))
    }

    /// Register the `ه` spelling of each word ending in `ة`, and the reverse.
    ///
    /// Returns the number of words added.
    pub fn expand_taa_marbuta(&mut self) -> usize {
        let added: Vec<String> = self
            .words
            .iter()
            .filter_map(|word| {
                if let Some(stem) = word.strip_suffix(TAA_MARBUTA) {
                    Some(format!("{stem}{HAA}"))
                } else {
                    word.strip_suffix(HAA)
                        .map(|stem| format!("{stem}{TAA_MARBUTA}"))
                }
            })
            .filter(|alt| !self.words.contains(alt))
            .collect();

        let count = added.len();
        self.words.extend(added);
        count
    }

    /// Whether `word` is an exception.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterate over the words in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

/// Modification marker of one source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMarker {
    /// Last modification time, when the platform reports one.
    pub modified: Option<SystemTime>,
    /// File length in bytes.
    pub len: u64,
}

/// Modification markers of both sources at the time a snapshot was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceMarkers {
    pub variants: FileMarker,
    pub exceptions: FileMarker,
}

/// An immutable, versioned bundle of variant and exception data.
#[derive(Debug)]
pub struct Snapshot {
    version: u64,
    variants: VariantMap,
    exceptions: ExceptionSet,
    markers: Option<SourceMarkers>,
    loaded_at: DateTime<Utc>,
}

impl Snapshot {
    /// Create a snapshot.
    pub fn new(
        version: u64,
        variants: VariantMap,
        exceptions: ExceptionSet,
        markers: Option<SourceMarkers>,
    ) -> Self {
        Snapshot {
            version,
            variants,
            exceptions,
            markers,
            loaded_at: Utc::now(),
        }
    }

    /// Create an empty snapshot with the given version.
    pub fn empty(version: u64) -> Self {
        Snapshot::new(version, VariantMap::new(), ExceptionSet::new(), None)
    }

    /// Monotonic version of this snapshot.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The variant map.
    pub fn variants(&self) -> &VariantMap {
        &self.variants
    }

    /// The exception set.
    pub fn exceptions(&self) -> &ExceptionSet {
        &self.exceptions
    }

    /// Canonical form of `word`, if it is a known variant.
    pub fn canonical_for(&self, word: &str) -> Option<&str> {
        self.variants.get(word)
    }

    /// Whether `word` is in the exception set.
    pub fn is_exception(&self, word: &str) -> bool {
        self.exceptions.contains(word)
    }

    /// Whether letter rules must leave `word` alone.
    ///
    /// Exception words and canonical forms are both exempt; the latter keeps
    /// a canonical form containing `ق` or a final `ة` stable under repeated
    /// normalization.
    pub fn is_exempt(&self, word: &str) -> bool {
        self.exceptions.contains(word) || self.variants.is_canonical(word)
    }

    /// Source file markers, for snapshots loaded from files.
    pub fn markers(&self) -> Option<SourceMarkers> {
        self.markers
    }

    /// When this snapshot was built.
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Copy of this snapshot's data under a new version.
    pub(crate) fn with_version(&self, version: u64) -> Self {
        Snapshot {
            version,
            variants: self.variants.clone(),
            exceptions: self.exceptions.clone(),
            markers: self.markers,
            loaded_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(canonical: &str, variants: &[&str]) -> VariantRecord {
        VariantRecord {
            canonical: canonical.to_string(),
            variants: variants.iter().map(|v| v.to_string()).collect(),
        }
    }

    #[test]
    fn test_variant_map_lookup() {
        let map = VariantMap::from_records(vec![record("هذا", &["هاذا", "هاذ"])]).unwrap();
        assert_eq!(map.get("هاذا"), Some("هذا"));
        assert_eq!(map.get("هاذ"), Some("هذا"));
        assert_eq!(map.get("هذا"), None);
        assert!(map.is_canonical("هذا"));
        assert_eq!(map.len(), 2);
        assert_eq!(map.canonical_count(), 1);
    }

    #[test]
    fn test_duplicate_identical_is_idempotent() {
        let mut map = VariantMap::new();
        assert!(map.insert("هاذا", "هذا").unwrap());
        assert!(!map.insert("هاذا", "هذا").unwrap());
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_conflicting_canonical_rejected() {
        let result = VariantMap::from_records(vec![
            record("هذا", &["هاذا"]),
            record("هذه", &["هاذا"]),
        ]);
        assert!(matches!(result, Err(HassyError::DataLoad(_))));
    }

    #[test]
    fn test_empty_strings_rejected() {
        assert!(VariantMap::from_records(vec![record("", &["x"])]).is_err());
        assert!(VariantMap::from_records(vec![record("هذا", &[" "])]).is_err());
        assert!(ExceptionSet::from_words(vec![""]).is_err());
    }

    #[test]
    fn test_multi_token_entries_rejected() {
        for (canonical, variant) in [
            ("هذا", " هاذا"),
            ("هذا", "هاذا "),
            ("هذا", "ها ذا"),
            ("هذا الرجل", "هاذا"),
            ("هذا!", "هاذا"),
        ] {
            let result = VariantMap::from_records(vec![record(canonical, &[variant])]);
            assert!(
                matches!(&result, Err(HassyError::DataLoad(m)) if m.contains("not a single word")),
                "{canonical:?} / {variant:?}"
            );
        }
        assert!(VariantMap::from_records(vec![record("هذا الرجل", &[])]).is_err());
        assert!(VariantMap::from_records(vec![record("قَالَ", &["گال"])]).is_ok());
    }

    #[test]
    fn test_expand_taa_marbuta() {
        let mut set = ExceptionSet::from_words(vec!["القضية", "قاضيه", "قادم"]).unwrap();
        let added = set.expand_taa_marbuta();
        assert_eq!(added, 2);
        assert!(set.contains("القضيه"));
        assert!(set.contains("قاضية"));
        assert!(!set.contains("قادمه"));
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn test_snapshot_exemption() {
        let variants = VariantMap::from_records(vec![record("قال", &["گال"])]).unwrap();
        let exceptions = ExceptionSet::from_words(vec!["قادية"]).unwrap();
        let snapshot = Snapshot::new(3, variants, exceptions, None);

        assert_eq!(snapshot.version(), 3);
        assert_eq!(snapshot.canonical_for("گال"), Some("قال"));
        assert!(snapshot.is_exception("قادية"));
        assert!(snapshot.is_exempt("قادية"));
        assert!(snapshot.is_exempt("قال"));
        assert!(!snapshot.is_exempt("گال"));
    }

    #[test]
    fn test_with_version_keeps_data() {
        let snapshot = Snapshot::new(
            1,
            VariantMap::from_records(vec![record("هذا", &["هاذا"])]).unwrap(),
            ExceptionSet::new(),
            None,
        );
        let next = snapshot.with_version(2);
        assert_eq!(next.version(), 2);
        assert_eq!(next.canonical_for("هاذا"), Some("هذا"));
    }
}
