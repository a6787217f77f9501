//! Per-word normalization over a data snapshot.

use std::sync::Arc;

use log::trace;

use crate::analysis::rules::RuleEngine;
use crate::analysis::token::Token;
use crate::analysis::tokenizer::{LetterRunTokenizer, Tokenizer, verify_lossless};
use crate::config::HassyConfig;
use crate::data::snapshot::Snapshot;
use crate::data::store::DataStore;
use crate::error::Result;
use crate::normalizer::cache::{CacheStats, WordCache};
use crate::normalizer::result::{NormalizationResult, NormalizedToken, WordOutcome, WordSource};

/// Normalizes text word by word against the store's current snapshot.
///
/// Lookup precedence for each word:
///
/// 1. An exact hit in the variant map returns the canonical form; letter
///    rules never run on it.
/// 2. A word that is exempt (an exception word or a canonical form) is
///    returned unchanged.
/// 3. Otherwise the letter rules run. If none of them changes the word, the
///    outcome is [`WordSource::Unknown`].
pub struct Normalizer {
    store: Arc<DataStore>,
    tokenizer: Arc<dyn Tokenizer>,
    rules: RuleEngine,
    cache: WordCache,
}

impl Normalizer {
    /// Create a normalizer with the default cache size.
    pub fn new(store: Arc<DataStore>) -> Self {
        Self::with_config(store, &HassyConfig::default())
    }

    /// Create a normalizer sized by `config`.
    pub fn with_config(store: Arc<DataStore>, config: &HassyConfig) -> Self {
        Normalizer {
            store,
            tokenizer: Arc::new(LetterRunTokenizer::new()),
            rules: RuleEngine::hassaniya(),
            cache: WordCache::new(config.cache_capacity, config.cache_shards),
        }
    }

    /// Replace the tokenizer.
    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Replace the rule chain. Cached outcomes are dropped.
    pub fn with_rules(mut self, rules: RuleEngine) -> Self {
        self.rules = rules;
        self.cache.clear();
        self
    }

    pub fn store(&self) -> &Arc<DataStore> {
        &self.store
    }

    pub fn rules(&self) -> &RuleEngine {
        &self.rules
    }

    /// Split `text` into word and separator tokens.
    ///
    /// Fails with [`crate::error::HassyError::InternalInvariant`] if the
    /// tokens do not reassemble into `text`.
    pub fn tokenize(&self, text: &str) -> Result<Vec<Token>> {
        let tokens: Vec<Token> = self.tokenizer.tokenize(text)?.collect();
        verify_lossless(text, &tokens)?;
        Ok(tokens)
    }

    /// Normalize one word against `snapshot`, bypassing the cache.
    pub fn normalize_word(&self, word: &str, snapshot: &Snapshot) -> WordOutcome {
        if let Some(canonical) = snapshot.canonical_for(word) {
            return WordOutcome::new(canonical, WordSource::Variant);
        }
        if snapshot.is_exempt(word) {
            return WordOutcome::new(word, WordSource::Exception);
        }

        let outcome = self.rules.apply_traced(word);
        if outcome.changed() {
            trace!("'{}' -> '{}' by {:?}", word, outcome.text, outcome.fired);
            WordOutcome::new(outcome.text, WordSource::Rule)
        } else {
            WordOutcome::new(outcome.text, WordSource::Unknown)
        }
    }

    /// Normalize one word against `snapshot`, consulting the cache.
    pub fn lookup_word(&self, word: &str, snapshot: &Snapshot) -> WordOutcome {
        let version = snapshot.version();
        if let Some(outcome) = self.cache.get(version, word) {
            return outcome;
        }
        let outcome = self.normalize_word(word, snapshot);
        self.cache.insert(version, word, outcome.clone());
        outcome
    }

    /// Normalize `text` against the store's current snapshot.
    ///
    /// The snapshot is captured once; a reload that lands while the call is
    /// running does not affect its result.
    pub fn normalize_text(&self, text: &str) -> Result<NormalizationResult> {
        let snapshot = self.store.current();
        self.normalize_with_snapshot(text, &snapshot)
    }

    /// Normalize `text` against an explicit snapshot.
    pub fn normalize_with_snapshot(
        &self,
        text: &str,
        snapshot: &Snapshot,
    ) -> Result<NormalizationResult> {
        let tokens = self.tokenize(text)?;
        let mut normalized = String::with_capacity(text.len());
        let mut out = Vec::with_capacity(tokens.len());

        for token in tokens {
            let token = if token.is_word() {
                let outcome = self.lookup_word(&token.text, snapshot);
                NormalizedToken::word(token, outcome)
            } else {
                NormalizedToken::separator(token)
            };
            normalized.push_str(&token.normalized);
            out.push(token);
        }

        Ok(NormalizationResult {
            original: text.to_string(),
            normalized,
            snapshot_version: snapshot.version(),
            tokens: out,
        })
    }

    /// Drop every cached word outcome.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

impl std::fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Normalizer")
            .field("store", &self.store)
            .field("tokenizer", &self.tokenizer.name())
            .field("rules", &self.rules)
            .field("cache", &self.cache.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::rules::{LetterRule, qaf_gaf::QafGafRule};
    use crate::analysis::token::TokenStream;
    use crate::data::snapshot::{ExceptionSet, VariantMap};
    use crate::error::HassyError;

    fn store(variants: &[(&str, &str)], exceptions: &[&str]) -> Arc<DataStore> {
        let mut map = VariantMap::new();
        for (variant, canonical) in variants {
            map.insert(variant, canonical).unwrap();
        }
        let exceptions = ExceptionSet::from_words(exceptions.iter().copied()).unwrap();
        Arc::new(DataStore::in_memory(map, exceptions))
    }

    #[test]
    fn test_rules_on_empty_data() {
        let normalizer = Normalizer::new(Arc::new(DataStore::empty()));
        let result = normalizer.normalize_text("قال الرجل").unwrap();

        assert_eq!(result.normalized, "كال الرجل");
        let words: Vec<_> = result.words().collect();
        assert_eq!(words.len(), 2);
        assert!(words[0].changed);
        assert_eq!(words[0].source, Some(WordSource::Rule));
        assert!(!words[1].changed);
        assert_eq!(words[1].source, Some(WordSource::Unknown));
    }

    #[test]
    fn test_variant_hit_skips_rules() {
        // canonical contains ق, which the rules would otherwise rewrite
        let normalizer = Normalizer::new(store(&[("گال", "قال")], &[]));
        let snapshot = normalizer.store().current();
        let outcome = normalizer.normalize_word("گال", &snapshot);
        assert_eq!(outcome, WordOutcome::new("قال", WordSource::Variant));
    }

    #[test]
    fn test_exception_bypasses_both_rules() {
        let normalizer = Normalizer::new(store(&[], &["قادية"]));
        let snapshot = normalizer.store().current();
        let outcome = normalizer.normalize_word("قادية", &snapshot);
        assert_eq!(outcome, WordOutcome::new("قادية", WordSource::Exception));
    }

    #[test]
    fn test_variant_wins_over_exception() {
        let normalizer = Normalizer::new(store(&[("هاذا", "هذا")], &["هاذا"]));
        let snapshot = normalizer.store().current();
        assert_eq!(normalizer.normalize_word("هاذا", &snapshot).normalized, "هذا");
    }

    #[test]
    fn test_canonical_forms_are_fixed_points() {
        let normalizer = Normalizer::new(store(&[("گال", "قال")], &[]));
        let once = normalizer.normalize_text("گال قال").unwrap();
        assert_eq!(once.normalized, "قال قال");
        let twice = normalizer.normalize_text(&once.normalized).unwrap();
        assert_eq!(twice.normalized, once.normalized);
    }

    #[test]
    fn test_lossless_with_punctuation() {
        let normalizer = Normalizer::new(Arc::new(DataStore::empty()));
        let text = "  «قال»، كلمة!\n\tالرجل...  ";
        let result = normalizer.normalize_text(text).unwrap();
        assert_eq!(result.original, text);
        assert_eq!(result.normalized, "  «كال»، كلمه!\n\tالرجل...  ");
    }

    #[test]
    fn test_cache_keyed_by_version() {
        let store = store(&[], &[]);
        let normalizer = Normalizer::new(Arc::clone(&store));
        assert_eq!(normalizer.normalize_text("قادية").unwrap().normalized, "كاديه");

        store.install(
            VariantMap::new(),
            ExceptionSet::from_words(vec!["قادية"]).unwrap(),
        );
        assert_eq!(normalizer.normalize_text("قادية").unwrap().normalized, "قادية");
    }

    #[test]
    fn test_cache_hits_reported() {
        let normalizer = Normalizer::new(Arc::new(DataStore::empty()));
        normalizer.normalize_text("قال قال الرجل").unwrap();
        let stats = normalizer.cache_stats();
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.entries, 2);

        normalizer.clear_cache();
        assert_eq!(normalizer.cache_stats().entries, 0);
    }

    #[test]
    fn test_unknown_reported_on_cache_hit() {
        let normalizer = Normalizer::new(Arc::new(DataStore::empty()));
        normalizer.normalize_text("الرجل").unwrap();
        let result = normalizer.normalize_text("الرجل").unwrap();
        assert_eq!(result.unknown_words().collect::<Vec<_>>(), vec!["الرجل"]);
    }

    #[test]
    fn test_disabled_cache() {
        let config = HassyConfig::default().with_cache_capacity(0);
        let normalizer = Normalizer::with_config(Arc::new(DataStore::empty()), &config);
        normalizer.normalize_text("قال قال").unwrap();
        let stats = normalizer.cache_stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.entries, 0);
    }

    #[test]
    fn test_custom_rules() {
        let rules = RuleEngine::new(vec![Box::new(QafGafRule::new()) as Box<dyn LetterRule>]);
        let normalizer = Normalizer::new(Arc::new(DataStore::empty())).with_rules(rules);
        assert_eq!(normalizer.normalize_text("قالة").unwrap().normalized, "كالة");
    }

    struct DroppingTokenizer;

    impl Tokenizer for DroppingTokenizer {
        fn tokenize(&self, text: &str) -> Result<TokenStream> {
            let tokens: Vec<Token> = LetterRunTokenizer::new()
                .split(text)
                .into_iter()
                .filter(|t| t.is_word())
                .collect();
            Ok(Box::new(tokens.into_iter()))
        }

        fn name(&self) -> &'static str {
            "dropping"
        }
    }

    #[test]
    fn test_lossy_tokenizer_is_internal_error() {
        let normalizer = Normalizer::new(Arc::new(DataStore::empty()))
            .with_tokenizer(Arc::new(DroppingTokenizer));
        let result = normalizer.normalize_text("قال الرجل");
        assert!(matches!(result, Err(HassyError::InternalInvariant(_))));
    }
}
