//! Output types of the normalizer.

use serde::{Deserialize, Serialize};

use crate::analysis::token::{Token, TokenKind};

/// Which pipeline step produced a word's normalized form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordSource {
    /// Exact hit in the variant map.
    Variant,
    /// Exempt from letter rules: an exception word or a canonical form.
    Exception,
    /// At least one letter rule changed the word.
    Rule,
    /// Rules ran but none matched.
    Unknown,
}

impl WordSource {
    /// Lowercase name, as used in serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            WordSource::Variant => "variant",
            WordSource::Exception => "exception",
            WordSource::Rule => "rule",
            WordSource::Unknown => "unknown",
        }
    }
}

/// Normalized form of one word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordOutcome {
    pub normalized: String,
    pub source: WordSource,
}

impl WordOutcome {
    pub fn new<S: Into<String>>(normalized: S, source: WordSource) -> Self {
        WordOutcome {
            normalized: normalized.into(),
            source,
        }
    }
}

/// One token of the input together with its normalized form.
///
/// Separators are carried verbatim; they never change and have no source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedToken {
    pub original: String,
    pub normalized: String,
    pub kind: TokenKind,
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<WordSource>,
    pub start_offset: usize,
    pub end_offset: usize,
}

impl NormalizedToken {
    /// A word token and the outcome of normalizing it.
    pub fn word(token: Token, outcome: WordOutcome) -> Self {
        let changed = outcome.normalized != token.text;
        NormalizedToken {
            normalized: outcome.normalized,
            kind: TokenKind::Word,
            changed,
            source: Some(outcome.source),
            start_offset: token.start_offset,
            end_offset: token.end_offset,
            original: token.text,
        }
    }

    /// A separator token, unchanged.
    pub fn separator(token: Token) -> Self {
        NormalizedToken {
            normalized: token.text.clone(),
            kind: TokenKind::Separator,
            changed: false,
            source: None,
            start_offset: token.start_offset,
            end_offset: token.end_offset,
            original: token.text,
        }
    }

    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }
}

/// Result of normalizing one text against one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationResult {
    pub original: String,
    pub normalized: String,
    /// Version of the snapshot every word was looked up in.
    pub snapshot_version: u64,
    /// All tokens of the input, in order.
    pub tokens: Vec<NormalizedToken>,
}

impl NormalizationResult {
    /// Word tokens only.
    pub fn words(&self) -> impl Iterator<Item = &NormalizedToken> {
        self.tokens.iter().filter(|t| t.is_word())
    }

    pub fn word_count(&self) -> usize {
        self.words().count()
    }

    pub fn changed_count(&self) -> usize {
        self.words().filter(|t| t.changed).count()
    }

    /// Original spelling of every word whose source is [`WordSource::Unknown`].
    pub fn unknown_words(&self) -> impl Iterator<Item = &str> {
        self.words()
            .filter(|t| t.source == Some(WordSource::Unknown))
            .map(|t| t.original.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_token_changed_flag() {
        let token = Token::word("قال", 0, 0, "قال".len());
        let normalized = NormalizedToken::word(token, WordOutcome::new("كال", WordSource::Rule));
        assert!(normalized.changed);
        assert_eq!(normalized.original, "قال");
        assert_eq!(normalized.source, Some(WordSource::Rule));

        let token = Token::word("الرجل", 0, 0, "الرجل".len());
        let normalized =
            NormalizedToken::word(token, WordOutcome::new("الرجل", WordSource::Unknown));
        assert!(!normalized.changed);
    }

    #[test]
    fn test_result_counts() {
        let result = NormalizationResult {
            original: "قال الرجل".to_string(),
            normalized: "كال الرجل".to_string(),
            snapshot_version: 1,
            tokens: vec![
                NormalizedToken::word(
                    Token::word("قال", 0, 0, 6),
                    WordOutcome::new("كال", WordSource::Rule),
                ),
                NormalizedToken::separator(Token::separator(" ", 1, 6, 7)),
                NormalizedToken::word(
                    Token::word("الرجل", 2, 7, 17),
                    WordOutcome::new("الرجل", WordSource::Unknown),
                ),
            ],
        };
        assert_eq!(result.word_count(), 2);
        assert_eq!(result.changed_count(), 1);
        assert_eq!(result.unknown_words().collect::<Vec<_>>(), vec!["الرجل"]);
    }

    #[test]
    fn test_source_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&WordSource::Variant).unwrap(), "\"variant\"");
        assert_eq!(WordSource::Unknown.as_str(), "unknown");
    }
}
