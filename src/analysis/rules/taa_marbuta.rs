//! Final `ة` → `ه` rule.

use std::borrow::Cow;

use crate::analysis::rules::LetterRule;

pub(crate) const TAA_MARBUTA: char = 'ة';
pub(crate) const HAA: char = 'ه';

/// Replaces a word-final taa marbuta (`ة`) with haa (`ه`).
///
/// Only the last character is inspected; a `ة` elsewhere in the word, or one
/// followed by a diacritic, is left alone.
#[derive(Clone, Debug, Default)]
pub struct TaaMarbutaRule;

impl TaaMarbutaRule {
    /// Create a new rule.
    pub fn new() -> Self {
        TaaMarbutaRule
    }
}

impl LetterRule for TaaMarbutaRule {
    fn apply<'a>(&self, word: &'a str) -> Cow<'a, str> {
        match word.strip_suffix(TAA_MARBUTA) {
            Some(stem) => {
                let mut out = String::with_capacity(word.len());
                out.push_str(stem);
                out.push(HAA);
                Cow::Owned(out)
            }
            None => Cow::Borrowed(word),
        }
    }

    fn name(&self) -> &'static str {
        "taa_marbuta"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_letter_only() {
        let rule = TaaMarbutaRule::new();
        assert_eq!(rule.apply("كلمة"), "كلمه");
        assert_eq!(rule.apply("ةكلمة"), "ةكلمه");
        assert_eq!(rule.apply("ةكلم"), "ةكلم");
    }

    #[test]
    fn test_single_letter_word() {
        assert_eq!(TaaMarbutaRule::new().apply("ة"), "ه");
    }

    #[test]
    fn test_trailing_diacritic_blocks_rule() {
        assert!(matches!(
            TaaMarbutaRule::new().apply("كلمةٌ"),
            Cow::Borrowed(_)
        ));
    }
}
