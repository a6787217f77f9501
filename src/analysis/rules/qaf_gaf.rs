//! `گ`/`ق` → `ك` rule.

use std::borrow::Cow;

use crate::analysis::rules::LetterRule;

/// Letters merged into kaf.
const MERGED: [char; 2] = ['گ', 'ق'];

/// Target letter.
const KAF: char = 'ك';

/// Replaces every gaf (`گ`) and qaf (`ق`) in a word with kaf (`ك`).
#[derive(Clone, Debug, Default)]
pub struct QafGafRule;

impl QafGafRule {
    /// Create a new rule.
    pub fn new() -> Self {
        QafGafRule
    }
}

impl LetterRule for QafGafRule {
    fn apply<'a>(&self, word: &'a str) -> Cow<'a, str> {
        if !word.contains(&MERGED[..]) {
            return Cow::Borrowed(word);
        }
        Cow::Owned(
            word.chars()
                .map(|c| if MERGED.contains(&c) { KAF } else { c })
                .collect(),
        )
    }

    fn name(&self) -> &'static str {
        "qaf_gaf"
    }
}
