//! Word-aligned comparison of original and normalized text.

use serde::{Deserialize, Serialize};

use crate::analysis::token::TokenKind;
use crate::normalizer::result::NormalizationResult;

/// Classification of one diff segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    /// A word that normalization left alone.
    Unchanged,
    /// A word whose normalized form differs from the original.
    Changed,
    /// Text between words, carried verbatim.
    Separator,
}

/// One word-aligned unit of comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSegment {
    pub kind: SegmentKind,
    pub original: String,
    pub normalized: String,
}

impl DiffSegment {
    pub fn is_word(&self) -> bool {
        self.kind != SegmentKind::Separator
    }

    pub fn is_changed(&self) -> bool {
        self.kind == SegmentKind::Changed
    }
}

/// Build the segments of a normalization result, one per token.
///
/// Tokens already pair each original word with its normalized form, so the
/// diff is a straight walk over them; no alignment search is needed.
pub fn word_diff(result: &NormalizationResult) -> Vec<DiffSegment> {
    result
        .tokens
        .iter()
        .map(|token| {
            let kind = match token.kind {
                TokenKind::Separator => SegmentKind::Separator,
                TokenKind::Word if token.changed => SegmentKind::Changed,
                TokenKind::Word => SegmentKind::Unchanged,
            };
            DiffSegment {
                kind,
                original: token.original.clone(),
                normalized: token.normalized.clone(),
            }
        })
        .collect()
}

/// Word counts of a diff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub total: usize,
    pub changed: usize,
    pub unchanged: usize,
    /// Share of changed words, rounded to one decimal. 0.0 when there are no words.
    pub change_percentage: f64,
}

/// Percentage of `part` in `total`, rounded to one decimal.
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 * 1000.0 / total as f64).round() / 10.0
}

/// Count changed and unchanged words in `segments`.
pub fn change_summary(segments: &[DiffSegment]) -> ChangeSummary {
    let (total, changed) = segments
        .iter()
        .filter(|s| s.is_word())
        .fold((0, 0), |(total, changed), s| {
            (total + 1, changed + usize::from(s.is_changed()))
        });

    ChangeSummary {
        total,
        changed,
        unchanged: total - changed,
        change_percentage: percentage(changed as u64, total as u64),
    }
}
