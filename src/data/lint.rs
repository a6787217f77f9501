//! Data-quality checks that do not fail a load.
//!
//! Loading rejects data that cannot be served (malformed records, conflicting
//! variants). Linting reports data that loads fine but is probably a mistake,
//! such as chained mappings that make normalization non-idempotent.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::analysis::tokenizer::letter_run::LetterRunTokenizer;
use crate::data::loader::{read_exception_words, read_variant_records};
use crate::error::{HassyError, Result};

/// Kind of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LintKind {
    /// A record lists its canonical form among its own variants.
    CanonicalInOwnVariants,
    /// A word is a variant of one record and the canonical form of another.
    ChainedMapping,
    /// A record has no variants.
    EmptyVariantList,
    /// Two records share a canonical form.
    DuplicateCanonical,
    /// The same variant is listed more than once.
    DuplicateVariant,
    /// The same exception word is listed more than once.
    DuplicateException,
    /// An exception word is also a variant; the variant mapping wins.
    ExceptionIsVariant,
    /// An exception is not a single word token and can never match.
    ExceptionNotAWord,
}

/// One lint finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintFinding {
    pub kind: LintKind,
    /// 1-based line (variant source) or item number (exception source).
    pub location: Option<usize>,
    pub word: String,
    pub message: String,
}

/// Result of linting both sources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LintReport {
    pub records: usize,
    pub canonical_forms: usize,
    pub variants: usize,
    pub exception_words: usize,
    pub findings: Vec<LintFinding>,
}

impl LintReport {
    /// Whether nothing was found.
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Number of findings of `kind`.
    pub fn count(&self, kind: LintKind) -> usize {
        self.findings.iter().filter(|f| f.kind == kind).count()
    }

    fn push(&mut self, kind: LintKind, location: Option<usize>, word: &str, message: String) {
        self.findings.push(LintFinding {
            kind,
            location,
            word: word.to_string(),
            message,
        });
    }
}

/// Lint a variant source and an exception source.
///
/// Both sources must parse; parse failures are returned as errors exactly
/// as a load would report them.
pub fn lint_sources<V: BufRead, E: Read>(
    variants: V,
    variants_name: &str,
    exceptions: E,
    exceptions_name: &str,
) -> Result<LintReport> {
    let records = read_variant_records(variants, variants_name)?;
    let exception_words = read_exception_words(exceptions, exceptions_name)?;

    let mut report = LintReport {
        records: records.len(),
        ..LintReport::default()
    };

    let mut canonical_lines: AHashMap<&str, usize> = AHashMap::new();
    let mut variant_lines: AHashMap<&str, usize> = AHashMap::new();

    for (line, record) in &records {
        let canonical = record.canonical.as_str();

        if let Some(first) = canonical_lines.get(canonical) {
            report.push(
                LintKind::DuplicateCanonical,
                Some(*line),
                canonical,
                format!("canonical '{canonical}' already defined on line {first}"),
            );
        } else {
            canonical_lines.insert(canonical, *line);
        }

        if record.variants.is_empty() {
            report.push(
                LintKind::EmptyVariantList,
                Some(*line),
                canonical,
                format!("canonical '{canonical}' has no variants"),
            );
        }

        for variant in &record.variants {
            if variant == canonical {
                report.push(
                    LintKind::CanonicalInOwnVariants,
                    Some(*line),
                    variant,
                    format!("canonical '{canonical}' appears in its own variants"),
                );
            }
            if let Some(first) = variant_lines.get(variant.as_str()) {
                report.push(
                    LintKind::DuplicateVariant,
                    Some(*line),
                    variant,
                    format!("variant '{variant}' already listed on line {first}"),
                );
            } else {
                variant_lines.insert(variant.as_str(), *line);
            }
        }
    }

    // Sorted so the report is stable across runs.
    let chained: BTreeSet<&str> = variant_lines
        .keys()
        .filter(|v| canonical_lines.contains_key(*v))
        .copied()
        .collect();
    for word in chained {
        if records
            .iter()
            .any(|(_, r)| r.canonical == word && r.variants.iter().any(|v| v == word))
        {
            continue; // already reported as CanonicalInOwnVariants
        }
        let variant_line = variant_lines.get(word).copied();
        let canonical_line = canonical_lines.get(word).copied().unwrap_or_default();
        report.push(
            LintKind::ChainedMapping,
            variant_line,
            word,
            format!(
                "'{word}' is a variant (line {}) and a canonical form (line {canonical_line})",
                variant_line.unwrap_or_default()
            ),
        );
    }

    let tokenizer = LetterRunTokenizer::new();
    let mut seen: AHashSet<&str> = AHashSet::new();
    for (index, word) in exception_words.iter().enumerate() {
        if !seen.insert(word.as_str()) {
            report.push(
                LintKind::DuplicateException,
                Some(index + 1),
                word,
                format!("exception '{word}' is listed more than once"),
            );
        }
        if !tokenizer.is_single_word(word) {
            report.push(
                LintKind::ExceptionNotAWord,
                Some(index + 1),
                word,
                format!("exception '{word}' is not a single word and never matches"),
            );
        }
        if variant_lines.contains_key(word.as_str()) {
            report.push(
                LintKind::ExceptionIsVariant,
                Some(index + 1),
                word,
                format!("exception '{word}' is also a variant; the variant mapping takes precedence"),
            );
        }
    }

    report.canonical_forms = canonical_lines.len();
    report.variants = variant_lines.len();
    report.exception_words = seen.len();
    Ok(report)
}

/// Lint the two source files on disk.
pub fn lint_files(variants_path: &Path, exceptions_path: &Path) -> Result<LintReport> {
    let open = |path: &Path| {
        File::open(path).map_err(|e| {
            HassyError::data_load(format!("Failed to open '{}': {}", path.display(), e))
        })
    };
    lint_sources(
        BufReader::new(open(variants_path)?),
        &variants_path.display().to_string(),
        BufReader::new(open(exceptions_path)?),
        &exceptions_path.display().to_string(),
    )
}
