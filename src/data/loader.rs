//! Parsing and validation of the variant and exception sources.
//!
//! The variant source is JSON Lines, one record per line:
//!
//! ```text
//! {"canonical": "هذا", "variants": ["هاذا", "هاذ"]}
//! {"canonical": "كال", "variants": ["قال", "گال"]}
//! ```
//!
//! The exception source is a single JSON array of strings. Every record is
//! validated when it is read; a malformed record fails the whole load.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use log::{debug, info};

use crate::data::snapshot::{ExceptionSet, FileMarker, SourceMarkers, VariantMap, VariantRecord};
use crate::error::{HassyError, Result};

/// Read every non-blank line of a variant source into records.
///
/// Records are returned with their 1-based line number.
pub fn read_variant_records<R: BufRead>(
    reader: R,
    source: &str,
) -> Result<Vec<(usize, VariantRecord)>> {
    let mut records = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line_num = index + 1;
        let line = line.map_err(|e| {
            HassyError::data_load(format!("{source}:{line_num}: read failed: {e}"))
        })?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let record: VariantRecord = serde_json::from_str(line).map_err(|e| {
            HassyError::data_load(format!("{source}:{line_num}: invalid record: {e}"))
        })?;
        records.push((line_num, record));
    }

    Ok(records)
}

/// Parse a variant source into a validated [`VariantMap`].
pub fn parse_variants<R: BufRead>(reader: R, source: &str) -> Result<VariantMap> {
    let mut map = VariantMap::new();
    let records = read_variant_records(reader, source)?;

    for (line_num, record) in &records {
        map.insert_record(record).map_err(|e| match e {
            HassyError::DataLoad(msg) => {
                HassyError::data_load(format!("{source}:{line_num}: {msg}"))
            }
            other => other,
        })?;
    }

    debug!(
        "Parsed {} records into {} variant mappings from {}",
        records.len(),
        map.len(),
        source
    );
    Ok(map)
}

/// Read an exception source as a list of words, keeping duplicates.
pub fn read_exception_words<R: Read>(reader: R, source: &str) -> Result<Vec<String>> {
    let words: Vec<String> = serde_json::from_reader(reader).map_err(|e| {
        HassyError::data_load(format!(
            "{source}: exceptions must be a JSON array of strings: {e}"
        ))
    })?;

    if let Some(index) = words.iter().position(|w| w.trim().is_empty()) {
        return Err(HassyError::data_load(format!(
            "{source}: item {} is an empty string",
            index + 1
        )));
    }

    Ok(words)
}

/// Parse an exception source into an [`ExceptionSet`].
pub fn parse_exceptions<R: Read>(reader: R, source: &str, expand: bool) -> Result<ExceptionSet> {
    let words = read_exception_words(reader, source)?;
    let mut set = ExceptionSet::from_words(words)?;
    if expand {
        let added = set.expand_taa_marbuta();
        debug!("Expanded exceptions from {source} with {added} taa marbuta spellings");
    }
    Ok(set)
}

/// Read the modification marker of a file.
pub fn file_marker(path: &Path) -> Result<FileMarker> {
    let metadata = std::fs::metadata(path)?;
    Ok(FileMarker {
        modified: metadata.modified().ok(),
        len: metadata.len(),
    })
}

/// Read the markers of both sources.
pub fn source_markers(variants_path: &Path, exceptions_path: &Path) -> Result<SourceMarkers> {
    Ok(SourceMarkers {
        variants: file_marker(variants_path)?,
        exceptions: file_marker(exceptions_path)?,
    })
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        HassyError::data_load(format!("Failed to open '{}': {}", path.display(), e))
    })
}

/// Load and validate both sources from disk.
pub fn load_files(
    variants_path: &Path,
    exceptions_path: &Path,
    expand_taa_marbuta: bool,
) -> Result<(VariantMap, ExceptionSet)> {
    let variants_source = variants_path.display().to_string();
    let exceptions_source = exceptions_path.display().to_string();

    let variants = parse_variants(BufReader::new(open(variants_path)?), &variants_source)?;
    let exceptions = parse_exceptions(
        BufReader::new(open(exceptions_path)?),
        &exceptions_source,
        expand_taa_marbuta,
    )?;

    info!(
        "Loaded {} variant mappings from {} and {} exception words from {}",
        variants.len(),
        variants_source,
        exceptions.len(),
        exceptions_source
    );
    Ok((variants, exceptions))
}
