//! Loading and linting data files from disk.

use std::fs;

use hassy::config::HassyConfig;
use hassy::data::{DataStore, LintKind, lint_files};
use hassy::error::{HassyError, Result};

#[test]
fn test_load_skips_blank_lines_and_duplicates() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = HassyConfig::default().with_data_dir(dir.path());
    fs::write(
        &config.variants_path,
        "\n{\"canonical\": \"هذا\", \"variants\": [\"هاذا\"]}\n   \n\
         {\"canonical\": \"هذا\", \"variants\": [\"هاذا\", \"هاذ\"]}\n",
    )?;
    fs::write(&config.exceptions_path, "[\"قادية\"]")?;

    let store = DataStore::from_config(&config)?;
    let snapshot = store.current();
    assert_eq!(snapshot.variants().len(), 2);
    assert_eq!(snapshot.canonical_for("هاذ"), Some("هذا"));
    assert!(snapshot.is_exception("قاديه"));
    Ok(())
}

#[test]
fn test_expansion_can_be_disabled() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = HassyConfig::default()
        .with_data_dir(dir.path())
        .with_taa_marbuta_expansion(false);
    fs::write(&config.variants_path, "")?;
    fs::write(&config.exceptions_path, "[\"قادية\"]")?;

    let store = DataStore::from_config(&config)?;
    assert!(!store.current().is_exception("قاديه"));
    Ok(())
}

#[test]
fn test_malformed_exceptions_fail_load() {
    let dir = tempfile::tempdir().unwrap();
    let config = HassyConfig::default().with_data_dir(dir.path());
    fs::write(&config.variants_path, "").unwrap();
    fs::write(&config.exceptions_path, "[\"قادية\", 7]").unwrap();

    assert!(matches!(
        DataStore::from_config(&config),
        Err(HassyError::DataLoad(_))
    ));
}

#[test]
fn test_lint_files_reports_chained_mapping() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = HassyConfig::default().with_data_dir(dir.path());
    fs::write(
        &config.variants_path,
        "{\"canonical\": \"هذا\", \"variants\": [\"هاذا\"]}\n\
         {\"canonical\": \"هاذا\", \"variants\": [\"هاذ\"]}\n",
    )?;
    fs::write(&config.exceptions_path, "[]")?;

    // loads fine, but normalizing twice would not be stable
    DataStore::from_config(&config)?;
    let report = lint_files(&config.variants_path, &config.exceptions_path)?;
    assert_eq!(report.count(LintKind::ChainedMapping), 1);
    assert_eq!(report.findings[0].word, "هاذا");
    Ok(())
}
