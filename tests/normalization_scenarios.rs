//! End-to-end normalization scenarios through the service facade.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use hassy::config::HassyConfig;
use hassy::data::{DataStore, ExceptionSet, VariantMap};
use hassy::diff::{RenderTarget, SegmentKind};
use hassy::error::{HassyError, Result};
use hassy::normalizer::WordSource;
use hassy::service::HassyService;

fn write_data(dir: &Path, variants: &str, exceptions: &str) -> HassyConfig {
    fs::write(dir.join(hassy::config::VARIANTS_FILE), variants).unwrap();
    fs::write(dir.join(hassy::config::EXCEPTIONS_FILE), exceptions).unwrap();
    HassyConfig::default().with_data_dir(dir)
}

fn empty_service() -> HassyService {
    HassyService::from_store(Arc::new(DataStore::empty()), HassyConfig::default())
}

#[test]
fn test_rules_with_empty_data() -> Result<()> {
    let service = empty_service();
    let response = service.normalize_text("قال الرجل", RenderTarget::Html)?;

    assert_eq!(response.normalized, "كال الرجل");
    let words: Vec<_> = response.segments.iter().filter(|s| s.is_word()).collect();
    assert_eq!(words[0].kind, SegmentKind::Changed);
    assert_eq!(words[1].kind, SegmentKind::Unchanged);

    let stats = service.get_stats();
    assert_eq!(stats.total_words, 2);
    assert_eq!(stats.changed_words, 1);
    assert_eq!(stats.change_percentage, 50.0);

    Ok(())
}

#[test]
fn test_final_taa_marbuta() -> Result<()> {
    let response = empty_service().normalize_text("كلمة", RenderTarget::Plain)?;
    assert_eq!(response.normalized, "كلمه");
    Ok(())
}

#[test]
fn test_exception_word_untouched() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = write_data(dir.path(), "", "[\"قادية\"]");
    let service = HassyService::new(config)?;

    let response = service.normalize_text("قادية", RenderTarget::Plain)?;
    assert_eq!(response.normalized, "قادية");
    assert_eq!(response.summary.changed, 0);

    Ok(())
}

#[test]
fn test_variant_lookup() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = write_data(
        dir.path(),
        "{\"canonical\": \"هذا\", \"variants\": [\"هاذا\", \"هاذ\"]}\n",
        "[]",
    );
    let service = HassyService::new(config)?;

    let response = service.normalize_text("هاذا هاذ هذا", RenderTarget::Html)?;
    assert_eq!(response.normalized, "هذا هذا هذا");
    assert_eq!(
        response.rendered,
        "<mark class=\"change\">هذا</mark> <mark class=\"change\">هذا</mark> هذا"
    );
    assert_eq!(response.summary.changed, 2);

    Ok(())
}

#[test]
fn test_variant_takes_precedence_over_rules() -> Result<()> {
    let mut variants = VariantMap::new();
    variants.insert("گلت", "قلت")?;
    let store = Arc::new(DataStore::in_memory(variants, ExceptionSet::new()));
    let service = HassyService::from_store(store, HassyConfig::default());

    let result = service.normalize("گلت")?;
    assert_eq!(result.normalized, "قلت");
    let word = result.words().next().unwrap();
    assert_eq!(word.source, Some(WordSource::Variant));

    Ok(())
}

#[test]
fn test_normalization_is_idempotent() -> Result<()> {
    let mut variants = VariantMap::new();
    variants.insert("گال", "قال")?;
    variants.insert("هاذا", "هذا")?;
    let exceptions = ExceptionSet::from_words(["القضية"])?;
    let store = Arc::new(DataStore::in_memory(variants, exceptions));
    let service = HassyService::from_store(store, HassyConfig::default());

    for text in [
        "گال هاذا الرجل في القضية",
        "قناعة، كلمة! 123 گ",
        "  مرحبا\n\tبكم  ",
    ] {
        let once = service.normalize(text)?.normalized;
        let twice = service.normalize(&once)?.normalized;
        assert_eq!(once, twice, "not idempotent for {text:?}");
    }

    Ok(())
}

#[test]
fn test_lossless_reassembly() -> Result<()> {
    let service = empty_service();
    for text in [
        "الرجل",
        "  leading and trailing  ",
        "«قُلْت»؟ — 42٪",
        "line one\r\nline two\n",
        "emoji 👍🏽 and ZWJ 👨‍👩‍👧",
    ] {
        let result = service.normalize(text)?;
        let original: String = result.tokens.iter().map(|t| t.original.as_str()).collect();
        assert_eq!(original, text);
        assert_eq!(result.original, text);
    }
    Ok(())
}

#[test]
fn test_diacritics_stay_with_their_letter() -> Result<()> {
    let result = empty_service().normalize("قُلْت")?;
    assert_eq!(result.word_count(), 1);
    assert_eq!(result.normalized, "كُلْت");
    Ok(())
}

#[test]
fn test_validation_rejects_without_side_effects() {
    let config = HassyConfig::default().with_max_text_length(10);
    let service = HassyService::from_store(Arc::new(DataStore::empty()), config);

    for text in ["", "   ", "قال الرجل في البيت"] {
        let result = service.normalize_text(text, RenderTarget::Html);
        assert!(matches!(result, Err(HassyError::Validation(_))), "{text:?}");
    }
    assert_eq!(service.get_stats().total_words, 0);
}

#[test]
fn test_missing_data_fails_startup() {
    let dir = tempfile::tempdir().unwrap();
    let config = HassyConfig::default().with_data_dir(dir.path());
    assert!(matches!(HassyService::new(config), Err(HassyError::DataLoad(_))));
}

#[test]
fn test_unknown_words_tracked() -> Result<()> {
    let service = empty_service();
    service.normalize("الرجل في البيت")?;
    service.normalize("الرجل قال")?;

    let unknown = service.unknown_words();
    assert_eq!(unknown[0], ("الرجل".to_string(), 2));
    assert!(!unknown.iter().any(|(w, _)| w == "قال"));

    service.reset_stats();
    assert!(service.unknown_words().is_empty());
    Ok(())
}
