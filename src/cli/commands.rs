//! Command implementations for the hassy CLI.

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::Path;

use log::{info, warn};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::HassyConfig;
use crate::data::lint::lint_files;
use crate::diff::render::{AnsiRenderConfig, RenderTarget};
use crate::diff::segment::{DiffSegment, change_summary, word_diff};
use crate::error::{HassyError, Result};
use crate::service::HassyService;

/// Execute a CLI command.
pub fn execute_command(args: HassyArgs) -> Result<()> {
    let config = args.load_config()?;
    match &args.command {
        Command::Normalize(normalize_args) => normalize(normalize_args, config, &args),
        Command::Diff(diff_args) => diff(diff_args, config, &args),
        Command::Validate(validate_args) => validate(validate_args, config, &args),
        Command::Stats(stats_args) => stats(stats_args, config, &args),
    }
}

/// Read the whole input, from stdin when `input` is absent or `-`.
fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => fs::read_to_string(path).map_err(|e| {
            HassyError::Io(io::Error::new(
                e.kind(),
                format!("cannot read '{}': {}", path.display(), e),
            ))
        }),
        _ => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// Text rendered line by line, plus the segments of every normalized line.
#[derive(Debug)]
struct Processed {
    rendered: String,
    segments: Vec<DiffSegment>,
}

/// Normalize `text` one line at a time so the length limit applies per
/// line. Blank lines are passed through untouched.
fn process(service: &HassyService, text: &str, target: RenderTarget) -> Result<Processed> {
    let mut rendered = String::with_capacity(text.len());
    let mut segments = Vec::new();

    for (index, line) in text.split_inclusive('\n').enumerate() {
        if line.trim().is_empty() {
            rendered.push_str(line);
            continue;
        }
        let result = service.normalize(line).map_err(|e| match e {
            HassyError::Validation(msg) => {
                HassyError::validation(format!("line {}: {}", index + 1, msg))
            }
            other => other,
        })?;
        let line_segments = word_diff(&result);
        rendered.push_str(&service.render(&line_segments, target));
        segments.extend(line_segments);
    }

    Ok(Processed { rendered, segments })
}

fn open_service(config: HassyConfig) -> Result<HassyService> {
    info!(
        "Loading data from {} and {}",
        config.variants_path.display(),
        config.exceptions_path.display()
    );
    HassyService::new(config)
}

fn warn_if_empty(text: &str) -> bool {
    if text.trim().is_empty() {
        warn!("No input text provided");
        return true;
    }
    false
}

/// Normalize text and print or write it.
fn normalize(args: &NormalizeArgs, config: HassyConfig, cli_args: &HassyArgs) -> Result<()> {
    let text = read_input(args.input.as_deref())?;
    if warn_if_empty(&text) {
        return Ok(());
    }

    let service = open_service(config)?;
    let processed = process(&service, &text, RenderTarget::Plain)?;

    let output_path = match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, &processed.rendered)?;
            info!("Normalized text written to {}", path.display());
            Some(path.display().to_string())
        }
        None => None,
    };

    output_result(
        "Normalization complete",
        &NormalizeOutput {
            normalized: processed.rendered,
            output_path,
            summary: change_summary(&processed.segments),
        },
        cli_args,
    )
}

/// Show the normalized text with changed words highlighted.
fn diff(args: &DiffArgs, config: HassyConfig, cli_args: &HassyArgs) -> Result<()> {
    let text = read_input(args.input.as_deref())?;
    if warn_if_empty(&text) {
        return Ok(());
    }

    let use_color = args.use_color(io::stdout().is_terminal());
    let service = open_service(config)?
        .with_ansi_config(AnsiRenderConfig::new().use_color(use_color));
    let target = if args.html {
        RenderTarget::Html
    } else {
        RenderTarget::Ansi
    };
    let processed = process(&service, &text, target)?;

    output_result(
        "Diff complete",
        &DiffOutput {
            rendered: processed.rendered,
            summary: change_summary(&processed.segments),
        },
        cli_args,
    )
}

/// Load and lint the data files.
fn validate(args: &ValidateArgs, config: HassyConfig, cli_args: &HassyArgs) -> Result<()> {
    let variants_path = config.variants_path.clone();
    let exceptions_path = config.exceptions_path.clone();

    let service = open_service(config)?;
    let lint = lint_files(&variants_path, &exceptions_path)?;
    for finding in &lint.findings {
        warn!("{}", finding.message);
    }
    let finding_count = lint.findings.len();

    output_result(
        "Validation complete",
        &ValidationOutput {
            variants_path: variants_path.display().to_string(),
            exceptions_path: exceptions_path.display().to_string(),
            data: service.data_info(),
            lint,
        },
        cli_args,
    )?;

    if args.strict && finding_count > 0 {
        return Err(HassyError::validation(format!(
            "{finding_count} data quality findings"
        )));
    }
    Ok(())
}

/// Normalize text and report word statistics.
fn stats(args: &StatsArgs, config: HassyConfig, cli_args: &HassyArgs) -> Result<()> {
    let text = read_input(args.input.as_deref())?;
    let service = open_service(config)?;
    if !warn_if_empty(&text) {
        process(&service, &text, RenderTarget::Plain)?;
    }

    let top_unknown = service
        .unknown_words()
        .into_iter()
        .take(args.top)
        .map(|(word, count)| UnknownWord { word, count })
        .collect();

    output_result(
        "Statistics",
        &StatsOutput {
            stats: service.get_stats(),
            top_unknown,
            cache: service.cache_stats(),
        },
        cli_args,
    )
}
