//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{HassyArgs, OutputFormat};
use crate::data::lint::LintReport;
use crate::diff::segment::ChangeSummary;
use crate::error::Result;
use crate::normalizer::cache::CacheStats;
use crate::service::DataInfo;
use crate::stats::Stats;

/// Results that know how to print themselves for a person.
pub trait HumanOutput: Serialize {
    fn print_human(&self, args: &HassyArgs);
}

/// Result of the `normalize` command.
#[derive(Debug, Serialize, Deserialize)]
pub struct NormalizeOutput {
    pub normalized: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    pub summary: ChangeSummary,
}

/// Result of the `diff` command.
#[derive(Debug, Serialize, Deserialize)]
pub struct DiffOutput {
    pub rendered: String,
    pub summary: ChangeSummary,
}

/// Result of the `validate` command.
#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationOutput {
    pub variants_path: String,
    pub exceptions_path: String,
    pub data: DataInfo,
    pub lint: LintReport,
}

/// One unknown word and its occurrence count.
#[derive(Debug, Serialize, Deserialize)]
pub struct UnknownWord {
    pub word: String,
    pub count: u64,
}

/// Result of the `stats` command.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsOutput {
    pub stats: Stats,
    pub top_unknown: Vec<UnknownWord>,
    pub cache: CacheStats,
}

/// Output a result in the specified format.
pub fn output_result<T: HumanOutput>(message: &str, result: &T, args: &HassyArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 1 && !message.is_empty() {
                eprintln!("{message}");
            }
            result.print_human(args);
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

fn output_json<T: Serialize>(result: &T, args: &HassyArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

fn summary_line(summary: &ChangeSummary) -> String {
    format!(
        "Stats: {}/{} words changed ({}%)",
        summary.changed, summary.total, summary.change_percentage
    )
}

impl HumanOutput for NormalizeOutput {
    fn print_human(&self, args: &HassyArgs) {
        match &self.output_path {
            Some(path) => {
                if args.verbosity() > 0 {
                    println!("Normalized text written to {path}");
                    println!("{}", summary_line(&self.summary));
                }
            }
            None => print!("{}", self.normalized),
        }
    }
}

impl HumanOutput for DiffOutput {
    fn print_human(&self, args: &HassyArgs) {
        print!("{}", self.rendered);
        if !self.rendered.ends_with('\n') {
            println!();
        }
        if self.summary.total > 0 && args.verbosity() > 0 {
            println!();
            println!("{}", summary_line(&self.summary));
        }
    }
}

impl HumanOutput for ValidationOutput {
    fn print_human(&self, _args: &HassyArgs) {
        println!("Data Files:");
        println!("═══════════");
        println!("Variants:   {}", self.variants_path);
        println!("Exceptions: {}", self.exceptions_path);
        println!();
        println!(
            "Loaded {} variants of {} canonical forms",
            self.data.variants_loaded, self.data.canonical_forms
        );
        println!("Loaded {} exception words", self.data.exceptions_loaded);

        if self.lint.is_clean() {
            println!();
            println!("No issues found.");
            return;
        }

        println!();
        println!("Findings ({}):", self.lint.findings.len());
        println!("─────────");
        for finding in &self.lint.findings {
            match finding.location {
                Some(location) => println!("  [{location}] {}", finding.message),
                None => println!("  {}", finding.message),
            }
        }
    }
}

impl HumanOutput for StatsOutput {
    fn print_human(&self, _args: &HassyArgs) {
        println!("Word Statistics:");
        println!("════════════════");
        println!("Total words:     {}", self.stats.total_words);
        println!("Changed words:   {}", self.stats.changed_words);
        println!("Unchanged words: {}", self.stats.unchanged_words);
        println!("Change rate:     {}%", self.stats.change_percentage);
        if let Some(version) = self.stats.last_snapshot_version {
            println!("Data version:    {version}");
        }
        println!(
            "Cache:           {} hits, {} misses ({:.1}% hit rate)",
            self.cache.hits,
            self.cache.misses,
            self.cache.hit_ratio() * 100.0
        );

        if !self.top_unknown.is_empty() {
            println!();
            println!("Unknown words:");
            println!("──────────────");
            for unknown in &self.top_unknown {
                println!("  {} ({})", unknown.word, unknown.count);
            }
        }
    }
}
