//! Report formatting for batch validation results.
//!
//! This module renders a [`BatchSummary`] as JSON, human-readable console
//! text, or Markdown for reports.
//!
//! # Examples
//!
//! ```rust
//! use account_guard::core::{Record, RecordValidator, Schema};
//! use account_guard::formatters::{FormatterConfig, HumanFormatter, ResultFormatter};
//!
//! let validator = RecordValidator::new(Schema::account_opening());
//! let summary = validator.validate_batch(&[Record::new()]).unwrap();
//!
//! let output = HumanFormatter::with_config(FormatterConfig::ci())
//!     .format(&summary)
//!     .unwrap();
//! assert!(output.contains("Validation FAILED"));
//! ```

use crate::core::{BatchSummary, RecordOutcome};
use crate::prelude::*;
use serde::Serialize;
use std::fmt::{self, Write};

/// Configuration options for formatting batch results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterConfig {
    /// Include per-record details
    pub include_records: bool,
    /// Include records that passed, not just failures
    pub include_valid_records: bool,
    /// Maximum number of records to display (`None` for all)
    pub max_records: Option<usize>,
    /// Include warnings in per-record details
    pub include_warnings: bool,
    /// Whether to use colorized output (for human formatter)
    pub use_colors: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            include_records: true,
            include_valid_records: false,
            max_records: None,
            include_warnings: true,
            use_colors: true,
        }
    }
}

impl FormatterConfig {
    /// Creates a minimal configuration showing only summary.
    pub fn minimal() -> Self {
        Self {
            include_records: false,
            include_valid_records: false,
            max_records: Some(0),
            include_warnings: false,
            use_colors: false,
        }
    }

    /// Creates a detailed configuration showing everything.
    pub fn detailed() -> Self {
        Self {
            include_records: true,
            include_valid_records: true,
            max_records: None,
            include_warnings: true,
            use_colors: true,
        }
    }

    /// Creates a configuration suitable for CI/CD environments.
    pub fn ci() -> Self {
        Self {
            include_records: true,
            include_valid_records: false,
            max_records: Some(50), // Limit output in CI
            include_warnings: false,
            use_colors: false,
        }
    }

    pub fn with_records(mut self, include: bool) -> Self {
        self.include_records = include;
        self
    }

    pub fn with_valid_records(mut self, include: bool) -> Self {
        self.include_valid_records = include;
        self
    }

    pub fn with_max_records(mut self, max: usize) -> Self {
        self.max_records = Some(max);
        self
    }

    pub fn with_warnings(mut self, include: bool) -> Self {
        self.include_warnings = include;
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }
}

/// Trait for rendering batch results into different output formats.
///
/// # Examples
///
/// ```rust
/// use account_guard::core::BatchSummary;
/// use account_guard::formatters::ResultFormatter;
///
/// struct RateOnly;
///
/// impl ResultFormatter for RateOnly {
///     fn format(&self, summary: &BatchSummary) -> account_guard::prelude::Result<String> {
///         Ok(format!("{:.2}", summary.validation_rate()))
///     }
/// }
/// ```
pub trait ResultFormatter {
    fn format(&self, summary: &BatchSummary) -> Result<String>;

    /// Formats with an explicit configuration. The default ignores it.
    fn format_with_config(&self, summary: &BatchSummary, _config: &FormatterConfig) -> Result<String> {
        self.format(summary)
    }
}

/// Records to show under `config`, and how many matching records were cut.
fn selected_records<'a>(
    summary: &'a BatchSummary,
    config: &FormatterConfig,
) -> (Vec<&'a RecordOutcome>, usize) {
    if !config.include_records {
        return (Vec::new(), 0);
    }

    let matching: Vec<&RecordOutcome> = summary
        .per_record()
        .iter()
        .filter(|r| config.include_valid_records || !r.is_valid)
        .collect();
    let limit = config.max_records.unwrap_or(matching.len()).min(matching.len());
    let hidden = matching.len() - limit;
    (matching.into_iter().take(limit).collect(), hidden)
}

fn render_failed(e: fmt::Error) -> GuardError {
    GuardError::internal(format!("Failed to render report: {e}"))
}

/// Formats batch results as structured JSON.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    config: FormatterConfig,
    pretty: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    status: &'static str,
    total_records: usize,
    valid_records: usize,
    invalid_records: usize,
    total_errors: usize,
    total_warnings: usize,
    validation_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    records: Option<Vec<JsonRecord<'a>>>,
    #[serde(skip_serializing_if = "is_zero")]
    omitted_records: usize,
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    index: usize,
    is_valid: bool,
    errors: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<&'a [String]>,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
            pretty: true,
        }
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            pretty: true,
        }
    }

    /// Sets whether to use pretty-printed JSON.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultFormatter for JsonFormatter {
    fn format(&self, summary: &BatchSummary) -> Result<String> {
        self.format_with_config(summary, &self.config)
    }

    fn format_with_config(&self, summary: &BatchSummary, config: &FormatterConfig) -> Result<String> {
        let (shown, hidden) = selected_records(summary, config);
        let records = config.include_records.then(|| {
            shown
                .into_iter()
                .map(|r| JsonRecord {
                    index: r.index,
                    is_valid: r.is_valid,
                    errors: &r.errors,
                    warnings: config.include_warnings.then_some(r.warnings.as_slice()),
                })
                .collect()
        });

        let report = JsonReport {
            status: if summary.all_valid() { "success" } else { "failure" },
            total_records: summary.total_records(),
            valid_records: summary.valid_records(),
            invalid_records: summary.invalid_records(),
            total_errors: summary.total_errors(),
            total_warnings: summary.total_warnings(),
            validation_rate: summary.validation_rate(),
            records,
            omitted_records: hidden,
        };

        let rendered = if self.pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        };
        rendered.map_err(|e| GuardError::internal(format!("Failed to serialize report to JSON: {e}")))
    }
}

/// Formats batch results for console output, optionally with ANSI colors.
#[derive(Debug, Clone, Default)]
pub struct HumanFormatter {
    config: FormatterConfig,
}

impl HumanFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }

    fn render(
        &self,
        out: &mut String,
        summary: &BatchSummary,
        config: &FormatterConfig,
    ) -> fmt::Result {
        let paint = |code: &str, text: &str| {
            if config.use_colors {
                format!("\x1b[{code}m{text}\x1b[0m")
            } else {
                text.to_string()
            }
        };

        writeln!(out)?;
        if summary.all_valid() {
            writeln!(out, "✅ {}", paint("32", "Validation PASSED"))?;
        } else {
            writeln!(out, "❌ {}", paint("31", "Validation FAILED"))?;
        }

        writeln!(out)?;
        writeln!(out, "📊 Summary Statistics:")?;
        writeln!(out, "   Total Records: {}", summary.total_records())?;
        writeln!(out, "   ✅ Valid: {}", paint("32", &summary.valid_records().to_string()))?;
        writeln!(out, "   ❌ Invalid: {}", paint("31", &summary.invalid_records().to_string()))?;
        writeln!(out, "   Errors: {}", summary.total_errors())?;
        writeln!(out, "   Warnings: {}", summary.total_warnings())?;
        writeln!(out, "   Validation Rate: {:.1}%", summary.validation_rate() * 100.0)?;

        let (shown, hidden) = selected_records(summary, config);
        if !shown.is_empty() {
            writeln!(out)?;
            writeln!(out, "🔍 Records:")?;
            for record in shown {
                writeln!(out)?;
                let symbol = if record.is_valid { "✅" } else { "🚨" };
                writeln!(out, "   {symbol} Record #{}", record.index)?;
                for error in &record.errors {
                    writeln!(out, "      {}", paint("31", error))?;
                }
                if config.include_warnings {
                    for warning in &record.warnings {
                        writeln!(out, "      ⚠️ {}", paint("33", warning))?;
                    }
                }
            }
        }
        if hidden > 0 {
            writeln!(out)?;
            writeln!(out, "   ... and {hidden} more records (raise max_records to show more)")?;
        }

        writeln!(out)
    }
}

impl ResultFormatter for HumanFormatter {
    fn format(&self, summary: &BatchSummary) -> Result<String> {
        self.format_with_config(summary, &self.config)
    }

    fn format_with_config(&self, summary: &BatchSummary, config: &FormatterConfig) -> Result<String> {
        let mut output = String::new();
        self.render(&mut output, summary, config)
            .map_err(render_failed)?;
        Ok(output)
    }
}

/// Formats batch results as Markdown.
#[derive(Debug, Clone)]
pub struct MarkdownFormatter {
    config: FormatterConfig,
    heading_level: u8,
}

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
            heading_level: 2,
        }
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            heading_level: 2,
        }
    }

    /// Sets the base heading level for the output.
    pub fn with_heading_level(mut self, level: u8) -> Self {
        self.heading_level = level.clamp(1, 6);
        self
    }

    fn render(
        &self,
        out: &mut String,
        summary: &BatchSummary,
        config: &FormatterConfig,
    ) -> fmt::Result {
        let h = "#".repeat(self.heading_level as usize);
        let status = if summary.all_valid() {
            "✅ Batch Validation - PASSED"
        } else {
            "❌ Batch Validation - FAILED"
        };

        writeln!(out, "{h} {status}")?;
        writeln!(out)?;
        writeln!(out, "| Metric | Value |")?;
        writeln!(out, "|--------|-------|")?;
        writeln!(out, "| Total Records | {} |", summary.total_records())?;
        writeln!(out, "| Valid | {} |", summary.valid_records())?;
        writeln!(out, "| Invalid | {} |", summary.invalid_records())?;
        writeln!(out, "| Errors | {} |", summary.total_errors())?;
        writeln!(out, "| Warnings | {} |", summary.total_warnings())?;
        writeln!(out, "| Validation Rate | {:.1}% |", summary.validation_rate() * 100.0)?;

        let (shown, hidden) = selected_records(summary, config);
        if !shown.is_empty() {
            writeln!(out)?;
            writeln!(out, "{h}# Records")?;
            writeln!(out)?;
            writeln!(out, "| Record | Valid | Messages |")?;
            writeln!(out, "|--------|-------|----------|")?;
            for record in shown {
                let mut messages: Vec<String> = record.errors.iter().map(|e| escape_cell(e)).collect();
                if config.include_warnings {
                    messages.extend(record.warnings.iter().map(|w| format!("⚠️ {}", escape_cell(w))));
                }
                writeln!(
                    out,
                    "| {} | {} | {} |",
                    record.index,
                    if record.is_valid { "yes" } else { "no" },
                    messages.join("<br>")
                )?;
            }
        }
        if hidden > 0 {
            writeln!(out)?;
            writeln!(out, "> **Note:** {hidden} additional records not shown in this report.")?;
        }
        Ok(())
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultFormatter for MarkdownFormatter {
    fn format(&self, summary: &BatchSummary) -> Result<String> {
        self.format_with_config(summary, &self.config)
    }

    fn format_with_config(&self, summary: &BatchSummary, config: &FormatterConfig) -> Result<String> {
        let mut output = String::new();
        self.render(&mut output, summary, config)
            .map_err(render_failed)?;
        Ok(output)
    }
}
