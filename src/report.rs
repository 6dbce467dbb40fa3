use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::advisor::{Advice, SeverityTier};

pub const PRODUCT_NAME: &str = "PPG Pest Guard Advice";

/// Leaf area assumed when none (or zero) is supplied.
pub const DEFAULT_LEAF_AREA_CM2: f64 = 100.0;

/// Per-call knobs for one analysis.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisRequest {
    pub leaf_area_cm2: Option<f64>,
    /// Informational; counting is identical either way.
    pub demo_mode: bool,
    pub manual_override: Option<i64>,
    pub filename: Option<String>,
}

impl AnalysisRequest {
    pub fn new(leaf_area_cm2: f64) -> Self {
        Self {
            leaf_area_cm2: Some(leaf_area_cm2),
            demo_mode: true,
            ..Self::default()
        }
    }

    pub fn with_override(mut self, manual_override: i64) -> Self {
        self.manual_override = Some(manual_override);
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Leaf area with the default applied for a missing or zero value.
    ///
    /// This substituted value is also what the summary line prints, so a
    /// zero entry reads as `100.0 cm²` rather than `0.0 cm²`.
    pub fn leaf_area(&self) -> f64 {
        match self.leaf_area_cm2 {
            Some(area) if area != 0.0 => area,
            _ => DEFAULT_LEAF_AREA_CM2,
        }
    }

    /// Explicit filename when set and non-empty.
    pub fn explicit_filename(&self) -> Option<&str> {
        self.filename.as_deref().filter(|name| !name.is_empty())
    }
}

/// Everything a presentation layer needs for one image.
///
/// Missing or undecodable input is a report too: the header describes the
/// problem, numbers are zero and there is no severity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    pub header: String,
    pub summary: String,
    pub aphid_count: u32,
    pub density_per_cm2: f64,
    pub advice: String,
    pub severity: Option<SeverityTier>,
}

impl InferenceReport {
    pub fn missing_input() -> Self {
        Self::failure("No image uploaded.".to_string())
    }

    pub fn decode_failure(reason: impl fmt::Display) -> Self {
        Self::failure(format!("Error opening image: {reason}"))
    }

    fn failure(header: String) -> Self {
        Self {
            source: None,
            header,
            summary: String::new(),
            aphid_count: 0,
            density_per_cm2: 0.0,
            advice: String::new(),
            severity: None,
        }
    }

    pub fn from_advice(aphid_count: u32, leaf_area_cm2: f64, advice: Advice) -> Self {
        let Advice {
            severity,
            text,
            density_per_cm2,
        } = advice;

        Self {
            source: None,
            header: format!("{PRODUCT_NAME} \u{2014} {severity}"),
            summary: format!(
                "Aphids counted: {aphid_count} | Leaf area: {leaf_area_cm2:.1} cm\u{b2} | \
                 Density: {density_per_cm2:.2} aphids/cm\u{b2}"
            ),
            aphid_count,
            density_per_cm2,
            advice: text,
            severity: Some(severity),
        }
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.severity.is_some()
    }
}

impl fmt::Display for InferenceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            writeln!(f, "[{}]", source.display())?;
        }
        write!(f, "{}", self.header)?;
        if self.is_success() {
            write!(f, "\n{}\nAdvice: {}", self.summary, self.advice)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Write reports in the chosen format. Text reports are separated by a
/// blank line; JSON reports are one object per line.
pub fn write_reports<W: Write>(
    out: &mut W,
    reports: &[InferenceReport],
    format: OutputFormat,
) -> io::Result<()> {
    for (i, report) in reports.iter().enumerate() {
        match format {
            OutputFormat::Text => {
                if i > 0 {
                    writeln!(out)?;
                }
                writeln!(out, "{report}")?;
            }
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, report)?;
                writeln!(out)?;
            }
        }
    }
    Ok(())
}
