use std::path::PathBuf;
use std::thread;

use clap::{ArgAction, Parser};

use crate::counter::CounterKind;
use crate::errors::{PestGuardError, Result};
use crate::lookup::LookupTable;
use crate::report::{AnalysisRequest, OutputFormat, DEFAULT_LEAF_AREA_CM2};

/// Largest manual override accepted on the command line.
pub const MAX_MANUAL_OVERRIDE: i64 = 200;

/// Upload a leaf photo, get an aphid count, density and action advice.
#[derive(Parser, Debug, Clone)]
#[command(name = "pest-guard", version, about, long_about = None)]
pub struct Config {
    /// Leaf images or directories containing them
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Estimated leaf area in cm²
    #[arg(short, long, default_value_t = DEFAULT_LEAF_AREA_CM2, value_parser = check_leaf_area)]
    pub leaf_area: f64,

    /// Use fallback counts instead of a detection model
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub demo_mode: bool,

    /// Force the aphid count
    #[arg(
        short = 'o',
        long = "override",
        value_parser = clap::value_parser!(i64).range(0..=MAX_MANUAL_OVERRIDE)
    )]
    pub manual_override: Option<i64>,

    /// Original filename used for the lookup table (single image only)
    #[arg(short, long)]
    pub filename: Option<String>,

    /// Counting strategy
    #[arg(short, long, value_enum, default_value_t = CounterKind::Lookup)]
    pub counter: CounterKind,

    /// JSON file of `"file name": count` pairs replacing the built-in table
    #[arg(long)]
    pub lookup_table: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(
        short, long, default_value_t = thread::available_parallelism().map_or(1, |n| n.get())
    )]
    pub num_threads: usize,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    pub fn request(&self) -> AnalysisRequest {
        AnalysisRequest {
            leaf_area_cm2: Some(self.leaf_area),
            demo_mode: self.demo_mode,
            manual_override: self.manual_override,
            filename: self.filename.clone(),
        }
    }

    /// The table given by `--lookup-table`, if any.
    pub fn load_lookup_table(&self) -> Result<Option<LookupTable>> {
        self.lookup_table
            .as_deref()
            .map(LookupTable::from_json_file)
            .transpose()
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_threads == 0 {
            return Err(PestGuardError::Validation {
                field: "num_threads".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn check_leaf_area(s: &str) -> std::result::Result<f64, String> {
    let area: f64 = s
        .parse()
        .map_err(|e| format!("`{s}` is not a number: {e}"))?;
    if !area.is_finite() || area < 0.0 {
        return Err(format!("leaf area must be a finite, non-negative number, got {s}"));
    }
    Ok(area)
}
