use std::io::{self, BufWriter, Write};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use rayon::ThreadPoolBuilder;

use pest_guard::{
    batch::{collect_image_files, run_batch},
    logging,
    report::write_reports,
    Config, Counter, LeafAnalyzer,
};

fn main() -> Result<()> {
    let config = Config::parse();
    logging::init_logging(config.verbose)?;
    config.validate()?;

    ThreadPoolBuilder::new()
        .num_threads(config.num_threads)
        .build_global()?;

    let table = config
        .load_lookup_table()
        .context("Failed to load lookup table")?;
    let analyzer = LeafAnalyzer::new(Counter::new(config.counter, table));

    let image_files = collect_image_files(&config.inputs)?;
    ensure!(!image_files.is_empty(), "No image files found in the given inputs");

    let show_progress = !config.no_progress && image_files.len() > 1;
    let reports = run_batch(&analyzer, &image_files, &config.request(), show_progress)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_reports(&mut out, &reports, config.format)?;
    out.flush()?;

    Ok(())
}
