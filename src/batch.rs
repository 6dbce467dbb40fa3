//! Running the analyzer over many leaf photos.

use std::path::{Path, PathBuf};

use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::errors::{PestGuardError, Result};
use crate::report::{AnalysisRequest, InferenceReport};
use crate::traits::AphidCounter;
use crate::LeafAnalyzer;

/// Extensions picked up when walking a directory.
const SUPPORTED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "webp", "bmp", "gif", "tiff", "tif", "avif",
];

pub fn is_supported_image_format(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
}

/// Expand the given paths into a sorted, deduplicated list of image files.
///
/// Files are kept as given whatever their extension, so an undecodable file
/// named explicitly still gets a report. Directories are walked recursively
/// and filtered by extension; symlinked images inside them are kept.
pub fn collect_image_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut image_files = Vec::new();

    for input in inputs {
        if input.is_file() {
            image_files.push(input.clone());
        } else if input.is_dir() {
            for entry in WalkDir::new(input).into_iter().filter_map(|e| e.ok()) {
                let path = entry.path();
                if path.is_file() && is_supported_image_format(path) {
                    image_files.push(path.to_path_buf());
                }
            }
        } else {
            return Err(PestGuardError::FileSystem {
                path: input.clone(),
                operation: "locate input".to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "input path does not exist",
                ),
            });
        }
    }

    image_files.sort();
    image_files.dedup();
    tracing::debug!(count = image_files.len(), "collected image files");
    Ok(image_files)
}

fn progress_bar(len: usize, visible: bool) -> Result<ProgressBar> {
    if !visible {
        return Ok(ProgressBar::hidden());
    }

    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
    )
    .map_err(|e| PestGuardError::Configuration {
        message: format!("invalid progress template: {e}"),
    })?
    .progress_chars("#>-");

    Ok(ProgressBar::new(len as u64).with_style(style))
}

/// Analyze every file in parallel. Reports come back in the order of
/// `image_files`, each tagged with its source path.
///
/// A filename in `request` only makes sense for a single image; with more
/// than one file it is ignored and each file's own name is used.
pub fn run_batch<C: AphidCounter>(
    analyzer: &LeafAnalyzer<C>,
    image_files: &[PathBuf],
    request: &AnalysisRequest,
    show_progress: bool,
) -> Result<Vec<InferenceReport>> {
    let request = if image_files.len() > 1 && request.explicit_filename().is_some() {
        tracing::warn!("explicit filename ignored for multi-image runs");
        AnalysisRequest {
            filename: None,
            ..request.clone()
        }
    } else {
        request.clone()
    };

    let pb = progress_bar(image_files.len(), show_progress)?;

    let reports: Vec<_> = image_files
        .par_iter()
        .progress_with(pb.clone())
        .map(|path| analyzer.infer(Some(path.as_path()), &request))
        .collect();

    pb.finish_and_clear();
    Ok(reports)
}
