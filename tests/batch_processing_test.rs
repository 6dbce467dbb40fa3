use std::fs;
use std::path::PathBuf;

use image::{DynamicImage, ImageFormat};
use tempfile::TempDir;

use pest_guard::{
    batch::{collect_image_files, run_batch},
    mocks::MockCounter,
    AnalysisRequest, LeafAnalyzer, SeverityTier,
};

#[test]
fn test_directory_batch() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let plot = temp_dir.path().join("plot_2");
    fs::create_dir_all(&plot)?;

    DynamicImage::new_rgb8(512, 512).save_with_format(plot.join("RW S (10).jpg"), ImageFormat::Png)?;
    DynamicImage::new_rgb8(1024, 1024).save(temp_dir.path().join("a_leaf.png"))?;
    fs::write(plot.join("broken.png"), b"not an image")?;
    fs::write(plot.join("readme.txt"), b"field notes")?;

    let files = collect_image_files(&[temp_dir.path().to_path_buf()])?;
    assert_eq!(files.len(), 3);

    let analyzer = LeafAnalyzer::default();
    let reports = run_batch(&analyzer, &files, &AnalysisRequest::new(10.0), false)?;
    assert_eq!(reports.len(), 3);

    // sorted: a_leaf.png, plot_2/RW S (10).jpg, plot_2/broken.png
    for (report, file) in reports.iter().zip(&files) {
        assert_eq!(report.source.as_ref(), Some(file));
    }

    assert_eq!(reports[0].aphid_count, 4);
    assert_eq!(reports[0].severity, Some(SeverityTier::Moderate));
    assert_eq!(reports[1].aphid_count, 10);
    assert_eq!(reports[1].severity, Some(SeverityTier::High));
    assert!(reports[2].header.starts_with("Error opening image:"));
    Ok(())
}

#[test]
fn test_batch_ignores_explicit_filename() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let mut files = Vec::new();
    for i in 0..3 {
        let path = temp_dir.path().join(format!("leaf_{i}.png"));
        DynamicImage::new_rgb8(512, 512).save(&path)?;
        files.push(path);
    }

    let analyzer = LeafAnalyzer::default();
    let request = AnalysisRequest::new(100.0).with_filename("RW S (24).jpg");
    let reports = run_batch(&analyzer, &files, &request, false)?;

    assert!(reports.iter().all(|r| r.aphid_count == 1));

    // a single file still honors it
    let single = run_batch(&analyzer, &files[..1], &request, false)?;
    assert_eq!(single[0].aphid_count, 10);
    Ok(())
}

#[test]
fn test_batch_calls_counter_once_per_image() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let files: Vec<PathBuf> = (0..8)
        .map(|i| temp_dir.path().join(format!("{i}.png")))
        .collect();
    for path in &files {
        DynamicImage::new_rgb8(16, 16).save(path)?;
    }

    let analyzer = LeafAnalyzer::new(MockCounter::new(45));
    let reports = run_batch(&analyzer, &files, &AnalysisRequest::new(300.0), false)?;

    assert_eq!(analyzer.counter().calls(), files.len());
    assert!(reports
        .iter()
        .all(|r| r.severity == Some(SeverityTier::Moderate)));
    Ok(())
}
