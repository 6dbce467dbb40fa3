pub mod advisor;
pub mod batch;
pub mod config;
pub mod counter;
pub mod errors;
pub mod logging;
pub mod lookup;
pub mod report;
pub mod traits;

pub mod mocks;

use std::path::Path;

use image::{DynamicImage, ImageError, ImageReader};

pub use advisor::{advise, Advice, SeverityTier};
pub use config::Config;
pub use counter::{Counter, CounterKind, LookupFallbackCounter, ModelBackedCounter};
pub use errors::{PestGuardError, Result};
pub use lookup::LookupTable;
pub use report::{AnalysisRequest, InferenceReport};
pub use traits::*;

#[cfg(test)]
pub use mocks::*;

/// Runs one leaf image through counting and advice.
pub struct LeafAnalyzer<C: AphidCounter> {
    counter: C,
}

impl<C: AphidCounter> LeafAnalyzer<C> {
    pub const fn new(counter: C) -> Self {
        Self { counter }
    }

    pub fn counter(&self) -> &C {
        &self.counter
    }

    /// Decode the image at `image_path` and analyze it.
    ///
    /// Never fails: a missing path or an undecodable file yields a report
    /// whose header carries the reason and whose numbers are zero.
    pub fn infer(&self, image_path: Option<&Path>, request: &AnalysisRequest) -> InferenceReport {
        let Some(path) = image_path else {
            tracing::warn!("no image supplied");
            return InferenceReport::missing_input();
        };

        let image = match decode_image(path) {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to decode image");
                return InferenceReport::decode_failure(e).with_source(path);
            }
        };

        let derived = path.file_name().and_then(|name| name.to_str());
        let filename = request.explicit_filename().or(derived);

        self.analyze_image(&image, filename, request).with_source(path)
    }

    /// Analyze an already decoded image.
    pub fn analyze_image(
        &self,
        image: &DynamicImage,
        filename: Option<&str>,
        request: &AnalysisRequest,
    ) -> InferenceReport {
        let leaf_area = request.leaf_area();
        let aphid_count = self.counter.count(image, filename, request.manual_override);
        let advice = advise(aphid_count, leaf_area);

        tracing::info!(
            counter = self.counter.name(),
            demo_mode = request.demo_mode,
            filename,
            aphid_count,
            density = advice.density_per_cm2,
            severity = %advice.severity,
            "leaf analyzed"
        );

        InferenceReport::from_advice(aphid_count, leaf_area, advice)
    }
}

impl Default for LeafAnalyzer<Counter> {
    fn default() -> Self {
        Self::new(Counter::default())
    }
}

/// Decode a file, guessing the format from its contents. The reader owns
/// the file handle, so it is closed on every return path.
pub fn decode_image(path: &Path) -> std::result::Result<DynamicImage, ImageError> {
    ImageReader::open(path)
        .map_err(ImageError::IoError)?
        .with_guessed_format()
        .map_err(ImageError::IoError)?
        .decode()
}
