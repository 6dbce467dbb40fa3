use image::DynamicImage;

/// Abstraction over aphid counting.
///
/// Any implementation, including a future detection model, must honor the
/// same resolution order: a manual override wins (negative values clamp to
/// zero), then whatever the implementation derives from the image and its
/// filename.
pub trait AphidCounter: Send + Sync {
    fn count(
        &self,
        image: &DynamicImage,
        filename: Option<&str>,
        manual_override: Option<i64>,
    ) -> u32;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}
