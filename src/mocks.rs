use std::sync::atomic::{AtomicUsize, Ordering};

use crate::counter::clamp_override;
use crate::traits::AphidCounter;
use image::DynamicImage;

/// Counter returning a fixed value, for tests that only care about the
/// advice and formatting path.
#[derive(Debug, Default)]
pub struct MockCounter {
    pub fixed_count: u32,
    calls: AtomicUsize,
}

impl MockCounter {
    pub const fn new(fixed_count: u32) -> Self {
        Self {
            fixed_count,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl AphidCounter for MockCounter {
    fn count(
        &self,
        _image: &DynamicImage,
        _filename: Option<&str>,
        manual_override: Option<i64>,
    ) -> u32 {
        self.calls.fetch_add(1, Ordering::Relaxed);
        manual_override.map_or(self.fixed_count, clamp_override)
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
