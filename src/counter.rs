//! Aphid counting strategies.

use std::borrow::Cow;

use clap::ValueEnum;
use image::{DynamicImage, GenericImageView};

use crate::lookup::LookupTable;
use crate::traits::AphidCounter;

/// Pixels per counted aphid in the size based fallback (one 512x512 tile).
pub const FALLBACK_TILE_PIXELS: u64 = 512 * 512;

/// Clamp a user supplied count into the valid range.
pub fn clamp_override(manual_override: i64) -> u32 {
    u32::try_from(manual_override.max(0)).unwrap_or(u32::MAX)
}

/// `floor(width * height / 512²)`, saturating at `u32::MAX`.
pub fn fallback_count(width: u32, height: u32) -> u32 {
    let pixels = u64::from(width) * u64::from(height);
    u32::try_from(pixels / FALLBACK_TILE_PIXELS).unwrap_or(u32::MAX)
}

/// Counter used in demo mode: override, then filename lookup, then the
/// image-size fallback.
#[derive(Debug, Clone)]
pub struct LookupFallbackCounter {
    table: Cow<'static, LookupTable>,
}

impl LookupFallbackCounter {
    pub fn new(table: LookupTable) -> Self {
        Self {
            table: Cow::Owned(table),
        }
    }

    pub fn table(&self) -> &LookupTable {
        &self.table
    }
}

impl Default for LookupFallbackCounter {
    fn default() -> Self {
        Self {
            table: Cow::Borrowed(LookupTable::builtin()),
        }
    }
}

impl AphidCounter for LookupFallbackCounter {
    fn count(
        &self,
        image: &DynamicImage,
        filename: Option<&str>,
        manual_override: Option<i64>,
    ) -> u32 {
        if let Some(value) = manual_override {
            tracing::debug!(value, "using manual override");
            return clamp_override(value);
        }

        if let Some(hit) = filename.and_then(|name| self.table.get(name)) {
            tracing::debug!(filename, count = hit, "lookup table hit");
            return hit;
        }

        let (width, height) = image.dimensions();
        let count = fallback_count(width, height);
        tracing::debug!(width, height, count, "size based fallback");
        count
    }

    fn name(&self) -> &'static str {
        "lookup"
    }
}

/// Slot for a detection model.
///
/// No model is wired in yet, so counting goes through the lookup and
/// fallback path. A real model replaces only the fallback branch.
#[derive(Debug, Clone)]
pub struct ModelBackedCounter {
    fallback: LookupFallbackCounter,
}

impl ModelBackedCounter {
    pub fn new(fallback: LookupFallbackCounter) -> Self {
        tracing::warn!("no aphid detection model is available; using lookup and size fallback");
        Self { fallback }
    }
}

impl Default for ModelBackedCounter {
    fn default() -> Self {
        Self::new(LookupFallbackCounter::default())
    }
}

impl AphidCounter for ModelBackedCounter {
    fn count(
        &self,
        image: &DynamicImage,
        filename: Option<&str>,
        manual_override: Option<i64>,
    ) -> u32 {
        self.fallback.count(image, filename, manual_override)
    }

    fn name(&self) -> &'static str {
        "model"
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum CounterKind {
    /// Filename lookup with an image-size fallback
    #[default]
    Lookup,
    /// Detection model (not yet available, behaves like `lookup`)
    Model,
}

/// Counter strategy selected by configuration.
#[derive(Debug, Clone)]
pub enum Counter {
    Lookup(LookupFallbackCounter),
    Model(ModelBackedCounter),
}

impl Counter {
    pub fn new(kind: CounterKind, table: Option<LookupTable>) -> Self {
        let lookup = table.map_or_else(LookupFallbackCounter::default, LookupFallbackCounter::new);
        match kind {
            CounterKind::Lookup => Self::Lookup(lookup),
            CounterKind::Model => Self::Model(ModelBackedCounter::new(lookup)),
        }
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::Lookup(LookupFallbackCounter::default())
    }
}

impl AphidCounter for Counter {
    fn count(
        &self,
        image: &DynamicImage,
        filename: Option<&str>,
        manual_override: Option<i64>,
    ) -> u32 {
        match self {
            Self::Lookup(counter) => counter.count(image, filename, manual_override),
            Self::Model(counter) => counter.count(image, filename, manual_override),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Lookup(counter) => counter.name(),
            Self::Model(counter) => counter.name(),
        }
    }
}
