//! Density based severity classification and spray advice.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Smallest leaf area used as a divisor. Zero, negative and NaN areas are
/// floored to this value.
pub const MIN_LEAF_AREA_CM2: f64 = 1e-6;

/// Lower density bound (aphids/cm²) of each tier above `Low`.
pub const MODERATE_THRESHOLD: f64 = 0.1;
pub const HIGH_THRESHOLD: f64 = 0.5;
pub const SEVERE_THRESHOLD: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeverityTier {
    Low,
    Moderate,
    High,
    Severe,
}

impl SeverityTier {
    /// Tier for a density in aphids per cm². Intervals are half-open, so a
    /// density sitting exactly on a threshold belongs to the upper tier.
    pub fn from_density(density: f64) -> Self {
        if density < MODERATE_THRESHOLD {
            Self::Low
        } else if density < HIGH_THRESHOLD {
            Self::Moderate
        } else if density < SEVERE_THRESHOLD {
            Self::High
        } else {
            Self::Severe
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::Severe => "Severe",
        }
    }

    const fn action(&self) -> &'static str {
        match self {
            Self::Low => {
                "Monitor only. Re-scout in 3\u{2013}5 days; no spray required. \
                 Consider introducing/monitoring beneficials (lady beetles, lacewings)."
            }
            Self::Moderate => {
                "Spot-spray affected zones with selective insecticide or soap; \
                 avoid blanket application. Track hotspots and verify reduction within \
                 48\u{2013}72 hours."
            }
            Self::High => {
                "Sectional spray recommended (rows/blocks). Combine with biological \
                 control plan and adjust fertigation to reduce succulent growth."
            }
            Self::Severe => {
                "Escalate: broad sectional spray + biologicals. Increase scouting \
                 frequency (daily) and consider rotating modes of action to prevent resistance."
            }
        }
    }
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    pub severity: SeverityTier,
    pub text: String,
    pub density_per_cm2: f64,
}

/// Leaf area actually used as the divisor.
pub fn effective_area(leaf_area_cm2: f64) -> f64 {
    // f64::max returns the non-NaN operand
    leaf_area_cm2.max(MIN_LEAF_AREA_CM2)
}

pub fn density(aphid_count: u32, leaf_area_cm2: f64) -> f64 {
    f64::from(aphid_count) / effective_area(leaf_area_cm2)
}

/// Classify an infestation and produce the matching recommendation.
pub fn advise(aphid_count: u32, leaf_area_cm2: f64) -> Advice {
    let density_per_cm2 = density(aphid_count, leaf_area_cm2);
    let severity = SeverityTier::from_density(density_per_cm2);
    let text = format!(
        "Density ~{density_per_cm2:.2} aphids/cm\u{b2}. {}",
        severity.action()
    );

    Advice {
        severity,
        text,
        density_per_cm2,
    }
}
