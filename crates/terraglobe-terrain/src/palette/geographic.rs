//! Threshold-banded "realistic" coloring keyed on sea level.
//!
//! Unlike the gradient palettes this is a step function: each height falls into
//! exactly one of eight bands and takes that band's fixed color.

/// Band colors from deepest water to snow.
pub const GEOGRAPHIC_COLORS: [[f32; 3]; 8] = [
    [0.05, 0.15, 0.40], // deep ocean
    [0.15, 0.40, 0.70], // shallow water
    [0.86, 0.80, 0.55], // sand
    [0.35, 0.60, 0.25], // grassland
    [0.15, 0.40, 0.15], // forest
    [0.45, 0.35, 0.25], // rock
    [0.65, 0.60, 0.55], // light rock
    [0.95, 0.95, 0.98], // snow
];

/// Upper bounds of the first seven bands; anything above the last is snow.
pub(crate) fn band_thresholds(sea_level: f32) -> [f32; 7] {
    [
        (sea_level - 0.15).max(0.0),
        sea_level,
        sea_level + 0.02,
        sea_level + 0.2,
        sea_level + 0.35,
        sea_level + 0.55,
        sea_level + 0.75,
    ]
}

/// Color for height `h` given the sea level.
pub fn geographic_color(h: f32, sea_level: f32) -> [f32; 3] {
    let band = band_thresholds(sea_level)
        .iter()
        .position(|&upper| h < upper)
        .unwrap_or(GEOGRAPHIC_COLORS.len() - 1);
    GEOGRAPHIC_COLORS[band]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bands_follow_sea_level() {
        let sea = 0.4;
        assert_eq!(geographic_color(0.1, sea), GEOGRAPHIC_COLORS[0]);
        assert_eq!(geographic_color(0.3, sea), GEOGRAPHIC_COLORS[1]);
        assert_eq!(geographic_color(0.41, sea), GEOGRAPHIC_COLORS[2]);
        assert_eq!(geographic_color(0.5, sea), GEOGRAPHIC_COLORS[3]);
        assert_eq!(geographic_color(0.7, sea), GEOGRAPHIC_COLORS[4]);
        assert_eq!(geographic_color(0.9, sea), GEOGRAPHIC_COLORS[5]);
        assert_eq!(geographic_color(1.0, sea), GEOGRAPHIC_COLORS[6]);
    }

    #[test]
    fn test_deep_water_threshold_floors_at_zero() {
        // With sea level 0.1 the deep band is empty: 0.0 is already shallow water.
        assert_eq!(band_thresholds(0.1)[0], 0.0);
        assert_eq!(geographic_color(0.0, 0.1), GEOGRAPHIC_COLORS[1]);
    }

    #[test]
    fn test_snow_above_last_threshold() {
        assert_eq!(geographic_color(0.9, 0.1), GEOGRAPHIC_COLORS[7]);
        assert_eq!(geographic_color(1.0, 0.0), GEOGRAPHIC_COLORS[7]);
    }

    #[test]
    fn test_exact_threshold_moves_to_next_band() {
        assert_eq!(geographic_color(0.5, 0.5), GEOGRAPHIC_COLORS[2]);
    }
}
