/// Perceptual hue/saturation/lightness sample derived from one RGB pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    /// Hue in degrees, `[0, 360)`.
    pub hue: f64,
    /// Saturation in `[0, 1]`.
    pub saturation: f64,
    /// Lightness in `[0, 1]`.
    pub lightness: f64,
}

/// Convert an RGB byte triplet to HSL using the standard max/min-channel
/// formula.
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> Hsl {
    let r = f64::from(r) / 255.0;
    let g = f64::from(g) / 255.0;
    let b = f64::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let chroma = max - min;
    let lightness = (max + min) / 2.0;

    if chroma == 0.0 {
        return Hsl {
            hue: 0.0,
            saturation: 0.0,
            lightness,
        };
    }

    let saturation = if lightness > 0.5 {
        chroma / (2.0 - max - min)
    } else {
        chroma / (max + min)
    };

    let hue = if max == r {
        60.0 * (((g - b) / chroma).rem_euclid(6.0))
    } else if max == g {
        60.0 * ((b - r) / chroma + 2.0)
    } else {
        60.0 * ((r - g) / chroma + 4.0)
    };

    Hsl {
        hue: hue.rem_euclid(360.0),
        saturation,
        lightness,
    }
}

/// Circular distance between two hues in degrees, taking the shorter way
/// around 360°.
pub fn hue_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

/// Tuning parameters for placeholder-pixel classification.
///
/// The saturation/lightness floors reject near-black or near-gray pixels
/// that coincidentally fall in the target hue band (compression artifacts,
/// anti-aliased edges).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClassifierParams {
    /// Target hue in degrees. Default: magenta, 300°.
    pub target_hue: f64,
    /// Maximum circular hue distance counted as a match (inclusive).
    pub hue_tolerance: f64,
    /// Minimum saturation (inclusive).
    pub min_saturation: f64,
    /// Minimum lightness (inclusive).
    pub min_lightness: f64,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            target_hue: 300.0,
            hue_tolerance: 15.0,
            min_saturation: 0.4,
            min_lightness: 0.15,
        }
    }
}

impl ClassifierParams {
    /// Classify a pre-converted HSL sample. All three thresholds are
    /// inclusive: a hue distance exactly at the tolerance still matches.
    pub fn matches_hsl(&self, sample: Hsl) -> bool {
        hue_distance(sample.hue, self.target_hue) <= self.hue_tolerance
            && sample.saturation >= self.min_saturation
            && sample.lightness >= self.min_lightness
    }

    /// Classify one RGB pixel as placeholder or not.
    pub fn matches_rgb(&self, r: u8, g: u8, b: u8) -> bool {
        self.matches_hsl(rgb_to_hsl(r, g, b))
    }
}
