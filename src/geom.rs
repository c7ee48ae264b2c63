use crate::error::{PrintmockError, PrintmockResult};

/// Normalized print-area rectangle, expressed as fractions of the source
/// image's own dimensions.
///
/// Resolution-independent by construction: the same `PrintArea` is valid
/// against any correctly-cropped re-render of the same template.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PrintArea {
    /// Left edge as a fraction of image width.
    pub x: f64,
    /// Top edge as a fraction of image height.
    pub y: f64,
    /// Width fraction, must be > 0.
    pub width: f64,
    /// Height fraction, must be > 0.
    pub height: f64,
}

impl PrintArea {
    /// Create a validated print area with `x+width <= 1` and `y+height <= 1`.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> PrintmockResult<Self> {
        for (name, v) in [("x", x), ("y", y), ("width", width), ("height", height)] {
            if !v.is_finite() {
                return Err(PrintmockError::validation(format!(
                    "PrintArea {name} must be finite, got {v}"
                )));
            }
        }
        if x < 0.0 || y < 0.0 {
            return Err(PrintmockError::validation(
                "PrintArea origin must be non-negative",
            ));
        }
        if width <= 0.0 || height <= 0.0 {
            return Err(PrintmockError::validation(
                "PrintArea width and height must be > 0",
            ));
        }
        if x + width > 1.0 || y + height > 1.0 {
            return Err(PrintmockError::validation(
                "PrintArea must fit inside the unit square",
            ));
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// Denormalize against concrete image dimensions.
    ///
    /// The result is clamped to the image bounds and never has a zero side,
    /// so a degenerate 1-pixel region stays representable.
    pub fn to_pixels(&self, image_width: u32, image_height: u32) -> PixelRect {
        let w = f64::from(image_width);
        let h = f64::from(image_height);

        let px = (self.x * w).round() as u32;
        let py = (self.y * h).round() as u32;
        let pw = ((self.width * w).round() as u32).max(1);
        let ph = ((self.height * h).round() as u32).max(1);

        let px = px.min(image_width.saturating_sub(1));
        let py = py.min(image_height.saturating_sub(1));
        PixelRect {
            x: px,
            y: py,
            width: pw.min(image_width - px),
            height: ph.min(image_height - py),
        }
    }
}

/// Axis-aligned pixel rectangle inside a concrete raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accepts_unit_square_and_degenerate_fraction() {
        PrintArea::new(0.0, 0.0, 1.0, 1.0).unwrap();
        PrintArea::new(0.999, 0.999, 0.001, 0.001).unwrap();
    }

    #[test]
    fn new_rejects_out_of_range() {
        assert!(PrintArea::new(-0.1, 0.0, 0.5, 0.5).is_err());
        assert!(PrintArea::new(0.0, 0.0, 0.0, 0.5).is_err());
        assert!(PrintArea::new(0.0, 0.0, 0.5, 0.0).is_err());
        assert!(PrintArea::new(0.6, 0.0, 0.5, 0.5).is_err());
        assert!(PrintArea::new(0.0, 0.6, 0.5, 0.5).is_err());
        assert!(PrintArea::new(f64::NAN, 0.0, 0.5, 0.5).is_err());
    }

    #[test]
    fn to_pixels_round_trips_exact_fractions() {
        let area = PrintArea::new(0.30, 0.20, 0.40, 0.60).unwrap();
        let rect = area.to_pixels(1000, 1000);
        assert_eq!(
            rect,
            PixelRect {
                x: 300,
                y: 200,
                width: 400,
                height: 600
            }
        );
    }

    #[test]
    fn to_pixels_never_produces_zero_sides() {
        let area = PrintArea::new(0.5, 0.5, 0.001, 0.001).unwrap();
        let rect = area.to_pixels(10, 10);
        assert!(rect.width >= 1);
        assert!(rect.height >= 1);
        assert!(rect.x + rect.width <= 10);
        assert!(rect.y + rect.height <= 10);
    }

    #[test]
    fn serde_round_trip() {
        let area = PrintArea::new(0.25, 0.1, 0.5, 0.8).unwrap();
        let json = serde_json::to_string(&area).unwrap();
        let back: PrintArea = serde_json::from_str(&json).unwrap();
        assert_eq!(area, back);
    }
}
