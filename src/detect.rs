use image::RgbaImage;

use crate::{
    color::ClassifierParams,
    error::{PrintmockError, PrintmockResult},
    geom::PrintArea,
};

/// Locate the placeholder region in a decoded template raster.
///
/// Scans every pixel once, left-to-right, top-to-bottom, folding matching
/// pixels into a running bounding box, then normalizes the box to fractions
/// of the image's own dimensions. Deterministic for a given raster. Runs in
/// O(pixels), which is acceptable because detection happens once per
/// template and the result is cached by the registry.
#[tracing::instrument(skip(image, params), fields(width = image.width(), height = image.height()))]
pub fn detect_print_area(
    image: &RgbaImage,
    params: &ClassifierParams,
) -> PrintmockResult<PrintArea> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(PrintmockError::validation(
            "cannot detect a print area in an empty image",
        ));
    }

    let mut bounds: Option<(u32, u32, u32, u32)> = None; // min_x, min_y, max_x, max_y
    for (x, y, pixel) in image.enumerate_pixels() {
        let [r, g, b, _] = pixel.0;
        if !params.matches_rgb(r, g, b) {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((min_x, min_y, max_x, max_y)) => {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            }
        });
    }

    let Some((min_x, min_y, max_x, max_y)) = bounds else {
        return Err(PrintmockError::detection(format!(
            "no placeholder pixels within {}°±{}° found; template may be uncropped or missing its chroma key",
            params.target_hue, params.hue_tolerance
        )));
    };

    tracing::debug!(min_x, min_y, max_x, max_y, "placeholder bounding box");

    let w = f64::from(width);
    let h = f64::from(height);
    PrintArea::new(
        f64::from(min_x) / w,
        f64::from(min_y) / h,
        f64::from(max_x - min_x + 1) / w,
        f64::from(max_y - min_y + 1) / h,
    )
}
