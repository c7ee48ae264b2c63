use image::{RgbaImage, imageops};

use crate::{
    error::{PrintmockError, PrintmockResult},
    geom::{PixelRect, PrintArea},
};

/// Annotation captured at one step of the compositing pipeline.
///
/// Observational only: stages are for inspection tooling and never feed back
/// into the final raster.
#[derive(Clone, Debug)]
pub struct DebugStage {
    pub name: String,
    pub description: Option<String>,
    /// Intermediate raster at this stage, when one exists.
    pub image: Option<RgbaImage>,
}

impl DebugStage {
    fn new(name: &str, description: impl Into<String>, image: Option<RgbaImage>) -> Self {
        Self {
            name: name.to_string(),
            description: Some(description.into()),
            image,
        }
    }
}

/// Composite a design raster into the print area of a template raster.
///
/// The design is fitted with a cover policy: scaled to fill the denormalized
/// rectangle completely, center-cropping any overflow, never leaving gaps.
/// Template pixels outside the rectangle are left untouched, and the output
/// always has the template's dimensions.
#[tracing::instrument(skip_all, fields(template_w = template.width(), template_h = template.height()))]
pub fn compose_mockup(
    template: &RgbaImage,
    design: &RgbaImage,
    area: PrintArea,
) -> PrintmockResult<(RgbaImage, Vec<DebugStage>)> {
    let (tw, th) = template.dimensions();
    if tw == 0 || th == 0 {
        return Err(PrintmockError::validation("template image is empty"));
    }
    if design.width() == 0 || design.height() == 0 {
        return Err(PrintmockError::validation("design image is empty"));
    }

    let rect = area.to_pixels(tw, th);
    let mut stages = Vec::new();

    let scaled = scale_to_cover(design, rect);
    stages.push(DebugStage::new(
        "design resized",
        format!(
            "design scaled from {}x{} to {}x{} to cover {}x{}",
            design.width(),
            design.height(),
            scaled.width(),
            scaled.height(),
            rect.width,
            rect.height
        ),
        Some(scaled.clone()),
    ));

    let crop_x = (scaled.width() - rect.width) / 2;
    let crop_y = (scaled.height() - rect.height) / 2;
    let cropped = imageops::crop_imm(&scaled, crop_x, crop_y, rect.width, rect.height).to_image();
    stages.push(DebugStage::new(
        "design cropped",
        format!("center-cropped overflow at offset ({crop_x}, {crop_y})"),
        Some(cropped.clone()),
    ));

    let mut out = template.clone();
    imageops::overlay(&mut out, &cropped, i64::from(rect.x), i64::from(rect.y));
    stages.push(DebugStage::new(
        "composited",
        format!(
            "design placed at ({}, {}) size {}x{}",
            rect.x, rect.y, rect.width, rect.height
        ),
        Some(out.clone()),
    ));

    Ok((out, stages))
}

/// Scale `design` so both sides reach at least the rectangle's size,
/// preserving aspect ratio.
fn scale_to_cover(design: &RgbaImage, rect: PixelRect) -> RgbaImage {
    let sx = f64::from(rect.width) / f64::from(design.width());
    let sy = f64::from(rect.height) / f64::from(design.height());
    let scale = sx.max(sy);

    let w = ((f64::from(design.width()) * scale).round() as u32).max(rect.width);
    let h = ((f64::from(design.height()) * scale).round() as u32).max(rect.height);
    if (w, h) == design.dimensions() {
        return design.clone();
    }
    imageops::resize(design, w, h, imageops::FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn area() -> PrintArea {
        PrintArea::new(0.25, 0.25, 0.5, 0.5).unwrap()
    }

    #[test]
    fn output_dimensions_equal_template_dimensions() {
        let template = RgbaImage::from_pixel(40, 60, WHITE);
        for (dw, dh) in [(1, 1), (100, 10), (10, 100), (33, 47)] {
            let design = RgbaImage::from_pixel(dw, dh, RED);
            let (out, _) = compose_mockup(&template, &design, area()).unwrap();
            assert_eq!(out.dimensions(), (40, 60));
        }
    }

    #[test]
    fn pixels_outside_rect_are_untouched_and_inside_covered() {
        let template = RgbaImage::from_pixel(40, 40, WHITE);
        let design = RgbaImage::from_pixel(3, 17, RED);
        let (out, _) = compose_mockup(&template, &design, area()).unwrap();

        let rect = area().to_pixels(40, 40);
        for (x, y, pixel) in out.enumerate_pixels() {
            let inside = x >= rect.x
                && x < rect.x + rect.width
                && y >= rect.y
                && y < rect.y + rect.height;
            if inside {
                // Cover fit leaves no gaps: every rect pixel comes from the
                // solid red design.
                assert_eq!(*pixel, RED, "gap at ({x}, {y})");
            } else {
                assert_eq!(*pixel, WHITE, "clobbered template at ({x}, {y})");
            }
        }
    }

    #[test]
    fn stage_trace_names_and_order() {
        let template = RgbaImage::from_pixel(16, 16, WHITE);
        let design = RgbaImage::from_pixel(4, 4, RED);
        let (_, stages) = compose_mockup(&template, &design, area()).unwrap();
        let names: Vec<&str> = stages.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["design resized", "design cropped", "composited"]);
        assert!(stages.iter().all(|s| s.image.is_some()));
    }

    #[test]
    fn wide_design_into_tall_rect_center_crops_horizontally() {
        let template = RgbaImage::from_pixel(100, 100, WHITE);
        // Left half green, right half red; the cover crop should keep the
        // middle, so both colors survive at the rect's horizontal center.
        let design = RgbaImage::from_fn(100, 10, |x, _| {
            if x < 50 {
                Rgba([0, 255, 0, 255])
            } else {
                RED
            }
        });
        let tall = PrintArea::new(0.4, 0.1, 0.2, 0.8).unwrap();
        let (out, _) = compose_mockup(&template, &design, tall).unwrap();

        let rect = tall.to_pixels(100, 100);
        let mid_y = rect.y + rect.height / 2;
        let left = out.get_pixel(rect.x, mid_y);
        let right = out.get_pixel(rect.x + rect.width - 1, mid_y);
        assert!(left.0[1] > left.0[0], "left side should stay green");
        assert!(right.0[0] > right.0[1], "right side should stay red");
    }

    #[test]
    fn empty_design_is_rejected() {
        let template = RgbaImage::from_pixel(8, 8, WHITE);
        let design = RgbaImage::new(0, 0);
        assert!(matches!(
            compose_mockup(&template, &design, area()),
            Err(PrintmockError::Validation(_))
        ));
    }
}
