use image::{Rgba, RgbaImage, imageops};

use crate::{
    composite::{DebugStage, compose_mockup},
    error::PrintmockResult,
    geom::PrintArea,
};

/// Gap between the two panels in the side-by-side raster.
const GUTTER_PX: u32 = 8;
const GUTTER_COLOR: Rgba<u8> = Rgba([220, 220, 220, 255]);

/// Local preview next to the authoritative provider output, with the
/// compositing stage trace. Read-only: nothing upstream is mutated.
#[derive(Clone, Debug)]
pub struct Comparison {
    /// Client-side composite of the design onto the template.
    pub preview: RgbaImage,
    /// Provider-rendered mockup, when one was supplied.
    pub provider: Option<RgbaImage>,
    /// Stages recorded while producing the preview.
    pub stages: Vec<DebugStage>,
}

/// Build a comparison by running the compositor and pairing its output with
/// an optional authoritative mockup.
pub fn build_comparison(
    template: &RgbaImage,
    design: &RgbaImage,
    area: PrintArea,
    provider_mockup: Option<&RgbaImage>,
) -> PrintmockResult<Comparison> {
    let (preview, stages) = compose_mockup(template, design, area)?;
    Ok(Comparison {
        preview,
        provider: provider_mockup.cloned(),
        stages,
    })
}

impl Comparison {
    /// Render both panels into one raster, preview on the left, provider
    /// output (if any) on the right, top-aligned with a gutter between.
    pub fn side_by_side(&self) -> RgbaImage {
        let Some(provider) = &self.provider else {
            return self.preview.clone();
        };

        let width = self.preview.width() + GUTTER_PX + provider.width();
        let height = self.preview.height().max(provider.height());
        let mut out = RgbaImage::from_pixel(width, height, GUTTER_COLOR);
        imageops::replace(&mut out, &self.preview, 0, 0);
        imageops::replace(
            &mut out,
            provider,
            i64::from(self.preview.width() + GUTTER_PX),
            0,
        );
        out
    }

    /// Human-readable rendering of the stage trace, one line per stage.
    pub fn stage_summary(&self) -> Vec<String> {
        self.stages
            .iter()
            .enumerate()
            .map(|(i, stage)| match &stage.description {
                Some(desc) => format!("{}. {}: {desc}", i + 1, stage.name),
                None => format!("{}. {}", i + 1, stage.name),
            })
            .collect()
    }
}
