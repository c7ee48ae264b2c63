use crate::{
    assets,
    color::ClassifierParams,
    composite::{self, DebugStage},
    detect,
    error::PrintmockResult,
    geom::PrintArea,
    orchestrate::{self, GeneratedMockups, PollConfig},
    provider::RenderProvider,
};

/// Detect the print area of an encoded template image.
#[tracing::instrument(skip_all)]
pub fn detect_print_area_bytes(
    image_bytes: &[u8],
    params: &ClassifierParams,
) -> PrintmockResult<PrintArea> {
    let image = assets::decode_rgba(image_bytes)?;
    detect::detect_print_area(&image, params)
}

/// Composite an encoded design onto an encoded template, returning PNG bytes
/// plus the stage trace.
#[tracing::instrument(skip_all)]
pub fn composite_mockup_bytes(
    template_bytes: &[u8],
    design_bytes: &[u8],
    area: PrintArea,
) -> PrintmockResult<(Vec<u8>, Vec<DebugStage>)> {
    let template = assets::decode_rgba(template_bytes)?;
    let design = assets::decode_rgba(design_bytes)?;
    let (out, stages) = composite::compose_mockup(&template, &design, area)?;
    Ok((assets::encode_png(&out)?, stages))
}

/// Request an authoritative mockup for one variant from the rendering
/// provider and wait for it.
pub async fn generate_mockup<P: RenderProvider>(
    provider: &P,
    variant_id: u64,
    design_image_url: &str,
    cfg: &PollConfig,
) -> PrintmockResult<GeneratedMockups> {
    orchestrate::generate_mockup(provider, &[variant_id], design_image_url, cfg).await
}
