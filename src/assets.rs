use anyhow::Context as _;
use image::RgbaImage;

use crate::error::{PrintmockError, PrintmockResult};

/// Decode raw bytes into an RGBA raster.
///
/// Sources without an alpha channel are expanded to opaque RGBA.
pub fn decode_rgba(bytes: &[u8]) -> PrintmockResult<RgbaImage> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| PrintmockError::decode(format!("decode image from memory: {e}")))?;
    Ok(img.to_rgba8())
}

/// Fetch raw image bytes over HTTP.
///
/// Non-2xx responses and transport failures both surface as recoverable
/// fetch errors; retry policy belongs to the caller.
pub async fn fetch_image_bytes(client: &reqwest::Client, url: &str) -> PrintmockResult<Vec<u8>> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| PrintmockError::fetch(format!("GET {url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(PrintmockError::fetch(format!("GET {url}: status {status}")));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| PrintmockError::fetch(format!("GET {url}: read body: {e}")))?;
    Ok(bytes.to_vec())
}

/// Fetch and decode an image in one step.
pub async fn fetch_rgba(client: &reqwest::Client, url: &str) -> PrintmockResult<RgbaImage> {
    let bytes = fetch_image_bytes(client, url).await?;
    decode_rgba(&bytes)
}

/// Encode a raster as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> PrintmockResult<Vec<u8>> {
    let mut buf = Vec::new();
    image
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_rgba_png_dimensions() {
        let img = image::RgbaImage::from_raw(2, 1, vec![10, 20, 30, 255, 40, 50, 60, 255]).unwrap();
        let bytes = encode_png(&img).unwrap();

        let decoded = decode_rgba(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (2, 1));
        assert_eq!(decoded.get_pixel(0, 0).0, [10, 20, 30, 255]);
    }

    #[test]
    fn decode_rgba_rejects_garbage() {
        let err = decode_rgba(b"not an image").unwrap_err();
        assert!(matches!(err, PrintmockError::Decode(_)));
    }

    #[test]
    fn decode_expands_missing_alpha() {
        let rgb = image::RgbImage::from_pixel(1, 1, image::Rgb([9, 8, 7]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(rgb)
            .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();

        let decoded = decode_rgba(&buf).unwrap();
        assert_eq!(decoded.get_pixel(0, 0).0, [9, 8, 7, 255]);
    }
}
