use std::io::Cursor;

use image::{DynamicImage, ImageFormat, codecs::jpeg::JpegEncoder, imageops::FilterType};

use crate::error::{NormalizeError, NormalizeResult};

/// Quality used for every lossy (JPEG) output.
pub const JPEG_QUALITY: u8 = 92;

/// Encoding of a normalized output image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutputEncoding {
    Png,
    Jpeg,
}

impl OutputEncoding {
    /// MIME type of this encoding.
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

/// Decode `source`, resize to exactly `width`×`height` with crop-to-fill, and
/// encode as `encoding`.
///
/// # Errors
///
/// Returns [`NormalizeError::InvalidImage`] when `source` cannot be decoded
/// and [`NormalizeError::Encode`] when the output encoder fails.
pub fn normalize(
    source: &[u8],
    width: u32,
    height: u32,
    encoding: OutputEncoding,
) -> NormalizeResult<Vec<u8>> {
    let decoded = image::load_from_memory(source)
        .map_err(|e| NormalizeError::InvalidImage(e.to_string()))?;
    encode(&normalize_image(&decoded, width, height), encoding)
}

/// Crop-to-fill resize of an already-decoded image.
///
/// The source is scaled until it fully covers the `width`×`height` box, then
/// the overflow is cropped around the center: a source relatively wider than
/// the box loses its left/right edges, a relatively taller one its top/bottom
/// edges. The result is always exactly the requested size.
#[must_use]
pub fn normalize_image(source: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    source.resize_to_fill(width, height, FilterType::Lanczos3)
}

/// Encode a decoded image with the fixed quality settings.
///
/// JPEG output is flattened to RGB first since the format carries no alpha.
///
/// # Errors
///
/// Returns [`NormalizeError::Encode`] when the encoder fails.
pub fn encode(image: &DynamicImage, encoding: OutputEncoding) -> NormalizeResult<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    match encoding {
        OutputEncoding::Png => image.write_to(&mut out, ImageFormat::Png)?,
        OutputEncoding::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
            image.to_rgb8().write_with_encoder(encoder)?;
        }
    }
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use rstest::rstest;

    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn solid(width: u32, height: u32, color: Rgba<u8>) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, color))
    }

    fn png_bytes(image: &DynamicImage) -> Vec<u8> {
        encode(image, OutputEncoding::Png).unwrap()
    }

    /// 2000×1000 source: red left band, green 1000×1000 center square, blue
    /// right band. The center square is what a crop-to-fill square target
    /// must keep.
    fn banded_wide() -> DynamicImage {
        let img = RgbaImage::from_fn(2000, 1000, |x, _| {
            if x < 500 {
                RED
            } else if x < 1500 {
                GREEN
            } else {
                BLUE
            }
        });
        DynamicImage::ImageRgba8(img)
    }

    #[rstest]
    #[case::wider_source(2000, 1000, 1024, 1024)]
    #[case::taller_source(1000, 2000, 1024, 1024)]
    #[case::same_ratio(1840, 860, 920, 430)]
    #[case::upscale(100, 60, 920, 430)]
    #[case::extreme_wide(3000, 100, 512, 512)]
    #[case::extreme_tall(100, 3000, 184, 184)]
    #[case::non_square_target(640, 480, 748, 896)]
    fn output_dimensions_match_target_exactly(
        #[case] sw: u32,
        #[case] sh: u32,
        #[case] tw: u32,
        #[case] th: u32,
    ) {
        let source = png_bytes(&solid(sw, sh, GREEN));
        let out = normalize(&source, tw, th, OutputEncoding::Png).unwrap();
        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (tw, th));
    }

    #[rstest]
    #[case::png(OutputEncoding::Png, ImageFormat::Png)]
    #[case::jpeg(OutputEncoding::Jpeg, ImageFormat::Jpeg)]
    fn output_encoding_is_honored(#[case] encoding: OutputEncoding, #[case] expected: ImageFormat) {
        let source = png_bytes(&solid(300, 200, BLUE));
        let out = normalize(&source, 184, 184, encoding).unwrap();
        assert_eq!(image::guess_format(&out).unwrap(), expected);
    }

    #[test]
    fn wide_source_keeps_horizontally_centered_square() {
        let source = png_bytes(&banded_wide());
        let out = normalize(&source, 1024, 1024, OutputEncoding::Png).unwrap();
        let decoded = image::load_from_memory(&out).unwrap().to_rgba8();

        // The kept region is the center 1000×1000 (all green). Sample away
        // from the crop boundary to stay clear of resampling blend.
        for (x, y) in [(512, 512), (16, 16), (1007, 16), (16, 1007), (1007, 1007)] {
            let p = decoded.get_pixel(x, y);
            assert!(
                p[1] > 200 && p[0] < 60 && p[2] < 60,
                "expected green at ({x},{y}), got {p:?}"
            );
        }
    }

    #[test]
    fn tall_source_keeps_vertically_centered_band() {
        // Red top band, green center, blue bottom band.
        let img = RgbaImage::from_fn(1000, 2000, |_, y| {
            if y < 500 {
                RED
            } else if y < 1500 {
                GREEN
            } else {
                BLUE
            }
        });
        let source = png_bytes(&DynamicImage::ImageRgba8(img));
        let out = normalize(&source, 512, 512, OutputEncoding::Png).unwrap();
        let decoded = image::load_from_memory(&out).unwrap().to_rgba8();

        for (x, y) in [(256, 256), (8, 8), (503, 503)] {
            let p = decoded.get_pixel(x, y);
            assert!(
                p[1] > 200 && p[0] < 60 && p[2] < 60,
                "expected green at ({x},{y}), got {p:?}"
            );
        }
    }

    #[test]
    fn crops_never_letterboxes() {
        // An opaque source must produce a fully opaque output: letterboxing
        // would introduce padding pixels that came from nowhere.
        let source = png_bytes(&solid(100, 1000, GREEN));
        let out = normalize(&source, 100, 100, OutputEncoding::Png).unwrap();
        let decoded = image::load_from_memory(&out).unwrap().to_rgba8();
        assert!(decoded.pixels().all(|p| p[3] == 255));
    }

    #[rstest]
    #[case::empty(&[])]
    #[case::not_an_image(b"definitely not pixels")]
    #[case::truncated_png(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00])]
    fn undecodable_input_is_invalid_image(#[case] source: &[u8]) {
        let err = normalize(source, 64, 64, OutputEncoding::Png).unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidImage(_)), "{err:?}");
    }

    #[test]
    fn jpeg_roundtrip_preserves_dimensions() {
        let source = png_bytes(&solid(400, 400, RED));
        let out = normalize(&source, 184, 184, OutputEncoding::Jpeg).unwrap();
        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (184, 184));
    }
}
