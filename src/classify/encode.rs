use std::io::Cursor;

use image::{DynamicImage, ImageFormat, ImageOutputFormat};

use crate::error::AppError;

const JPEG_QUALITY: u8 = 90;

/// Decodes an uploaded JPEG or PNG file.
pub fn decode_upload(bytes: &[u8]) -> Result<DynamicImage, AppError> {
    let format = image::guess_format(bytes)
        .map_err(|_| AppError::InvalidImage("unrecognised image format".into()))?;
    if !matches!(format, ImageFormat::Jpeg | ImageFormat::Png) {
        return Err(AppError::InvalidImage(format!(
            "{:?} uploads are not supported, use JPG or PNG",
            format
        )));
    }
    image::load_from_memory_with_format(bytes, format)
        .map_err(|e| AppError::InvalidImage(e.to_string()))
}

/// Re-encodes any image as an RGB JPEG, dropping alpha.
pub fn encode_jpeg(image: &DynamicImage) -> Result<Vec<u8>, AppError> {
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let mut buf = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Jpeg(JPEG_QUALITY))
        .map_err(|e| AppError::InvalidImage(e.to_string()))?;
    Ok(buf)
}

#[cfg(test)]
pub(crate) fn sample_png() -> Vec<u8> {
    let img = DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
        8,
        8,
        image::Rgba([200, 120, 40, 128]),
    ));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
        .unwrap();
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_with_alpha_becomes_jpeg() {
        let img = decode_upload(&sample_png()).unwrap();
        let jpeg = encode_jpeg(&img).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
        assert_eq!(image::guess_format(&jpeg).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn non_images_are_rejected() {
        assert!(matches!(
            decode_upload(b"definitely not an image"),
            Err(AppError::InvalidImage(_))
        ));
    }

    #[test]
    fn truncated_png_is_rejected() {
        let png = sample_png();
        assert!(matches!(
            decode_upload(&png[..png.len() / 2]),
            Err(AppError::InvalidImage(_))
        ));
    }
}
