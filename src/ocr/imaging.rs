//! Decoding uploads and preparing images for the model endpoint.

use std::io::Cursor;

use base64::Engine;
use image::{ImageFormat, RgbImage};

use super::backend::OcrError;

/// Decode uploaded bytes (PNG or JPEG) into an RGB pixel buffer.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage, OcrError> {
    if bytes.is_empty() {
        return Err(OcrError::ImageError("empty upload".to_string()));
    }
    let decoded = image::load_from_memory(bytes)?;
    Ok(decoded.to_rgb8())
}

/// Encode an image as base64 PNG, the form the chat endpoint accepts.
pub fn encode_png_base64(image: &RgbImage) -> Result<String, OcrError> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(buf.into_inner()))
}

/// Content type for uploaded bytes, sniffed from content first.
pub fn sniff_mime(bytes: &[u8], file_name: &str) -> String {
    infer::get(bytes)
        .map(|kind| kind.mime_type().to_string())
        .unwrap_or_else(|| {
            mime_guess::from_path(file_name)
                .first_or_octet_stream()
                .to_string()
        })
}

#[cfg(test)]
pub(crate) fn sample_png() -> Vec<u8> {
    let image = RgbImage::from_pixel(4, 3, image::Rgb([255, 255, 255]));
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_png() {
        let image = decode_image(&sample_png()).unwrap();
        assert_eq!(image.dimensions(), (4, 3));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_image(b"definitely not an image"),
            Err(OcrError::ImageError(_))
        ));
        assert!(decode_image(&[]).is_err());
    }

    #[test]
    fn test_png_base64_decodes_back() {
        let image = decode_image(&sample_png()).unwrap();
        let encoded = encode_png_base64(&image).unwrap();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .unwrap();
        assert_eq!(decode_image(&bytes).unwrap().dimensions(), (4, 3));
    }

    #[test]
    fn test_sniff_mime() {
        assert_eq!(sniff_mime(&sample_png(), "diagram.jpg"), "image/png");
        assert_eq!(sniff_mime(b"????", "diagram.jpg"), "image/jpeg");
        assert_eq!(sniff_mime(b"????", "noext"), "application/octet-stream");
    }
}
