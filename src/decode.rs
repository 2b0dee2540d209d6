//! # Image Decoding
//!
//! Turns an uploaded file into an RGBA pixel buffer for the rasterizer.
//! Formats are sniffed from content, not from the file name, so uploads can
//! be stored under any name. HEIC/HEIF support is behind the `heif` feature.

use image::RgbaImage;
use std::path::Path;

use crate::error::BrailleError;

/// Read and decode the image stored at `path`.
pub fn load(path: &Path) -> Result<RgbaImage, BrailleError> {
    let bytes = std::fs::read(path)?;
    decode_bytes(&bytes)
}

/// Decode an in-memory image.
pub fn decode_bytes(bytes: &[u8]) -> Result<RgbaImage, BrailleError> {
    if is_heic(bytes) {
        return decode_heic(bytes);
    }
    let img = image::load_from_memory(bytes)?;
    Ok(img.to_rgba8())
}

/// Check if the data looks like a HEIC/HEIF file by examining magic bytes.
/// HEIC files have an "ftyp" box near the start with HEIC-related brand codes.
pub fn is_heic(data: &[u8]) -> bool {
    if data.len() < 12 || &data[4..8] != b"ftyp" {
        return false;
    }
    matches!(
        &data[8..12],
        b"heic" | b"heix" | b"hevc" | b"hevx" | b"heim" | b"heis" | b"hevm" | b"hevs" | b"mif1" | b"msf1"
    )
}

#[cfg(feature = "heif")]
fn decode_heic(data: &[u8]) -> Result<RgbaImage, BrailleError> {
    use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

    let lib_heif = LibHeif::new();
    let ctx = HeifContext::read_from_bytes(data)
        .map_err(|e| BrailleError::Decode(format!("HEIC container: {}", e)))?;
    let handle = ctx
        .primary_image_handle()
        .map_err(|e| BrailleError::Decode(format!("HEIC primary image: {}", e)))?;
    let image = lib_heif
        .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgba), None)
        .map_err(|e| BrailleError::Decode(format!("HEIC pixels: {}", e)))?;

    let width = image.width();
    let height = image.height();
    let planes = image.planes();
    let plane = planes
        .interleaved
        .ok_or_else(|| BrailleError::Decode("HEIC has no interleaved plane".to_string()))?;

    // Rows may be padded past width * 4; copy them out tightly packed.
    let row_len = width as usize * 4;
    let mut buf = Vec::with_capacity(row_len * height as usize);
    for row in plane.data.chunks(plane.stride).take(height as usize) {
        let row = row
            .get(..row_len)
            .ok_or_else(|| BrailleError::Decode("HEIC row shorter than width".to_string()))?;
        buf.extend_from_slice(row);
    }

    RgbaImage::from_raw(width, height, buf)
        .ok_or_else(|| BrailleError::Decode("HEIC buffer size mismatch".to_string()))
}

#[cfg(not(feature = "heif"))]
fn decode_heic(_data: &[u8]) -> Result<RgbaImage, BrailleError> {
    Err(BrailleError::Decode(
        "HEIC/HEIF support not compiled in (enable the `heif` feature)".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_bytes(img: &RgbaImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let mut img = RgbaImage::from_pixel(3, 2, Rgba([255, 255, 255, 255]));
        img.put_pixel(2, 1, Rgba([0, 0, 0, 255]));

        let decoded = decode_bytes(&png_bytes(&img)).unwrap();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(2, 1).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = decode_bytes(b"definitely not an image").unwrap_err();
        assert!(matches!(err, BrailleError::Decode(_)));
    }

    #[test]
    fn test_truncated_png_fails() {
        let img = RgbaImage::from_pixel(16, 16, Rgba([10, 10, 10, 255]));
        let bytes = png_bytes(&img);
        assert!(decode_bytes(&bytes[..bytes.len() / 2]).is_err());
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload.bin");
        let img = RgbaImage::from_pixel(1, 1, Rgba([1, 2, 3, 255]));
        std::fs::write(&path, png_bytes(&img)).unwrap();

        let decoded = load(&path).unwrap();
        assert_eq!(decoded.get_pixel(0, 0).0, [1, 2, 3, 255]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(Path::new("/nonexistent/brailleart/upload")).unwrap_err();
        assert!(matches!(err, BrailleError::Io(_)));
    }

    #[test]
    fn test_heic_magic() {
        let mut data = vec![0u8; 16];
        data[4..8].copy_from_slice(b"ftyp");
        data[8..12].copy_from_slice(b"heic");
        assert!(is_heic(&data));

        data[8..12].copy_from_slice(b"isom");
        assert!(!is_heic(&data));
        assert!(!is_heic(b"short"));
    }

    #[cfg(not(feature = "heif"))]
    #[test]
    fn test_heic_without_feature_is_decode_error() {
        let mut data = vec![0u8; 16];
        data[4..8].copy_from_slice(b"ftyp");
        data[8..12].copy_from_slice(b"mif1");
        assert!(matches!(decode_bytes(&data), Err(BrailleError::Decode(_))));
    }
}
