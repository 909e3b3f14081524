// SPDX-License-Identifier: GPL-3.0-only

//! Pixel format conversion for preview frames
//!
//! The capture stream delivers YUYV or MJPG buffers; the renderer wants RGBA.

use crate::errors::CameraError;

/// Convert YUYV (YUV 4:2:2) to RGBA
///
/// YUYV format: Y0 U0 Y1 V0 - each 4-byte group encodes 2 pixels.
/// Uses BT.601 coefficients for YUV to RGB conversion.
pub fn yuyv_to_rgba(data: &[u8], width: u32, height: u32) -> Vec<u8> {
    let pixel_count = (width * height) as usize;
    let mut rgba = Vec::with_capacity(pixel_count * 4);

    // YUYV: Y0 U0 Y1 V0 - processes 2 pixels at a time
    for chunk in data.chunks_exact(4) {
        let y0 = chunk[0] as f32;
        let u = chunk[1] as f32 - 128.0;
        let y1 = chunk[2] as f32;
        let v = chunk[3] as f32 - 128.0;

        // Convert YUV to RGB (BT.601)
        for y in [y0, y1] {
            let r = (y + 1.402 * v).clamp(0.0, 255.0) as u8;
            let g = (y - 0.344 * u - 0.714 * v).clamp(0.0, 255.0) as u8;
            let b = (y + 1.772 * u).clamp(0.0, 255.0) as u8;

            rgba.push(r);
            rgba.push(g);
            rgba.push(b);
            rgba.push(255);

            if rgba.len() >= pixel_count * 4 {
                break;
            }
        }

        if rgba.len() >= pixel_count * 4 {
            break;
        }
    }

    rgba
}

/// Decode an MJPG buffer to RGBA
pub fn mjpg_to_rgba(data: &[u8]) -> Result<(Vec<u8>, u32, u32), CameraError> {
    let image = image::load_from_memory_with_format(data, image::ImageFormat::Jpeg)
        .map_err(|e| CameraError::InvalidFormat(format!("MJPG decode failed: {}", e)))?;
    let rgba = image.to_rgba8();
    let (width, height) = (rgba.width(), rgba.height());
    Ok((rgba.into_raw(), width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yuyv_black_and_white_pixels() {
        // Two pixels: Y=0 (black) then Y=255 (white), neutral chroma
        let yuyv = [0u8, 128, 255, 128];
        let rgba = yuyv_to_rgba(&yuyv, 2, 1);
        assert_eq!(rgba.len(), 8);
        assert_eq!(&rgba[0..4], &[0, 0, 0, 255]);
        assert_eq!(&rgba[4..8], &[255, 255, 255, 255]);
    }

    #[test]
    fn test_yuyv_output_length_matches_resolution() {
        let yuyv = vec![128u8; 4 * 4 * 2]; // 4x4 frame, 2 bytes per pixel
        let rgba = yuyv_to_rgba(&yuyv, 4, 4);
        assert_eq!(rgba.len(), 4 * 4 * 4);
    }

    #[test]
    fn test_mjpg_rejects_garbage() {
        assert!(mjpg_to_rgba(&[0x00, 0x01, 0x02]).is_err());
    }

    #[test]
    fn test_mjpg_roundtrip_dimensions() {
        // Encode a small known image with the image crate, then decode it back
        let mut jpeg = Vec::new();
        let img = image::RgbImage::from_pixel(8, 6, image::Rgb([200, 40, 40]));
        image::DynamicImage::ImageRgb8(img)
            .write_to(
                &mut std::io::Cursor::new(&mut jpeg),
                image::ImageFormat::Jpeg,
            )
            .unwrap();

        let (rgba, width, height) = mjpg_to_rgba(&jpeg).unwrap();
        assert_eq!((width, height), (8, 6));
        assert_eq!(rgba.len(), 8 * 6 * 4);
    }
}
