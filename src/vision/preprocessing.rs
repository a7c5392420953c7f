// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the face feature extractor

use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use ndarray::Array4;

/// Input size expected by the ResNet50-style feature extractor
pub const EXTRACTOR_INPUT_SIZE: u32 = 224;

/// ImageNet per-channel means in BGR order (caffe-style preprocessing).
/// The extractor was trained on mean-subtracted BGR input without std scaling.
pub const BGR_MEAN: [f32; 3] = [103.939, 116.779, 123.68];

/// Preprocess a face image for the feature extractor
///
/// Steps:
/// 1. Scale down (never up) preserving aspect ratio so the image fits
///    inside 224x224
/// 2. Center on a black 224x224 canvas
/// 3. Reorder channels RGB -> BGR and subtract the ImageNet channel means
/// 4. Emit an NCHW tensor [1, 3, 224, 224]
pub fn preprocess_for_extractor(image: &DynamicImage) -> Array4<f32> {
    let padded = fit_and_pad(image, EXTRACTOR_INPUT_SIZE);

    let size = EXTRACTOR_INPUT_SIZE as usize;
    let mut tensor = Array4::zeros((1, 3, size, size));

    for y in 0..size {
        for x in 0..size {
            let pixel = padded.get_pixel(x as u32, y as u32);
            // BGR channel order: pixel[2 - c] maps R<->B and keeps G
            for c in 0..3 {
                tensor[[0, c, y, x]] = pixel[2 - c] as f32 - BGR_MEAN[c];
            }
        }
    }

    tensor
}

/// Fit an image inside a square canvas with black padding
///
/// Images already smaller than the target in both dimensions are pasted
/// unscaled; larger images are downscaled with Lanczos3.
pub fn fit_and_pad(image: &DynamicImage, target_size: u32) -> RgbImage {
    let (orig_w, orig_h) = image.dimensions();

    let mut canvas = RgbImage::from_pixel(target_size, target_size, Rgb([0, 0, 0]));

    if orig_w == 0 || orig_h == 0 {
        return canvas;
    }

    let scale_w = target_size as f32 / orig_w as f32;
    let scale_h = target_size as f32 / orig_h as f32;
    let scale = scale_w.min(scale_h).min(1.0);

    let new_w = ((orig_w as f32 * scale).round() as u32).clamp(1, target_size);
    let new_h = ((orig_h as f32 * scale).round() as u32).clamp(1, target_size);

    let rgb = if scale < 1.0 {
        image
            .resize_exact(new_w, new_h, image::imageops::FilterType::Lanczos3)
            .to_rgb8()
    } else {
        image.to_rgb8()
    };

    let offset_x = (target_size - rgb.width()) / 2;
    let offset_y = (target_size - rgb.height()) / 2;

    for y in 0..rgb.height() {
        for x in 0..rgb.width() {
            canvas.put_pixel(x + offset_x, y + offset_y, *rgb.get_pixel(x, y));
        }
    }

    canvas
}
