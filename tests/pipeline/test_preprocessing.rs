// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Decode-then-preprocess tests using in-memory encoded images

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

use fabstir_age_node::vision::preprocessing::BGR_MEAN;
use fabstir_age_node::vision::{decode_image_bytes, preprocess_for_extractor};

/// Encode an image to bytes in the given format
fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, format).expect("encode failed");
    bytes.into_inner()
}

#[test]
fn test_png_decode_and_preprocess() {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(640, 480, Rgb([200, 100, 50])));
    let bytes = encode(&img, ImageFormat::Png);

    let (decoded, info) = decode_image_bytes(&bytes).unwrap();
    assert_eq!(info.format, ImageFormat::Png);
    assert_eq!((info.width, info.height), (640, 480));

    let tensor = preprocess_for_extractor(&decoded);
    assert_eq!(tensor.shape(), &[1, 3, 224, 224]);
}

#[test]
fn test_jpeg_decode_and_preprocess() {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(300, 300, Rgb([128, 128, 128])));
    let bytes = encode(&img, ImageFormat::Jpeg);

    let (decoded, info) = decode_image_bytes(&bytes).unwrap();
    assert_eq!(info.format, ImageFormat::Jpeg);

    let tensor = preprocess_for_extractor(&decoded);
    assert_eq!(tensor.shape(), &[1, 3, 224, 224]);
}

#[test]
fn test_tiff_decode_and_preprocess() {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 64, Rgb([10, 20, 30])));
    let bytes = encode(&img, ImageFormat::Tiff);

    let (decoded, info) = decode_image_bytes(&bytes).unwrap();
    assert_eq!(info.format, ImageFormat::Tiff);

    let tensor = preprocess_for_extractor(&decoded);
    assert_eq!(tensor.shape(), &[1, 3, 224, 224]);
}

#[test]
fn test_letterbox_padding_rows_are_mean_subtracted_black() {
    // 640x480 scales to 224x168: 28 rows of padding above and below
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(640, 480, Rgb([255, 255, 255])));
    let tensor = preprocess_for_extractor(&img);

    // Top-left corner is padding: black pixel minus channel mean
    for c in 0..3 {
        assert!((tensor[[0, c, 0, 0]] + BGR_MEAN[c]).abs() < 1e-4);
    }

    // Center is image content: white pixel minus channel mean
    for c in 0..3 {
        assert!((tensor[[0, c, 112, 112]] - (255.0 - BGR_MEAN[c])).abs() < 1e-4);
    }
}

#[test]
fn test_grayscale_image_converts_to_rgb() {
    let gray = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(100, 100, image::Luma([77])));
    let bytes = encode(&gray, ImageFormat::Png);

    let (decoded, _info) = decode_image_bytes(&bytes).unwrap();
    let tensor = preprocess_for_extractor(&decoded);
    assert_eq!(tensor.shape(), &[1, 3, 224, 224]);

    // All three channels carry the gray value minus their mean
    for c in 0..3 {
        assert!((tensor[[0, c, 112, 112]] - (77.0 - BGR_MEAN[c])).abs() < 1e-4);
    }
}
