use super::*;
use crate::assets::decode::{decode_raster, raster_from_rgba};

fn solid(width: u32, height: u32, px: [u8; 4]) -> Raster {
    raster_from_rgba(image::RgbaImage::from_pixel(width, height, image::Rgba(px))).unwrap()
}

#[test]
fn jpeg_output_decodes_with_same_dimensions() {
    let raster = solid(32, 20, [200, 30, 40, 255]);
    let bytes = encode_raster(&raster, OutputFormat::Jpeg { quality: 95 }).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Jpeg);

    let back = decode_raster(&bytes, "render").unwrap();
    assert_eq!((back.width(), back.height()), (32, 20));
    let px = &back.data()[..4];
    assert!((i16::from(px[0]) - 200).abs() <= 4, "{px:?}");
    assert_eq!(px[3], 255);
}

#[test]
fn png_output_is_lossless() {
    let raster = solid(5, 5, [10, 20, 30, 255]);
    let bytes = encode_raster(&raster, OutputFormat::Png).unwrap();
    let back = decode_raster(&bytes, "render").unwrap();
    assert_eq!(back.data(), raster.data());
}

#[test]
fn content_types_and_extensions() {
    let jpeg = OutputFormat::Jpeg { quality: 80 };
    assert_eq!(jpeg.content_type(), "image/jpeg");
    assert_eq!(jpeg.extension(), "jpg");
    assert_eq!(OutputFormat::Png.content_type(), "image/png");
    assert_eq!(OutputFormat::Png.extension(), "png");
}

#[test]
fn jpeg_quality_bounds() {
    assert!(OutputFormat::Jpeg { quality: 0 }.validate().is_err());
    assert!(OutputFormat::Jpeg { quality: 101 }.validate().is_err());
    OutputFormat::Jpeg { quality: 1 }.validate().unwrap();
    OutputFormat::Png.validate().unwrap();
}

#[test]
fn serde_shape_is_tagged() {
    let f: OutputFormat =
        serde_json::from_value(serde_json::json!({ "format": "jpeg", "quality": 90 })).unwrap();
    assert_eq!(f, OutputFormat::Jpeg { quality: 90 });
    let f: OutputFormat = serde_json::from_value(serde_json::json!({ "format": "png" })).unwrap();
    assert_eq!(f, OutputFormat::Png);
}
