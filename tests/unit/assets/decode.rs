use std::io::Cursor;

use super::*;

fn png_bytes(img: image::RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_dimensions_and_premul() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100u8, 50u8, 200u8, 128u8]).unwrap();

    let raster = decode_raster(&png_bytes(img), "logo").unwrap();
    assert_eq!(raster.width(), 1);
    assert_eq!(raster.height(), 1);
    assert_eq!(
        raster.data(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn garbage_bytes_are_image_decode_errors() {
    let err = decode_raster(b"definitely not a png", "template").unwrap_err();
    match err {
        MockupError::ImageDecode(msg) => assert!(msg.starts_with("template:")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn opaque_pixels_survive_to_rgba_round_trip() {
    let img = image::RgbaImage::from_fn(3, 2, |x, y| image::Rgba([x as u8 * 40, y as u8 * 90, 7, 255]));
    let raster = raster_from_rgba(img.clone()).unwrap();
    assert_eq!(raster_to_rgba(&raster).unwrap(), img);
}

#[test]
fn new_raster_is_transparent() {
    let r = new_raster(4, 3).unwrap();
    assert!(r.data().iter().all(|&b| b == 0));
    assert!(new_raster(0, 3).is_err());
}
