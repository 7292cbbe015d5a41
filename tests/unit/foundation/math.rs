use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn premultiply_then_demultiply_keeps_opaque_and_zeroes_transparent() {
    let mut px = vec![10u8, 20, 30, 255, 200, 100, 50, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[..4], &[10, 20, 30, 255]);
    assert_eq!(&px[4..], &[0, 0, 0, 0]);

    demultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[..4], &[10, 20, 30, 255]);
}

#[test]
fn demultiply_half_alpha_restores_straight_colour() {
    let mut px = vec![255u8, 0, 0, 128];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![128, 0, 0, 128]);
    demultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![255, 0, 0, 128]);
}

#[test]
fn luma_of_grey_is_identity_and_white_is_full() {
    assert_eq!(luma_u8(0, 0, 0), 0);
    assert_eq!(luma_u8(77, 77, 77), 77);
    assert_eq!(luma_u8(255, 255, 255), 255);
}

#[test]
fn clamp_premultiplied_caps_channels_at_alpha() {
    let mut px = vec![200u8, 50, 120, 100];
    clamp_premultiplied_in_place(&mut px);
    assert_eq!(px, vec![100, 50, 100, 100]);
}

#[test]
fn unit_to_u8_clamps() {
    assert_eq!(unit_to_u8(-1.0), 0);
    assert_eq!(unit_to_u8(0.5), 128);
    assert_eq!(unit_to_u8(2.0), 255);
}
