use super::*;

#[test]
fn mul_div255_rounds_to_nearest() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(128, 255), 128);
    assert_eq!(mul_div255_u8(255, 0), 0);
}

#[test]
fn premultiply_clears_fully_transparent_pixels() {
    let mut px = vec![200u8, 100, 50, 0, 200, 100, 50, 255];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[..4], &[0, 0, 0, 0]);
    assert_eq!(&px[4..], &[200, 100, 50, 255]);
}

#[test]
fn lerp_u8_hits_endpoints() {
    assert_eq!(lerp_u8(10, 250, 0.0), 10);
    assert_eq!(lerp_u8(10, 250, 1.0), 250);
    assert_eq!(lerp_u8(0, 255, 0.5), 128);
}
