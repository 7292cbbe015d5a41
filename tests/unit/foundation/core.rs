use super::*;
use serde_json::json;

#[test]
fn parses_hex_case_insensitively() {
    assert_eq!(Rgb8::parse_hex("#FF0000").unwrap(), Rgb8::new(255, 0, 0));
    assert_eq!(Rgb8::parse_hex("#00ff7f").unwrap(), Rgb8::new(0, 255, 127));
}

#[test]
fn rejects_malformed_hex() {
    for bad in ["ff0000", "#ff000", "#ff00000", "#gg0000", "", "#"] {
        let err = Rgb8::parse_hex(bad).unwrap_err();
        assert!(matches!(err, MockupError::Validation(_)), "{bad}");
    }
}

#[test]
fn serde_uses_hex_strings() {
    let c: Rgb8 = serde_json::from_value(json!("#1A2b3C")).unwrap();
    assert_eq!(c, Rgb8::new(0x1a, 0x2b, 0x3c));
    assert_eq!(serde_json::to_value(c).unwrap(), json!("#1a2b3c"));

    assert!(serde_json::from_value::<Rgb8>(json!("red")).is_err());
}

#[test]
fn canvas_center_and_min_side() {
    let c = Canvas {
        width: 800,
        height: 600,
    };
    assert_eq!(c.center(), Point::new(400.0, 300.0));
    assert_eq!(c.min_side(), 600);
}
