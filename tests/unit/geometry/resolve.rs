use super::*;
use crate::model::customizations::Position;

fn canvas(width: u32, height: u32) -> Canvas {
    Canvas { width, height }
}

fn with(scale: f64, position: Option<(f64, f64)>) -> Customizations {
    Customizations {
        scale: Some(scale),
        position: position.map(|(x, y)| Position { x, y }),
        ..Customizations::default()
    }
}

#[test]
fn square_logo_on_square_template() {
    let r = resolve_layer(
        canvas(1000, 1000),
        64,
        64,
        &with(0.3, Some((500.0, 500.0))),
    );
    assert_eq!((r.pixel_width, r.pixel_height), (300, 300));
    assert_eq!((r.left, r.top), (350, 350));
    assert_eq!(r.rotation_deg, 0.0);
}

#[test]
fn wide_logo_takes_full_width_budget() {
    let s = fit_logo_size(canvas(800, 600), 2.0, 0.5);
    assert_eq!(s, Size::new(300.0, 150.0));
}

#[test]
fn tall_logo_takes_full_height_budget() {
    let s = fit_logo_size(canvas(800, 600), 0.5, 0.5);
    assert_eq!(s, Size::new(150.0, 300.0));
}

#[test]
fn default_position_is_template_centre() {
    let r = resolve_layer(canvas(400, 200), 10, 10, &Customizations::default());
    // 200 * 0.3 = 60
    assert_eq!((r.pixel_width, r.pixel_height), (60, 60));
    assert_eq!(r.center, Point::new(200.0, 100.0));
    assert_eq!((r.left, r.top), (170, 70));
}

#[test]
fn aspect_ratio_is_preserved_across_scales_and_templates() {
    let logos = [(1u32, 1u32), (640, 480), (300, 1200), (1920, 7), (3, 2000)];
    let templates = [(1u32, 1u32), (17, 4000), (1000, 1000), (4096, 2160)];
    let scales = [0.01, 0.1, 0.3, 1.0, 2.25, 3.0];

    for (lw, lh) in logos {
        let aspect = f64::from(lw) / f64::from(lh);
        for (tw, th) in templates {
            for scale in scales {
                let r = resolve_layer(canvas(tw, th), lw, lh, &with(scale, None));
                let got = r.size.width / r.size.height;
                assert!(
                    (got - aspect).abs() <= aspect * 1e-12,
                    "logo {lw}x{lh} template {tw}x{th} scale {scale}: {got} vs {aspect}"
                );
                let longer = r.size.width.max(r.size.height);
                let budget = f64::from(tw.min(th)) * scale;
                assert!((longer - budget).abs() < 1e-9);
            }
        }
    }
}

#[test]
fn top_left_clamps_only_the_lower_bound() {
    assert_eq!(
        top_left(Point::new(10.0, 5.0), Size::new(100.0, 100.0)),
        (0, 0)
    );
    assert_eq!(
        top_left(Point::new(5000.0, 4000.0), Size::new(100.0, 50.0)),
        (4950, 3975)
    );
}

#[test]
fn tiny_layers_never_collapse_to_zero_pixels() {
    let r = resolve_layer(canvas(2, 2), 1000, 1, &with(0.1, None));
    assert_eq!(r.pixel_width, 1);
    assert_eq!(r.pixel_height, 1);
}

#[test]
fn placement_recentres_rotated_bounding_box() {
    let r = resolve_layer(
        canvas(1000, 1000),
        100,
        100,
        &with(0.3, Some((500.0, 500.0))),
    );
    assert_eq!(r.placement_for(300, 300), (r.left, r.top));
    assert_eq!(r.placement_for(424, 424), (288, 288));
}

#[test]
fn placement_offsets_from_rounded_top_left() {
    let r = resolve_layer(
        canvas(100, 100),
        10,
        10,
        &with(0.334, Some((50.0, 50.0))),
    );
    assert_eq!((r.pixel_width, r.left), (33, 33));
    assert_eq!(r.placement_for(33, 33), (33, 33));
    assert_eq!(r.placement_for(47, 46), (26, 27));
}

#[test]
fn rotated_placement_is_clamped_at_the_origin() {
    let r = resolve_layer(canvas(100, 100), 10, 10, &with(0.3, Some((0.0, 0.0))));
    assert_eq!((r.left, r.top), (0, 0));
    assert_eq!(r.placement_for(42, 42), (0, 0));
}
