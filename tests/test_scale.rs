use approx::assert_relative_eq;
use crow_shooter::scale::*;

fn bbox(left: f64, top: f64) -> BoundingBox {
    BoundingBox { left, top, width: 1200.0, height: 800.0 }
}

// ── compute_global_scale ──────────────────────────────────────────────────────

#[test]
fn scale_is_one_at_reference_size() {
    assert_relative_eq!(compute_global_scale(1200.0, 800.0, 1200.0, 800.0, 0.48), 1.0);
}

#[test]
fn scale_never_exceeds_one() {
    assert_relative_eq!(compute_global_scale(2400.0, 1600.0, 1200.0, 800.0, 0.48), 1.0);
}

#[test]
fn scale_uses_the_tighter_axis() {
    // width ratio 0.5, height ratio 1.0
    assert_relative_eq!(compute_global_scale(600.0, 800.0, 1200.0, 800.0, 0.48), 0.5);
    // width ratio 1.0, height ratio 0.75
    assert_relative_eq!(compute_global_scale(1200.0, 600.0, 1200.0, 800.0, 0.48), 0.75);
}

#[test]
fn scale_clamps_at_lower_bound() {
    assert_relative_eq!(compute_global_scale(300.0, 200.0, 1200.0, 800.0, 0.48), 0.48);
    assert_relative_eq!(compute_global_scale(0.0, 0.0, 1200.0, 800.0, 0.48), 0.48);
}

// ── to_surface_coordinates ────────────────────────────────────────────────────

#[test]
fn pointer_maps_through_offset_and_density() {
    let (px, py) = to_surface_coordinates(105.5, 60.2, &bbox(5.0, 10.0), 2.0);
    assert_eq!(px, 201);
    assert_eq!(py, 100);
}

#[test]
fn pointer_at_origin_maps_to_zero() {
    assert_eq!(to_surface_coordinates(5.0, 10.0, &bbox(5.0, 10.0), 3.0), (0, 0));
}

#[test]
fn pointer_left_of_surface_is_negative() {
    let (px, py) = to_surface_coordinates(2.0, 5.0, &bbox(5.0, 10.0), 1.0);
    assert!(px < 0);
    assert!(py < 0);
}

// ── Viewport ──────────────────────────────────────────────────────────────────

#[test]
fn buffer_size_floors_scaled_dimensions() {
    let v = Viewport::new(1200.7, 800.0, 1.5);
    assert_eq!(v.buffer_size(), (1801, 1200));
    assert_relative_eq!(v.surface_height(), 800.0);
}

#[test]
fn invalid_density_falls_back_to_one() {
    assert_relative_eq!(Viewport::new(100.0, 100.0, 0.0).pixel_density, 1.0);
    assert_relative_eq!(Viewport::new(100.0, 100.0, f64::NAN).pixel_density, 1.0);
    assert_eq!(Viewport::new(100.0, 50.0, -2.0).buffer_size(), (100, 50));
}
