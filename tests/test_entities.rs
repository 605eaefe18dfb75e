use approx::assert_relative_eq;
use crow_shooter::collision::{CollisionBuffer, IdColor};
use crow_shooter::entities::*;
use crow_shooter::raster::{Raster, Rgba};
use crow_shooter::scale::Viewport;
use crow_shooter::sprites::SpriteSheet;

fn bounds() -> Bounds {
    Bounds { height: 100.0, escape_threshold: -50.0 }
}

fn make_flyer() -> Flyer {
    Flyer {
        x: 50.0,
        y: 40.0,
        width: 20.0,
        height: 20.0,
        speed_x: 3.0,
        speed_y: 1.0,
        frame: 0,
        max_frame: 4,
        since_flap_ms: 0.0,
        flap_interval_ms: 100.0,
        color: IdColor([11, 22, 33]),
        removed: false,
        escaped: false,
    }
}

fn make_impact() -> Impact {
    Impact {
        x: 10.0,
        y: 10.0,
        size: 20.0,
        frame: 0,
        last_frame: 5,
        since_frame_ms: 0.0,
        frame_interval_ms: 80.0,
        removed: false,
    }
}

// ── Flyer motion ──────────────────────────────────────────────────────────────

#[test]
fn flyer_moves_left_and_up() {
    let mut f = make_flyer();
    f.update(16.0, &bounds());
    assert_relative_eq!(f.x, 47.0);
    assert_relative_eq!(f.y, 39.0);
    assert!(!f.removed);
}

#[test]
fn flyer_bounces_off_top_once() {
    let mut f = make_flyer();
    f.y = 0.5;
    f.update(0.0, &bounds());
    assert_relative_eq!(f.y, 0.0);
    assert_relative_eq!(f.speed_y, -1.0);

    // moving back inside: no second flip
    f.update(0.0, &bounds());
    assert_relative_eq!(f.y, 1.0);
    assert_relative_eq!(f.speed_y, -1.0);
}

#[test]
fn flyer_bounces_off_bottom_once() {
    let mut f = make_flyer();
    f.y = 79.5;
    f.speed_y = -1.0;
    f.update(0.0, &bounds());
    assert_relative_eq!(f.y, 80.0);
    assert_relative_eq!(f.speed_y, 1.0);

    f.update(0.0, &bounds());
    assert_relative_eq!(f.y, 79.0);
    assert_relative_eq!(f.speed_y, 1.0);
}

#[test]
fn flyer_stays_within_vertical_bounds() {
    let mut f = make_flyer();
    f.speed_y = 7.3;
    f.speed_x = 0.0;
    for _ in 0..1000 {
        f.update(16.0, &bounds());
        assert!(f.y >= 0.0);
        assert!(f.y <= 100.0 - f.height);
    }
}

#[test]
fn flyer_taller_than_field_is_pinned_to_top() {
    let mut f = make_flyer();
    f.height = 150.0;
    f.update(0.0, &bounds());
    assert_relative_eq!(f.y, 0.0);
}

// ── Flyer animation ───────────────────────────────────────────────────────────

#[test]
fn flap_advances_after_interval() {
    let mut f = make_flyer();
    f.update(60.0, &bounds());
    assert_eq!(f.frame, 0);
    f.update(60.0, &bounds());
    assert_eq!(f.frame, 1);
    assert_relative_eq!(f.since_flap_ms, 0.0);
}

#[test]
fn flap_wraps_after_last_frame() {
    let mut f = make_flyer();
    f.frame = 4;
    f.update(101.0, &bounds());
    assert_eq!(f.frame, 0);
}

// ── Escape ────────────────────────────────────────────────────────────────────

#[test]
fn flyer_past_threshold_escapes() {
    let mut f = make_flyer();
    f.width = 100.0;
    f.x = -160.0; // right edge -60
    f.speed_x = 1.0;
    f.update(16.0, &bounds());
    assert!(f.removed);
    assert!(f.escaped);
}

#[test]
fn flyer_inside_margin_does_not_escape() {
    let mut f = make_flyer();
    f.width = 50.0;
    f.x = -60.0; // right edge -10
    f.speed_x = 0.0;
    f.update(16.0, &bounds());
    assert!(!f.removed);
    assert!(!f.escaped);
}

#[test]
fn hit_flyer_never_counts_as_escaped() {
    let mut f = make_flyer();
    f.x = -200.0;
    f.removed = true;
    f.update(16.0, &bounds());
    assert!(!f.escaped);
}

// ── Impact ────────────────────────────────────────────────────────────────────

#[test]
fn impact_advances_one_frame_per_interval() {
    let mut e = make_impact();
    e.update(79.0, &bounds());
    assert_eq!(e.frame, 0);
    e.update(1.0, &bounds());
    assert_eq!(e.frame, 1);
}

#[test]
fn impact_removed_after_final_frame() {
    let mut e = make_impact();
    for _ in 0..5 {
        e.update(80.0, &bounds());
        assert!(!e.is_removable());
    }
    e.update(80.0, &bounds());
    assert!(e.is_removable());
}

// ── Drawing ───────────────────────────────────────────────────────────────────

struct Surfaces {
    visible: Raster,
    collision: CollisionBuffer,
}

fn surfaces() -> Surfaces {
    let viewport = Viewport::new(100.0, 100.0, 1.0);
    Surfaces {
        visible: Raster::new(100, 100, 1.0),
        collision: CollisionBuffer::new(&viewport),
    }
}

#[test]
fn flyer_falls_back_to_block_without_sprite() {
    let mut s = surfaces();
    let pending = SpriteSheet::pending(5);
    let f = make_flyer();
    let mut layers = Layers {
        visible: &mut s.visible,
        collision: &mut s.collision,
        flyer_sheet: &pending,
        impact_sheet: &pending,
    };
    f.draw(&mut layers);
    assert_eq!(s.visible.pixel(55, 45), Some(Rgba::opaque(0x44, 0x44, 0x44)));
    assert_eq!(s.collision.raster().pixel(55, 45), Some(Rgba::opaque(11, 22, 33)));
    assert_eq!(s.visible.pixel(5, 5), Some(Rgba::TRANSPARENT));
}

#[test]
fn flyer_draws_sprite_frame_when_ready() {
    let mut s = surfaces();
    // 5 frames of 2×2; frame 0 red, the rest blue
    let mut pixels = Vec::new();
    for _row in 0..2 {
        for x in 0..10 {
            if x < 2 {
                pixels.extend_from_slice(&[255, 0, 0, 255]);
            } else {
                pixels.extend_from_slice(&[0, 0, 255, 255]);
            }
        }
    }
    let sheet = SpriteSheet::from_rgba(5, 10, 2, pixels);
    assert!(sheet.is_ready());
    let pending = SpriteSheet::pending(6);
    let f = make_flyer();
    let mut layers = Layers {
        visible: &mut s.visible,
        collision: &mut s.collision,
        flyer_sheet: &sheet,
        impact_sheet: &pending,
    };
    f.draw(&mut layers);
    assert_eq!(s.visible.pixel(55, 45), Some(Rgba::opaque(255, 0, 0)));
    // collision layer still carries the identifying colour
    assert_eq!(s.collision.raster().pixel(55, 45), Some(Rgba::opaque(11, 22, 33)));
}

#[test]
fn impact_falls_back_to_circle_without_sprite() {
    let mut s = surfaces();
    let pending = SpriteSheet::pending(6);
    let e = make_impact();
    let mut layers = Layers {
        visible: &mut s.visible,
        collision: &mut s.collision,
        flyer_sheet: &pending,
        impact_sheet: &pending,
    };
    e.draw(&mut layers);
    assert_eq!(s.visible.pixel(20, 20), Some(Rgba::opaque(0xff, 0xa5, 0x00)));
    // bounding-square corner lies outside the circle
    assert_eq!(s.visible.pixel(10, 10), Some(Rgba::TRANSPARENT));
    // impacts never touch the collision layer
    assert_eq!(s.collision.raster().pixel(20, 20), Some(Rgba::TRANSPARENT));
}

#[test]
fn mismatched_sprite_data_is_not_ready() {
    let sheet = SpriteSheet::from_rgba(5, 10, 2, vec![0; 7]);
    assert!(!sheet.is_ready());
}
