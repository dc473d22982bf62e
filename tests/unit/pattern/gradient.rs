use super::*;
use crate::foundation::core::{LogicalSize, PixelRatio};
use crate::render::surface::{FrameRGBA, Surface, SurfaceGeometry};

fn render(t: f64, w: f64, h: f64, dpr: f64) -> FrameRGBA {
    let mut surface = Surface::new(SurfaceGeometry::new(
        LogicalSize::new(w, h),
        PixelRatio::new(dpr).unwrap(),
    ));
    assert!(surface.render_frame(|p| draw(t, p)).unwrap());
    surface.front_frame().unwrap()
}

fn near(got: Option<[u8; 4]>, want: Rgba8, tol: i16) -> bool {
    let got = got.unwrap();
    [want.r, want.g, want.b, 255]
        .iter()
        .zip(got.iter())
        .all(|(a, b)| (i16::from(*a) - i16::from(*b)).abs() <= tol)
}

#[test]
fn stop_hues_cycle_and_oppose() {
    assert_eq!(stop_hues(0.0), [0.0, 90.0, 180.0]);
    let [h0, h1, h2] = stop_hues(2.0);
    assert!((h0 - 60.0).abs() < 1e-9);
    assert!((h2 - 240.0).abs() < 1e-9);
    assert!((h1 - 150.0).abs() < 1e-9);

    // 13s -> 390deg wraps to 30deg.
    let [h0, _, h2] = stop_hues(13.0);
    assert!((h0 - 30.0).abs() < 1e-9);
    assert!((h2 - 210.0).abs() < 1e-9);
}

#[test]
fn stop_lightness_decreases_along_axis() {
    let stops = stop_colors(0.0);
    let lightness = |c: Rgba8| {
        let max = c.r.max(c.g).max(c.b);
        let min = c.r.min(c.g).min(c.b);
        u16::from(max) + u16::from(min)
    };
    assert!(lightness(stops[0]) > lightness(stops[1]));
    assert!(lightness(stops[1]) > lightness(stops[2]));
}

#[test]
fn corners_take_end_stop_colors() {
    let stops = stop_colors(1.0);
    let frame = render(1.0, 64.0, 32.0, 1.0);
    assert!(near(frame.pixel(0, 0), stops[0], 8));
    assert!(near(frame.pixel(63, 31), stops[2], 8));
}

#[test]
fn center_takes_middle_stop_at_any_ratio() {
    let stops = stop_colors(2.5);
    let frame = render(2.5, 40.0, 20.0, 2.0);
    assert_eq!((frame.width, frame.height), (80, 40));
    assert!(near(frame.pixel(40, 20), stops[1], 8));
}

#[test]
fn rendering_is_pure_in_time() {
    let a = render(3.25, 40.0, 20.0, 2.0);
    let b = render(3.25, 40.0, 20.0, 2.0);
    assert_eq!(a.data, b.data);
    assert_ne!(a.data, render(4.25, 40.0, 20.0, 2.0).data);
}
