use super::*;
use crate::foundation::core::{LogicalSize, PixelRatio};
use crate::render::surface::{Surface, SurfaceGeometry};

#[test]
fn origin_sample_at_time_zero() {
    // sin(0) = 0 maps to the channel midpoint.
    assert_eq!(sample(0.0, 0.0, 0.0), Rgba8::opaque(127, 127, 127));
}

#[test]
fn channels_follow_their_own_axes() {
    let base = sample(0.0, 0.0, 0.0);
    let moved_x = sample(50.0, 0.0, 0.0);
    assert_ne!(moved_x.r, base.r);
    assert_eq!(moved_x.g, base.g);

    let moved_y = sample(0.0, 50.0, 0.0);
    assert_eq!(moved_y.r, base.r);
    assert_ne!(moved_y.g, base.g);
}

#[test]
fn blocks_repeat_the_sampled_value() {
    let buf = rasterize(0.7, 9, 5);
    for (x, y) in [(0, 0), (4, 2), (8, 4)] {
        let s = sample(f64::from(x), f64::from(y), 0.7);
        let want = Some([s.r, s.g, s.b, 255]);
        assert_eq!(buf.get(x, y), want);
        assert_eq!(buf.get((x + 1).min(8), (y + 1).min(4)), want);
    }
}

#[test]
fn every_pixel_is_written() {
    let buf = rasterize(2.0, 7, 3);
    assert!(buf.data.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn rasterize_is_pure_in_time() {
    assert_eq!(rasterize(1.25, 20, 10), rasterize(1.25, 20, 10));
}

#[test]
fn fractional_size_covers_last_backing_column_and_row() {
    let mut surface = Surface::new(SurfaceGeometry::new(
        LogicalSize::new(9.5, 5.5),
        PixelRatio::new(2.0).unwrap(),
    ));
    assert!(surface.render_frame(|p| draw(0.0, p)).unwrap());
    let frame = surface.front_frame().unwrap();
    assert_eq!((frame.width, frame.height), (19, 11));

    // Every channel sits near 127 at t = 0 in this corner, far from the black clear color.
    let lit = |px: Option<[u8; 4]>| px.unwrap()[..3].iter().all(|c| *c > 60);
    for y in 0..frame.height {
        assert!(lit(frame.pixel(18, y)), "column 18, row {y}");
    }
    for x in 0..frame.width {
        assert!(lit(frame.pixel(x, 10)), "row 10, column {x}");
    }
}
