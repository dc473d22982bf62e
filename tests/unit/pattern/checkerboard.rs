use super::*;

#[test]
fn parity_alternates_across_tiles() {
    assert!(tile_painted(0, 0, 0.0));
    assert!(!tile_painted(1, 0, 0.0));
    assert!(!tile_painted(0, 1, 0.0));
    assert!(tile_painted(1, 1, 0.0));
}

#[test]
fn parity_shifts_four_times_per_second() {
    assert!(tile_painted(0, 0, 0.24));
    assert!(!tile_painted(0, 0, 0.25));
    assert!(tile_painted(0, 0, 0.5));
    assert!(tile_painted(3, 0, 0.75));
}

#[test]
fn tile_hue_depends_on_time_and_position() {
    assert_eq!(tile_color(0.0, 0.0, 0.0), hsl_to_rgba8(0.0, 0.7, 0.5));
    assert_eq!(tile_color(40.0, 80.0, 1.0), hsl_to_rgba8(180.0, 0.7, 0.5));
    assert_eq!(tile_color(300.0, 60.0, 0.0), hsl_to_rgba8(0.0, 0.7, 0.5));
}
