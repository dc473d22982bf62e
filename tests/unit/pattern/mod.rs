use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::foundation::core::PixelRatio;
use crate::render::surface::{FrameRGBA, Surface, SurfaceGeometry};

fn render(synth: &mut PatternSynthesizer, t: f64, w: f64, h: f64) -> FrameRGBA {
    let mut surface = Surface::new(SurfaceGeometry::new(
        LogicalSize::new(w, h),
        PixelRatio::ONE,
    ));
    surface.render_frame(|p| synth.draw(t, p)).unwrap();
    surface.front_frame().unwrap()
}

#[test]
fn names_parse_back_case_insensitively() {
    for kind in PatternKind::ALL {
        assert_eq!(kind.name().parse::<PatternKind>().unwrap(), kind);
        assert_eq!(kind.to_string(), kind.name());
    }
    assert_eq!(" WAVE ".parse::<PatternKind>().unwrap(), PatternKind::Wave);
    assert!("plasma".parse::<PatternKind>().is_err());
}

#[test]
fn navigation_wraps_in_carousel_order() {
    assert_eq!(PatternKind::Gradient.next(), PatternKind::Checkerboard);
    assert_eq!(PatternKind::Particles.next(), PatternKind::Gradient);
    assert_eq!(PatternKind::Gradient.prev(), PatternKind::Particles);
    for kind in PatternKind::ALL {
        assert_eq!(kind.next().prev(), kind);
        assert!(kind.title().starts_with("120 FPS"));
    }
}

#[test]
fn serde_uses_lowercase_names() {
    let json = serde_json::to_string(&PatternKind::Checkerboard).unwrap();
    assert_eq!(json, "\"checkerboard\"");
    let back: PatternKind = serde_json::from_str("\"particles\"").unwrap();
    assert_eq!(back, PatternKind::Particles);
}

#[test]
fn stateless_patterns_render_identically_for_same_inputs() {
    for kind in [
        PatternKind::Gradient,
        PatternKind::Checkerboard,
        PatternKind::Wave,
    ] {
        let mut a = PatternSynthesizer::stateless(kind);
        let mut b = PatternSynthesizer::stateless(kind);
        let first = render(&mut a, 1.75, 96.0, 64.0);
        let again = render(&mut a, 1.75, 96.0, 64.0);
        let other = render(&mut b, 1.75, 96.0, 64.0);
        assert_eq!(first, again, "{kind} changed between calls");
        assert_eq!(first, other, "{kind} differs between instances");
        assert!(matches!(a.state(), PatternState::Stateless));
    }
}

#[test]
fn checkerboard_paints_alternate_tiles() {
    let mut synth = PatternSynthesizer::stateless(PatternKind::Checkerboard);
    let frame = render(&mut synth, 0.0, 120.0, 120.0);
    // Tile (0,2) is painted, tile (1,2) is not.
    let painted = frame.pixel(20, 100).unwrap();
    assert_ne!(&painted[..3], &[0, 0, 0]);
    assert_eq!(frame.pixel(60, 100), Some([0, 0, 0, 255]));

    // A quarter second later the parity flips.
    let frame = render(&mut synth, 0.25, 120.0, 120.0);
    assert_eq!(frame.pixel(20, 100), Some([0, 0, 0, 255]));
    assert_ne!(&frame.pixel(60, 100).unwrap()[..3], &[0, 0, 0]);
}

#[test]
fn custom_tile_size_is_validated() {
    assert!(
        PatternSynthesizer::stateless(PatternKind::Checkerboard)
            .with_tile_size(0.0)
            .is_err()
    );
    let mut synth = PatternSynthesizer::stateless(PatternKind::Checkerboard)
        .with_tile_size(10.0)
        .unwrap();
    let frame = render(&mut synth, 0.0, 40.0, 40.0);
    assert_ne!(&frame.pixel(5, 5).unwrap()[..3], &[0, 0, 0]);
    assert_eq!(frame.pixel(15, 5), Some([0, 0, 0, 255]));
}

#[test]
fn particles_activation_spawns_and_steps() {
    let bounds = LogicalSize::new(200.0, 100.0);
    let mut rng = StdRng::seed_from_u64(3);
    let mut synth = PatternSynthesizer::new(
        PatternKind::Particles,
        bounds,
        DEFAULT_PARTICLE_COUNT,
        &mut rng,
    );
    let before = synth.particles().unwrap().to_vec();
    assert_eq!(before.len(), DEFAULT_PARTICLE_COUNT);

    render(&mut synth, 0.016, 200.0, 100.0);
    let after = synth.particles().unwrap();
    assert_eq!(after.len(), before.len());
    assert!(before.iter().zip(after).any(|(a, b)| a.x != b.x || a.y != b.y));
}

#[test]
fn advance_to_takes_exactly_floor_of_elapsed_steps() {
    let bounds = LogicalSize::new(200.0, 100.0);
    let spawn = || {
        let mut rng = StdRng::seed_from_u64(9);
        PatternSynthesizer::new(PatternKind::Particles, bounds, 10, &mut rng)
    };

    let mut still = spawn();
    let initial = still.particles().unwrap().to_vec();
    assert_eq!(still.advance_to(0.01, 60.0, bounds), 0);
    let mut surface = Surface::new(SurfaceGeometry::from_logical(200.0, 100.0));
    surface.render_frame(|p| still.draw_still(0.01, p)).unwrap();
    assert_eq!(still.particles().unwrap(), initial.as_slice());

    let mut advanced = spawn();
    assert_eq!(advanced.advance_to(0.5, 60.0, bounds), 30);
    let mut manual = ParticleField::from_particles(initial);
    for _ in 0..30 {
        manual.step(bounds);
    }
    assert_eq!(advanced.particles().unwrap(), manual.particles());

    let mut rng = StdRng::seed_from_u64(9);
    let mut wave = PatternSynthesizer::new(PatternKind::Wave, bounds, 10, &mut rng);
    assert_eq!(wave.advance_to(2.0, 60.0, bounds), 0);
}

#[test]
fn non_particle_patterns_own_no_particles() {
    let mut rng = StdRng::seed_from_u64(3);
    let synth = PatternSynthesizer::new(
        PatternKind::Wave,
        LogicalSize::new(10.0, 10.0),
        DEFAULT_PARTICLE_COUNT,
        &mut rng,
    );
    assert!(synth.particles().is_none());
}

#[test]
fn overlay_lines_use_label_frame_counter() {
    let [name, frame, time] = overlay_lines(PatternKind::Wave, 1.5);
    assert_eq!(name, "Pattern: wave");
    assert_eq!(frame, "Frame: 90");
    assert_eq!(time, "Time: 1.5s");

    let [_, frame, time] = overlay_lines(PatternKind::Gradient, 2.04);
    assert_eq!(frame, "Frame: 122");
    assert_eq!(time, "Time: 2.0s");
}

#[test]
fn overlay_panel_darkens_pattern_underneath() {
    let mut synth = PatternSynthesizer::stateless(PatternKind::Gradient);
    let mut overlay = DiagnosticOverlay::new(None);
    assert!(!overlay.has_text());

    let mut surface = Surface::new(SurfaceGeometry::from_logical(320.0, 120.0));
    surface
        .render_frame(|p| {
            synth.draw(0.0, p)?;
            overlay.draw(p, PatternKind::Gradient, 0.0);
            Ok(())
        })
        .unwrap();
    let frame = surface.front_frame().unwrap();

    let plain = render(&mut synth, 0.0, 320.0, 120.0);
    let under = frame.pixel(300, 80).unwrap();
    let bare = plain.pixel(300, 80).unwrap();
    assert!(u16::from(under[0]) + u16::from(under[1]) + u16::from(under[2])
        < u16::from(bare[0]) + u16::from(bare[1]) + u16::from(bare[2]));
    assert_eq!(frame.pixel(315, 100), plain.pixel(315, 100));
}
