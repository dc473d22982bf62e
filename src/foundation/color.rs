use crate::foundation::core::Rgba8;

/// Convert an HSL triple to opaque RGBA8.
///
/// `hue_deg` wraps into `[0, 360)`, `saturation` and `lightness` are fractions in `[0, 1]`.
pub fn hsl_to_rgba8(hue_deg: f64, saturation: f64, lightness: f64) -> Rgba8 {
    let h = wrap_hue(hue_deg) / 60.0;
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);

    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = chroma * (1.0 - ((h % 2.0) - 1.0).abs());
    let (r1, g1, b1) = match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = l - chroma / 2.0;
    let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgba8::opaque(to_u8(r1), to_u8(g1), to_u8(b1))
}

/// Wrap a hue in degrees into `[0, 360)`.
pub(crate) fn wrap_hue(hue_deg: f64) -> f64 {
    if !hue_deg.is_finite() {
        return 0.0;
    }
    let h = hue_deg.rem_euclid(360.0);
    if h >= 360.0 { 0.0 } else { h }
}

/// Mean of two hues on the color wheel.
///
/// Antipodal hues have no defined vector mean; they resolve to the midpoint of the arc that
/// starts at the smaller hue.
pub fn circular_mean_hue(a_deg: f64, b_deg: f64) -> f64 {
    let a = wrap_hue(a_deg);
    let b = wrap_hue(b_deg);
    let (sa, ca) = a.to_radians().sin_cos();
    let (sb, cb) = b.to_radians().sin_cos();
    let (sy, sx) = (sa + sb, ca + cb);
    if sy.hypot(sx) < 1e-9 {
        return wrap_hue(a.min(b) + 90.0);
    }
    wrap_hue(sy.atan2(sx).to_degrees())
}

/// Remap a sine sample from `[-1, 1]` to a byte channel.
pub(crate) fn unit_sine_to_u8(v: f64) -> u8 {
    ((v * 0.5 + 0.5) * 255.0).floor().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
