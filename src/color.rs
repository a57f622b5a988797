use palette::Srgb;
use palette::white_point::D65;

/// CIE L*a*b* under a D65 white point, the space all perceptual distances are measured in.
pub type Lab = palette::Lab<D65, f64>;

// D65 reference white.
const XN: f64 = 0.95047;
const YN: f64 = 1.0;
const ZN: f64 = 1.08883;

const DELTA: f64 = 6.0 / 29.0;

/// Undo the sRGB transfer curve for a single channel in `[0, 1]`.
#[inline]
pub fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[inline]
fn lab_f(t: f64) -> f64 {
    if t > DELTA * DELTA * DELTA {
        t.cbrt()
    } else {
        t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
    }
}

/// Convert an 8-bit sRGB color to LAB through linear RGB and XYZ (D65).
pub fn rgb_to_lab(rgb: Srgb<u8>) -> Lab {
    let r = srgb_to_linear(rgb.red as f64 / 255.0);
    let g = srgb_to_linear(rgb.green as f64 / 255.0);
    let b = srgb_to_linear(rgb.blue as f64 / 255.0);

    let x = r * 0.4124564 + g * 0.3575761 + b * 0.1804375;
    let y = r * 0.2126729 + g * 0.7151522 + b * 0.0721750;
    let z = r * 0.0193339 + g * 0.1191920 + b * 0.9503041;

    let fx = lab_f(x / XN);
    let fy = lab_f(y / YN);
    let fz = lab_f(z / ZN);

    Lab::new(116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz))
}

/// Squared Euclidean distance between two LAB colors. Take the square root
/// yourself when a true ΔE is needed.
#[inline]
pub fn lab_distance_sq(a: &Lab, b: &Lab) -> f64 {
    let dl = a.l - b.l;
    let da = a.a - b.a;
    let db = a.b - b.b;
    dl * dl + da * da + db * db
}

#[inline]
pub fn lab_distance(a: &Lab, b: &Lab) -> f64 {
    lab_distance_sq(a, b).sqrt()
}

/// Round and clamp a channel value into the 8-bit range.
#[inline]
pub fn clamp_channel(x: f64) -> u8 {
    x.round().clamp(0.0, 255.0) as u8
}

/// Render `#RRGGBB` with uppercase digits. Each channel is rounded to the
/// nearest integer first, then clamped to `[0, 255]`.
pub fn rgb_to_hex(r: f64, g: f64, b: f64) -> String {
    format!(
        "#{:02X}{:02X}{:02X}",
        clamp_channel(r),
        clamp_channel(g),
        clamp_channel(b)
    )
}

/// Hue in degrees `[0, 360)`, saturation and value in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsv {
    pub hue: f64,
    pub saturation: f64,
    pub value: f64,
}

pub fn rgb_to_hsv(rgb: Srgb<u8>) -> Hsv {
    let r = rgb.red as f64 / 255.0;
    let g = rgb.green as f64 / 255.0;
    let b = rgb.blue as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let d = max - min;

    let mut hue = 0.0;
    if d != 0.0 {
        hue = if max == r {
            ((g - b) / d) % 6.0
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        hue *= 60.0;
        if hue < 0.0 {
            hue += 360.0;
        }
    }

    let saturation = if max == 0.0 { 0.0 } else { d / max };

    Hsv {
        hue,
        saturation,
        value: max,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette::{IntoColor, LinSrgb};

    #[test]
    fn hex_encodes_and_clamps() {
        assert_eq!(rgb_to_hex(0.0, 0.0, 0.0), "#000000");
        assert_eq!(rgb_to_hex(255.0, 255.0, 255.0), "#FFFFFF");
        assert_eq!(rgb_to_hex(300.0, -10.0, 128.0), "#FF0080");
        assert_eq!(rgb_to_hex(199.6, 49.5, 10.2), "#C8320A");
    }

    #[test]
    fn lab_is_pure() {
        let c = Srgb::new(12u8, 200, 77);
        let a = rgb_to_lab(c);
        let b = rgb_to_lab(c);
        assert_eq!(a.l.to_bits(), b.l.to_bits());
        assert_eq!(a.a.to_bits(), b.a.to_bits());
        assert_eq!(a.b.to_bits(), b.b.to_bits());
        assert_eq!(lab_distance_sq(&a, &a), 0.0);
    }

    #[test]
    fn lab_reference_points() {
        let white = rgb_to_lab(Srgb::new(255, 255, 255));
        assert!((white.l - 100.0).abs() < 1e-3);
        assert!(white.a.abs() < 1e-2 && white.b.abs() < 1e-2);

        let black = rgb_to_lab(Srgb::new(0, 0, 0));
        assert!(black.l.abs() < 1e-9);
    }

    #[test]
    fn lab_agrees_with_palette_crate() {
        for &(r, g, b) in &[(200u8, 50u8, 50u8), (10, 120, 240), (128, 128, 128), (250, 230, 20)] {
            let ours = rgb_to_lab(Srgb::new(r, g, b));
            let linear: LinSrgb<f64> =
                Srgb::new(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0).into_linear();
            let theirs: palette::Lab<D65, f64> = linear.into_color();
            assert!(lab_distance(&ours, &theirs) < 0.1, "{r},{g},{b}: {ours:?} vs {theirs:?}");
        }
    }

    #[test]
    fn hsv_primaries_and_gray() {
        let red = rgb_to_hsv(Srgb::new(255, 0, 0));
        assert_eq!(red.hue, 0.0);
        assert_eq!(red.saturation, 1.0);

        let green = rgb_to_hsv(Srgb::new(0, 255, 0));
        assert!((green.hue - 120.0).abs() < 1e-9);

        let blue = rgb_to_hsv(Srgb::new(0, 0, 255));
        assert!((blue.hue - 240.0).abs() < 1e-9);

        let magenta_ish = rgb_to_hsv(Srgb::new(255, 0, 128));
        assert!(magenta_ish.hue > 300.0 && magenta_ish.hue < 360.0);

        let gray = rgb_to_hsv(Srgb::new(90, 90, 90));
        assert_eq!(gray.hue, 0.0);
        assert_eq!(gray.saturation, 0.0);

        let black = rgb_to_hsv(Srgb::new(0, 0, 0));
        assert_eq!(black.saturation, 0.0);
        assert_eq!(black.value, 0.0);
    }
}
