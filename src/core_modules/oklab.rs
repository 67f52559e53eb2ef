// THEORY:
// Oklab is a perceptually uniform color space: equal steps in (L, a, b) look like
// roughly equal steps to a human eye. That property is what lets the placeholder spend
// only 2 bits on lightness and 3 bits per chroma axis and still get a plausible tint.
//
// Conversion path: sRGB bytes -> linear light (see `pixel`) -> LMS cone response via a
// fixed matrix -> cube root -> a second fixed matrix yielding (L, a, b).
//
// The matrix coefficients are written out to the full precision published with Oklab.
// Quantization boundaries sit close enough together that rounding any of them would
// flip levels for colors near an edge, so they must stay exactly as written.

use crate::core_modules::pixel::pixel::RgbColor;

pub type Lightness = f64;
pub type ChromaAxis = f64;

/// Linear sRGB -> LMS.
const LINEAR_TO_LMS: [[f64; 3]; 3] = [
    [0.4122214708, 0.5363325363, 0.0514459929],
    [0.2119034982, 0.6806995451, 0.1073969566],
    [0.0883024619, 0.2817188376, 0.6299787005],
];

/// Cube-rooted LMS -> Oklab.
const LMS_TO_OKLAB: [[f64; 3]; 3] = [
    [0.2104542553, 0.7936177850, -0.0040720468],
    [1.9779984951, -2.4285922050, 0.4505937099],
    [0.0259040371, 0.7827717662, -0.8086757660],
];

/// A color in the Oklab space. Transient: lives only within one encoding call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OklabColor {
    /// Perceived lightness, ~0 for black and ~1 for white.
    pub l: Lightness,
    /// Green (negative) to red (positive) axis.
    pub a: ChromaAxis,
    /// Blue (negative) to yellow (positive) axis.
    pub b: ChromaAxis,
}

#[inline]
fn apply(matrix: &[[f64; 3]; 3], [x, y, z]: [f64; 3]) -> [f64; 3] {
    matrix.map(|[m0, m1, m2]| m0 * x + m1 * y + m2 * z)
}

/// Converts an sRGB-encoded color to Oklab.
pub fn rgb_to_oklab(rgb: RgbColor) -> OklabColor {
    let lms = apply(&LINEAR_TO_LMS, rgb.linearized());
    let [l, a, b] = apply(&LMS_TO_OKLAB, lms.map(f64::cbrt));
    OklabColor { l, a, b }
}

impl From<RgbColor> for OklabColor {
    fn from(rgb: RgbColor) -> Self {
        rgb_to_oklab(rgb)
    }
}

impl OklabColor {
    /// Distance from the neutral axis.
    pub fn chroma(&self) -> f64 {
        self.a.hypot(self.b)
    }
}
