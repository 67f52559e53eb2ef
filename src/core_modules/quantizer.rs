// THEORY:
// The `Quantizer` turns a bounded real value into one of a handful of discrete levels.
// Every field of a placeholder code passes through here, which makes the level
// boundaries part of the wire format: a decoder elsewhere assumes exactly these
// boundaries when it maps a level back to a color.
//
// Values outside the declared domain saturate at the nearest level instead of
// wrapping. Truncation is `floor`, so the top level is only reached by values at or
// above `max`.

pub type Level = u32;

/// Maps `value` to a level in `[0, 2^bits - 1]` by linear normalization against
/// `[min, max]`, clamping, and floor truncation.
///
/// `min == max` is a caller error.
pub fn quantize(value: f64, min: f64, max: f64, bits: u32) -> Level {
    debug_assert!(min != max, "quantization domain must not be empty");
    debug_assert!((1..32).contains(&bits), "unsupported bit width {bits}");

    let levels = (1u64 << bits) as f64;
    let normalized = ((value - min) / (max - min)).clamp(0.0, 1.0);
    (normalized * (levels - 1.0)).floor() as Level
}

/// A declared real domain and the bit width its values are quantized to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantizationDomain {
    pub min: f64,
    pub max: f64,
    pub bits: u32,
}

/// Oklab lightness of the dominant color.
pub const LIGHTNESS_DOMAIN: QuantizationDomain = QuantizationDomain::new(0.2, 0.8, 2);
/// Oklab `a` and `b` chroma axes of the dominant color.
pub const CHROMA_DOMAIN: QuantizationDomain = QuantizationDomain::new(-0.35, 0.35, 3);
/// Luminance of a single grid cell.
pub const BRIGHTNESS_DOMAIN: QuantizationDomain = QuantizationDomain::new(0.2, 0.8, 2);

impl QuantizationDomain {
    pub const fn new(min: f64, max: f64, bits: u32) -> Self {
        Self { min, max, bits }
    }

    pub fn quantize(&self, value: f64) -> Level {
        quantize(value, self.min, self.max, self.bits)
    }

    /// Highest level this domain can produce.
    pub const fn max_level(&self) -> Level {
        (1 << self.bits) - 1
    }

    /// Bit mask covering one field of this width.
    pub const fn mask(&self) -> Level {
        self.max_level()
    }
}
