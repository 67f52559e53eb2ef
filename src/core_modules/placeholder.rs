// THEORY:
// The `Placeholder` module is the final stage of the engine. It takes the two samples
// an image is reduced to (a dominant color and a 3x2 grid), quantizes each derived
// value, and packs the eight resulting fields into one integer.
//
// Bit layout of the 20-bit unsigned value, most significant first:
//
//   19                                   8 7   6 5     3 2     0
//   | c0 | c1 | c2 | c3 | c4 | c5 |         L   |   a   |   b   |
//
// - c0..c5: luminance of the grid cells, 2 bits each, row-major (c0 = top left).
// - L:      Oklab lightness of the dominant color, 2 bits.
// - a, b:   Oklab chroma axes of the dominant color, 3 bits each.
//
// The unsigned value is shifted down by 2^19 so the code is centered on zero. That
// keeps it inside the integer range CSS and JSON consumers handle natively. This
// layout is the wire contract with every decoder, so the shifts below must not move.

use std::fmt;
use std::str::FromStr;

use tracing::trace;

use crate::core_modules::grid::grid::{GRID_CELLS, RawPixelGrid};
use crate::core_modules::oklab::rgb_to_oklab;
use crate::core_modules::pixel::pixel::RgbColor;
use crate::core_modules::quantizer::{
    BRIGHTNESS_DOMAIN, CHROMA_DOMAIN, LIGHTNESS_DOMAIN, Level,
};
use crate::error::PlaceholderError;

/// Width of the packed unsigned value.
pub const CODE_BITS: u32 = 20;
/// Subtracted from the packed value to center codes on zero.
pub const CODE_OFFSET: i32 = 1 << (CODE_BITS - 1);
pub const MIN_CODE: i32 = -CODE_OFFSET;
pub const MAX_CODE: i32 = CODE_OFFSET - 1;

const BRIGHTNESS_SHIFT: u32 = 8;
const LIGHTNESS_SHIFT: u32 = 6;
const A_SHIFT: u32 = 3;
const B_SHIFT: u32 = 0;

/// The eight quantized fields of a placeholder code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaceholderFields {
    /// Grid cell brightness levels, row-major.
    pub brightness: [Level; GRID_CELLS],
    pub lightness: Level,
    pub a: Level,
    pub b: Level,
}

impl PlaceholderFields {
    /// Quantizes a dominant color and a luminance grid.
    pub fn from_samples(dominant: RgbColor, grid: &RawPixelGrid) -> Self {
        let oklab = rgb_to_oklab(dominant);
        let fields = Self {
            brightness: grid.brightness_levels(),
            lightness: LIGHTNESS_DOMAIN.quantize(oklab.l),
            a: CHROMA_DOMAIN.quantize(oklab.a),
            b: CHROMA_DOMAIN.quantize(oklab.b),
        };
        trace!(?dominant, ?oklab, ?fields, "quantized placeholder fields");
        fields
    }

    /// Bit offset of brightness cell `index` within the packed value.
    const fn brightness_shift(index: usize) -> u32 {
        BRIGHTNESS_SHIFT + ((GRID_CELLS - 1 - index) as u32) * BRIGHTNESS_DOMAIN.bits
    }

    pub fn pack(&self) -> PlaceholderCode {
        let mut packed: u32 = 0;
        for (index, level) in self.brightness.iter().enumerate() {
            packed |= (level & BRIGHTNESS_DOMAIN.mask()) << Self::brightness_shift(index);
        }
        packed |= (self.lightness & LIGHTNESS_DOMAIN.mask()) << LIGHTNESS_SHIFT;
        packed |= (self.a & CHROMA_DOMAIN.mask()) << A_SHIFT;
        packed |= (self.b & CHROMA_DOMAIN.mask()) << B_SHIFT;

        PlaceholderCode(packed as i32 - CODE_OFFSET)
    }

    fn unpack(packed: u32) -> Self {
        Self {
            brightness: std::array::from_fn(|index| {
                (packed >> Self::brightness_shift(index)) & BRIGHTNESS_DOMAIN.mask()
            }),
            lightness: (packed >> LIGHTNESS_SHIFT) & LIGHTNESS_DOMAIN.mask(),
            a: (packed >> A_SHIFT) & CHROMA_DOMAIN.mask(),
            b: (packed >> B_SHIFT) & CHROMA_DOMAIN.mask(),
        }
    }
}

/// A packed placeholder code, always within [`MIN_CODE`, `MAX_CODE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaceholderCode(i32);

impl PlaceholderCode {
    pub fn new(value: i64) -> Result<Self, PlaceholderError> {
        if !(MIN_CODE as i64..=MAX_CODE as i64).contains(&value) {
            return Err(PlaceholderError::CodeOutOfRange(value));
        }
        Ok(Self(value as i32))
    }

    /// The signed code as it goes over the wire.
    pub fn value(&self) -> i32 {
        self.0
    }

    /// The 20-bit value before the centering offset.
    pub fn unsigned(&self) -> u32 {
        (self.0 + CODE_OFFSET) as u32
    }

    /// Splits the code back into its quantized fields.
    pub fn fields(&self) -> PlaceholderFields {
        PlaceholderFields::unpack(self.unsigned())
    }
}

impl From<PlaceholderCode> for i32 {
    fn from(code: PlaceholderCode) -> Self {
        code.0
    }
}

impl fmt::Display for PlaceholderCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PlaceholderCode {
    type Err = PlaceholderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim().parse::<i64>()?)
    }
}

/// Encodes a dominant color and a 3x2 grid into a placeholder code. Pure and
/// deterministic.
pub fn encode_placeholder(dominant: RgbColor, grid: &RawPixelGrid) -> PlaceholderCode {
    PlaceholderFields::from_samples(dominant, grid).pack()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mid_gray_fields_sit_in_documented_bits() {
        let gray = RgbColor::gray(128);
        let code = encode_placeholder(gray, &RawPixelGrid::uniform(gray));
        let unsigned = (code.value() + (1 << 19)) as u32;

        let b = unsigned & 0b111;
        let a = (unsigned >> 3) & 0b111;
        let l = (unsigned >> 6) & 0b11;
        assert!((1..=2).contains(&l), "L level {l}");
        assert!((3..=4).contains(&a), "a level {a}");
        assert!((3..=4).contains(&b), "b level {b}");

        let cells: Vec<u32> = (0..6)
            .map(|i| (unsigned >> (18 - 2 * i)) & 0b11)
            .collect();
        // 128/255 = 0.502 -> 1.51 -> level 1 in every cell.
        assert!(cells.iter().all(|&c| c == 1), "cells {cells:?}");
    }

    #[test]
    fn mid_gray_exact_code() {
        let gray = RgbColor::gray(128);
        let code = encode_placeholder(gray, &RawPixelGrid::uniform(gray));
        // cells 01 x6, L = 1, a = 3, b = 3
        let expected = 0b01_01_01_01_01_01_01_011_011 - (1 << 19);
        assert_eq!(code.value(), expected);
    }

    #[test]
    fn cell_zero_occupies_top_bits() {
        let mut fields = PlaceholderFields::default();
        fields.brightness[0] = 3;
        assert_eq!(fields.pack().unsigned(), 0b11 << 18);

        let mut fields = PlaceholderFields::default();
        fields.brightness[5] = 3;
        assert_eq!(fields.pack().unsigned(), 0b11 << 8);
    }

    #[test]
    fn extreme_fields_hit_code_bounds() {
        assert_eq!(PlaceholderFields::default().pack().value(), MIN_CODE);

        let full = PlaceholderFields {
            brightness: [3; GRID_CELLS],
            lightness: 3,
            a: 7,
            b: 7,
        };
        assert_eq!(full.pack().value(), MAX_CODE);
        assert_eq!(full.pack().unsigned(), (1 << 20) - 1);
    }

    #[test]
    fn oversized_levels_are_masked() {
        let fields = PlaceholderFields {
            brightness: [0xff; GRID_CELLS],
            lightness: 0xff,
            a: 0xff,
            b: 0xff,
        };
        assert_eq!(fields.pack().value(), MAX_CODE);
    }

    #[test]
    fn unpack_inverts_pack() {
        let fields = PlaceholderFields {
            brightness: [0, 1, 2, 3, 2, 1],
            lightness: 2,
            a: 5,
            b: 1,
        };
        assert_eq!(fields.pack().fields(), fields);
    }

    #[test]
    fn encoded_fields_recover_quantized_values() {
        let dominant = RgbColor::new(210, 80, 40);
        let grid = RawPixelGrid::from_colors([
            RgbColor::new(20, 30, 40),
            RgbColor::new(120, 130, 140),
            RgbColor::new(250, 240, 230),
            RgbColor::new(90, 200, 60),
            RgbColor::new(10, 10, 200),
            RgbColor::new(255, 255, 0),
        ]);
        let expected = PlaceholderFields::from_samples(dominant, &grid);
        let code = encode_placeholder(dominant, &grid);
        assert_eq!(code.fields(), expected);
    }

    #[test]
    fn encoding_is_deterministic_and_in_range() {
        for seed in 0..=255u8 {
            let dominant = RgbColor::new(seed, seed.wrapping_mul(7), seed.wrapping_mul(13));
            let grid = RawPixelGrid::from_colors(std::array::from_fn(|i| {
                RgbColor::gray(seed.wrapping_add(i as u8 * 40))
            }));
            let first = encode_placeholder(dominant, &grid);
            let second = encode_placeholder(dominant, &grid);
            assert_eq!(first, second);
            assert!((MIN_CODE..=MAX_CODE).contains(&first.value()));
        }
    }

    #[test]
    fn parses_and_validates_codes() {
        let code: PlaceholderCode = " -524288 ".parse().unwrap();
        assert_eq!(code.value(), MIN_CODE);
        assert_eq!(code.to_string(), "-524288");
        assert!("524288".parse::<PlaceholderCode>().is_err());
        assert!("-524289".parse::<PlaceholderCode>().is_err());
        assert!("lqip".parse::<PlaceholderCode>().is_err());
    }
}
