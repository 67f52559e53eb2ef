// THEORY (single-pixel color math):
// The `Pixel` module is the most fundamental unit of the placeholder engine. It holds
// the `RgbColor` data container plus the two single-pixel heuristics the encoder needs:
// relative luminance and sRGB gamma decoding. Anything that looks at more than one
// pixel (the 3x2 grid, the dominant color) lives in higher modules.
//
// Two brightness scales live side by side here:
// - normalized (0..1 sRGB): divide by 255.0, still gamma-encoded. `luminance` uses it.
// - linearized (0..1 linear light): gamma-decoded. Oklab conversion uses it.
//
// The luminance heuristic deliberately runs on the gamma-encoded ratios. Placeholder
// decoders elsewhere were built against these exact quantization boundaries, so the
// formula must not be "corrected" to linear light.
//
// Internally, the sRGB->linear conversion uses a 256-entry `OnceLock` LUT computed in
// f64 with the exact piecewise formula, so a table lookup is bit-identical to calling
// the formula directly.

pub mod pixel {
    use std::sync::OnceLock;

    pub type Channel = u8;
    pub type NormalizedChannel = f64;
    pub type LinearizedChannel = f64;
    pub type Luminance = f64;

    /// Minimum number of bytes per pixel the encoder can read a color from.
    pub const RGB_CHANNELS: usize = 3;

    const SRGB_LINEAR_THRESHOLD: f64 = 0.04045;

    static SRGB_TO_LINEAR_LUT: OnceLock<[LinearizedChannel; 256]> = OnceLock::new();

    /// A "dumb" data container for one sRGB-encoded color, 8 bits per channel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RgbColor {
        /// The red channel value (0-255).
        pub r: Channel,
        /// The green channel value (0-255).
        pub g: Channel,
        /// The blue channel value (0-255).
        pub b: Channel,
    }

    impl RgbColor {
        pub const BLACK: RgbColor = RgbColor::new(0, 0, 0);
        pub const WHITE: RgbColor = RgbColor::new(255, 255, 255);

        pub const fn new(r: Channel, g: Channel, b: Channel) -> Self {
            Self { r, g, b }
        }

        /// A neutral color with every channel set to `value`.
        pub const fn gray(value: Channel) -> Self {
            Self::new(value, value, value)
        }

        /// Channels scaled to 0..1, still gamma-encoded.
        pub fn normalized(&self) -> [NormalizedChannel; 3] {
            [
                self.r as NormalizedChannel / 255.0,
                self.g as NormalizedChannel / 255.0,
                self.b as NormalizedChannel / 255.0,
            ]
        }

        /// Channels gamma-decoded to linear light, 0..1.
        pub fn linearized(&self) -> [LinearizedChannel; 3] {
            [
                srgb_to_linear_from_byte(self.r),
                srgb_to_linear_from_byte(self.g),
                srgb_to_linear_from_byte(self.b),
            ]
        }

        /// Relative luminance (BT.709 weights) over the gamma-encoded channel ratios.
        ///
        /// - Black is exactly 0.0 and white is 1.0 within floating-point tolerance.
        /// - Not colorimetric luminance: the weights are applied before gamma decoding.
        pub fn luminance(&self) -> Luminance {
            let [r, g, b] = self.normalized();
            0.2126 * r + 0.7152 * g + 0.0722 * b
        }
    }

    /// Free-function form of [`RgbColor::luminance`].
    pub fn luminance(rgb: RgbColor) -> Luminance {
        rgb.luminance()
    }

    /// sRGB transfer function inverse for a normalized channel.
    pub fn srgb_to_linear(channel: NormalizedChannel) -> LinearizedChannel {
        if channel > SRGB_LINEAR_THRESHOLD {
            ((channel + 0.055) / 1.055).powf(2.4)
        } else {
            channel / 12.92
        }
    }

    #[inline]
    fn srgb_to_linear_from_byte(value: Channel) -> LinearizedChannel {
        let table = SRGB_TO_LINEAR_LUT.get_or_init(|| {
            let mut table = [0.0f64; 256];
            for (i, slot) in table.iter_mut().enumerate() {
                *slot = srgb_to_linear(i as NormalizedChannel / 255.0);
            }
            table
        });
        table[value as usize]
    }

    /// Reads R, G, B from the first three bytes of a pixel. Extra channels are ignored,
    /// missing ones read as 0.
    impl From<&[u8]> for RgbColor {
        fn from(bytes: &[u8]) -> Self {
            let at = |i: usize| bytes.get(i).copied().unwrap_or(0);
            RgbColor::new(at(0), at(1), at(2))
        }
    }

    impl From<[u8; 3]> for RgbColor {
        fn from([r, g, b]: [u8; 3]) -> Self {
            RgbColor::new(r, g, b)
        }
    }

    impl From<image::Rgb<u8>> for RgbColor {
        fn from(pixel: image::Rgb<u8>) -> Self {
            RgbColor::from(pixel.0)
        }
    }

    impl From<RgbColor> for [u8; 3] {
        fn from(color: RgbColor) -> Self {
            [color.r, color.g, color.b]
        }
    }
}
