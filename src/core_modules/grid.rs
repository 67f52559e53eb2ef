// THEORY:
// The `Grid` module represents the coarse spatial summary of an image: the source
// resampled to exactly 3 columns by 2 rows. It bridges the raw bytes handed back by
// the image sampler and the per-cell brightness fields of a placeholder code.
//
// Key architectural principles:
// 1.  **Data Container**: `RawPixelGrid` is a "dumb" container. It owns the raw buffer
//     and its channel count and knows how to read one cell back as an `RgbColor`.
// 2.  **Channel Agnostic**: Samplers may hand back RGB or RGBA buffers. Only the first
//     three bytes of each pixel are read; anything after index 2 is ignored.
// 3.  **Fixed Order**: Cells are always visited row-major, row 0 at the top. That order
//     is the order brightness fields are packed in, so it is part of the wire format.

pub mod grid {
    use crate::core_modules::pixel::pixel::{RGB_CHANNELS, RgbColor};
    use crate::core_modules::quantizer::{BRIGHTNESS_DOMAIN, Level};
    use crate::error::PlaceholderError;

    pub const GRID_COLUMNS: usize = 3;
    pub const GRID_ROWS: usize = 2;
    pub const GRID_CELLS: usize = GRID_COLUMNS * GRID_ROWS;

    /// A 3x2 raw pixel buffer, row-major, `channels` bytes per pixel.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RawPixelGrid {
        data: Vec<u8>,
        channels: usize,
    }

    impl RawPixelGrid {
        pub fn new(data: Vec<u8>, channels: usize) -> Result<Self, PlaceholderError> {
            if channels < RGB_CHANNELS {
                return Err(PlaceholderError::InvalidGrid {
                    channels,
                    len: data.len(),
                });
            }
            Ok(Self { data, channels })
        }

        /// Builds an RGB grid from six colors given in row-major order.
        pub fn from_colors(cells: [RgbColor; GRID_CELLS]) -> Self {
            let data = cells.iter().flat_map(|c| <[u8; 3]>::from(*c)).collect();
            Self {
                data,
                channels: RGB_CHANNELS,
            }
        }

        /// A grid whose six cells are all `color`.
        pub fn uniform(color: RgbColor) -> Self {
            Self::from_colors([color; GRID_CELLS])
        }

        pub fn channels(&self) -> usize {
            self.channels
        }

        pub fn as_bytes(&self) -> &[u8] {
            &self.data
        }

        /// Reads the cell at (`column`, `row`). Bytes beyond the end of a short buffer
        /// read as 0.
        pub fn cell(&self, column: usize, row: usize) -> RgbColor {
            debug_assert!(column < GRID_COLUMNS && row < GRID_ROWS);
            let start = (row * GRID_COLUMNS + column) * self.channels;
            let end = (start + RGB_CHANNELS).min(self.data.len());
            self.data
                .get(start..end)
                .map(RgbColor::from)
                .unwrap_or_default()
        }

        /// All six cells, row-major.
        pub fn cells(&self) -> [RgbColor; GRID_CELLS] {
            std::array::from_fn(|i| self.cell(i % GRID_COLUMNS, i / GRID_COLUMNS))
        }

        /// Luminance of every cell quantized to the brightness domain, row-major.
        pub fn brightness_levels(&self) -> [Level; GRID_CELLS] {
            self.cells()
                .map(|cell| BRIGHTNESS_DOMAIN.quantize(cell.luminance()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::grid::*;
    use crate::core_modules::pixel::pixel::RgbColor;

    #[test]
    fn reads_rgb_cells_row_major() {
        let data: Vec<u8> = (0..18).collect();
        let grid = RawPixelGrid::new(data, 3).unwrap();
        assert_eq!(grid.cell(0, 0), RgbColor::new(0, 1, 2));
        assert_eq!(grid.cell(2, 0), RgbColor::new(6, 7, 8));
        assert_eq!(grid.cell(0, 1), RgbColor::new(9, 10, 11));
        assert_eq!(grid.cell(2, 1), RgbColor::new(15, 16, 17));
    }

    #[test]
    fn skips_alpha_channel() {
        let mut data = Vec::new();
        for i in 0..GRID_CELLS as u8 {
            data.extend_from_slice(&[i, i + 10, i + 20, 255]);
        }
        let grid = RawPixelGrid::new(data, 4).unwrap();
        let cells = grid.cells();
        assert_eq!(cells[0], RgbColor::new(0, 10, 20));
        assert_eq!(cells[4], RgbColor::new(4, 14, 24));
        assert_eq!(cells[5], RgbColor::new(5, 15, 25));
    }

    #[test]
    fn short_buffer_reads_as_zero() {
        let grid = RawPixelGrid::new(vec![200; 16], 3).unwrap();
        assert_eq!(grid.cell(1, 1), RgbColor::gray(200));
        assert_eq!(grid.cell(2, 1), RgbColor::new(200, 0, 0));

        let truncated = RawPixelGrid::new(vec![200; 12], 3).unwrap();
        assert_eq!(truncated.cell(1, 1), RgbColor::BLACK);
        assert_eq!(truncated.cell(2, 1), RgbColor::BLACK);
    }

    #[test]
    fn rejects_fewer_than_three_channels() {
        assert!(RawPixelGrid::new(vec![0; 12], 2).is_err());
        assert!(RawPixelGrid::new(vec![0; 6], 1).is_err());
    }

    #[test]
    fn from_colors_round_trips_cells() {
        let colors = [
            RgbColor::new(1, 2, 3),
            RgbColor::new(4, 5, 6),
            RgbColor::new(7, 8, 9),
            RgbColor::new(10, 11, 12),
            RgbColor::new(13, 14, 15),
            RgbColor::new(16, 17, 18),
        ];
        let grid = RawPixelGrid::from_colors(colors);
        assert_eq!(grid.channels(), 3);
        assert_eq!(grid.as_bytes().len(), 18);
        assert_eq!(grid.cells(), colors);
    }

    #[test]
    fn brightness_levels_follow_cell_order() {
        let grid = RawPixelGrid::from_colors([
            RgbColor::BLACK,
            RgbColor::gray(100),
            RgbColor::gray(140),
            RgbColor::gray(190),
            RgbColor::WHITE,
            RgbColor::BLACK,
        ]);
        // 100/255 = 0.392 -> 0.96 -> 0, 140/255 = 0.549 -> 1.74 -> 1, 190/255 = 0.745 -> 2.73 -> 2
        assert_eq!(grid.brightness_levels(), [0, 0, 1, 2, 3, 0]);
    }
}
