// THEORY:
// The `sampler` module is the one impure edge of the engine. Decoding an image,
// shrinking it and collecting statistics are slow and format dependent; the encoder
// only needs two numbers out of all of that: a dominant color and a 3x2 raw grid.
//
// `ImageSampler` is the port the pipeline talks to. Tests swap in a fake that hands
// back synthetic samples so the math can be checked without any image I/O, and
// `ImageCrateSampler` is the production adapter built on the `image` crate.
//
// Decoding is CPU bound, so the adapter moves it onto tokio's blocking pool and the
// caller just awaits one request/response. A failure anywhere in here is returned
// as-is; there is no retry and no partial sample.

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, RgbImage};
use tracing::debug;

use crate::core_modules::grid::grid::{GRID_COLUMNS, GRID_ROWS, RawPixelGrid};
use crate::core_modules::pixel::pixel::RgbColor;
use crate::error::PlaceholderError;
use crate::pipeline::PlaceholderOptions;

/// Histogram bins per channel for dominant color estimation (16^3 = 4096 bins).
const DOMINANT_BINS: usize = 16;
const DOMINANT_BIN_WIDTH: u8 = (256 / DOMINANT_BINS) as u8;
/// Sigma of the unsharp mask applied to the 3x2 grid.
const GRID_SHARPEN_SIGMA: f32 = 1.0;

/// Where the image bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Bytes(Vec<u8>),
    Path(PathBuf),
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        ImageSource::Bytes(bytes)
    }
}

impl From<&[u8]> for ImageSource {
    fn from(bytes: &[u8]) -> Self {
        ImageSource::Bytes(bytes.to_vec())
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::Path(path)
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        ImageSource::Path(path.to_path_buf())
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Bytes(bytes) => write!(f, "<{} bytes>", bytes.len()),
            ImageSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

impl ImageSource {
    async fn into_bytes(self) -> Result<Vec<u8>, PlaceholderError> {
        match self {
            ImageSource::Bytes(bytes) => Ok(bytes),
            ImageSource::Path(path) => Ok(tokio::fs::read(&path).await?),
        }
    }
}

/// What an image is reduced to before encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSample {
    pub dominant: RgbColor,
    pub grid: RawPixelGrid,
}

/// Decode-and-sample port: turns an image source into an [`ImageSample`].
pub trait ImageSampler: Send + Sync {
    fn sample(
        &self,
        source: ImageSource,
        options: &PlaceholderOptions,
    ) -> impl Future<Output = Result<ImageSample, PlaceholderError>> + Send;
}

/// [`ImageSampler`] backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateSampler;

impl ImageSampler for ImageCrateSampler {
    async fn sample(
        &self,
        source: ImageSource,
        options: &PlaceholderOptions,
    ) -> Result<ImageSample, PlaceholderError> {
        let bytes = source.into_bytes().await?;
        let options = options.clone();
        tokio::task::spawn_blocking(move || {
            let image = image::load_from_memory(&bytes)?;
            sample_image(&image, &options)
        })
        .await?
    }
}

/// Samples an already decoded image.
pub fn sample_image(
    image: &DynamicImage,
    options: &PlaceholderOptions,
) -> Result<ImageSample, PlaceholderError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(PlaceholderError::EmptyImage);
    }

    let working = if options.fast {
        downscale_to_fit(image, options.fast_bounding_box)
    } else {
        image.clone()
    };
    debug!(
        width,
        height,
        working_width = working.width(),
        working_height = working.height(),
        fast = options.fast,
        "sampling image"
    );

    let dominant = dominant_color(&working.to_rgb8()).ok_or(PlaceholderError::EmptyImage)?;
    let grid = resample_grid(&working)?;
    Ok(ImageSample { dominant, grid })
}

/// Shrinks `image` to fit inside a `bound` x `bound` box, keeping its aspect ratio.
/// Images that already fit are returned unchanged.
pub fn downscale_to_fit(image: &DynamicImage, bound: u32) -> DynamicImage {
    let (width, height) = image.dimensions();
    if bound == 0 || (width <= bound && height <= bound) {
        return image.clone();
    }
    image.resize(bound, bound, FilterType::Lanczos3)
}

/// Most populated bin of a 16x16x16 RGB histogram, reported as the bin center.
/// Ties go to the bin visited first in red-major order.
pub fn dominant_color(image: &RgbImage) -> Option<RgbColor> {
    let bin = |channel: u8| (channel / DOMINANT_BIN_WIDTH) as usize;

    let mut histogram = vec![0u32; DOMINANT_BINS * DOMINANT_BINS * DOMINANT_BINS];
    for pixel in image.pixels() {
        let [r, g, b] = pixel.0;
        let index = (bin(r) * DOMINANT_BINS + bin(g)) * DOMINANT_BINS + bin(b);
        histogram[index] += 1;
    }

    let mut best = None;
    let mut best_count = 0;
    for (index, &count) in histogram.iter().enumerate() {
        if count > best_count {
            best = Some(index);
            best_count = count;
        }
    }

    let center = |bin: usize| bin as u8 * DOMINANT_BIN_WIDTH + DOMINANT_BIN_WIDTH / 2;
    best.map(|index| {
        RgbColor::new(
            center(index / (DOMINANT_BINS * DOMINANT_BINS)),
            center(index / DOMINANT_BINS % DOMINANT_BINS),
            center(index % DOMINANT_BINS),
        )
    })
}

/// Resamples to exactly 3x2 with a cubic kernel and sharpens the result. Alpha is
/// kept in the buffer when the source has it.
pub fn resample_grid(image: &DynamicImage) -> Result<RawPixelGrid, PlaceholderError> {
    let grid = image
        .resize_exact(GRID_COLUMNS as u32, GRID_ROWS as u32, FilterType::CatmullRom)
        .unsharpen(GRID_SHARPEN_SIGMA, 0);

    if grid.color().has_alpha() {
        RawPixelGrid::new(grid.to_rgba8().into_raw(), 4)
    } else {
        RawPixelGrid::new(grid.to_rgb8().into_raw(), 3)
    }
}
