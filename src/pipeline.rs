// THEORY:
// The `pipeline` module is the top-level API of the placeholder engine. It wires the
// impure sampler to the pure encoder: one awaited request to the sampler for a
// dominant color and a 3x2 grid, then quantization and packing.
//
// Either a complete code comes back or the whole operation fails with the sampler's
// error. Nothing is cached between calls, so a single pipeline can serve any number
// of concurrent `generate` calls.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core_modules::placeholder::{PlaceholderCode, encode_placeholder};
use crate::error::PlaceholderError;
use crate::sampler::{ImageCrateSampler, ImageSampler, ImageSource};

/// Default edge of the box images are shrunk into in fast mode.
pub const DEFAULT_FAST_BOUNDING_BOX: u32 = 64;

/// Tunable behavior of the image sampler. The encoding itself is not configurable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderOptions {
    /// Shrink the image to fit inside `fast_bounding_box` before sampling. Trades a
    /// little fidelity in the dominant color for a lot of speed on large images.
    pub fast: bool,
    /// Edge length of the fast-mode box, in pixels.
    pub fast_bounding_box: u32,
}

impl Default for PlaceholderOptions {
    fn default() -> Self {
        Self {
            fast: true,
            fast_bounding_box: DEFAULT_FAST_BOUNDING_BOX,
        }
    }
}

/// Produces placeholder codes from image sources through an [`ImageSampler`].
#[derive(Debug, Clone, Default)]
pub struct PlaceholderPipeline<S = ImageCrateSampler> {
    sampler: S,
    options: PlaceholderOptions,
}

impl<S: ImageSampler> PlaceholderPipeline<S> {
    pub fn new(sampler: S) -> Self {
        Self {
            sampler,
            options: PlaceholderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PlaceholderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &PlaceholderOptions {
        &self.options
    }

    pub fn sampler(&self) -> &S {
        &self.sampler
    }

    pub async fn generate(
        &self,
        source: impl Into<ImageSource>,
    ) -> Result<PlaceholderCode, PlaceholderError> {
        let sample = self.sampler.sample(source.into(), &self.options).await?;
        let code = encode_placeholder(sample.dominant, &sample.grid);
        debug!(dominant = ?sample.dominant, %code, "generated placeholder");
        Ok(code)
    }
}

/// Generates a placeholder code for `source` with the default `image` crate sampler.
pub async fn generate_placeholder(
    source: impl Into<ImageSource>,
    options: PlaceholderOptions,
) -> Result<PlaceholderCode, PlaceholderError> {
    PlaceholderPipeline::new(ImageCrateSampler)
        .with_options(options)
        .generate(source)
        .await
}
