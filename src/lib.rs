// THEORY:
// This file is the main entry point for the `lqip` library crate. It exposes the
// placeholder engine: an image goes in, a single signed integer comes out that a
// front end can turn into a blurred preview while the real image loads.
//
// The public surface is intentionally small. `generate_placeholder` and the
// `PlaceholderPipeline` behind it are the high-level entry points; `ParallelPipeline`
// covers batches. The pure math (`core_modules`) is public too, so callers that
// already hold a dominant color and a 3x2 grid can encode without touching any
// image I/O, and so decoders can be checked against the exact bit layout.

pub mod core_modules;
pub mod error;
pub mod parallel_pipeline;
pub mod pipeline;
pub mod sampler;

pub use core_modules::grid::grid::RawPixelGrid;
pub use core_modules::oklab::{OklabColor, rgb_to_oklab};
pub use core_modules::pixel::pixel::{RgbColor, luminance};
pub use core_modules::placeholder::{
    PlaceholderCode, PlaceholderFields, encode_placeholder,
};
pub use core_modules::quantizer::quantize;
pub use error::PlaceholderError;
pub use parallel_pipeline::{BatchItem, ParallelPipeline};
pub use pipeline::{PlaceholderOptions, PlaceholderPipeline, generate_placeholder};
pub use sampler::{ImageCrateSampler, ImageSample, ImageSampler, ImageSource};
