use std::num::ParseIntError;

use thiserror::Error;

/// Everything that can stop a placeholder from being produced.
///
/// The packing itself cannot fail; every variant originates either in the image
/// sampler or in parsing a code that came from outside.
#[derive(Error, Debug)]
pub enum PlaceholderError {
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("failed to read image source: {0}")]
    Io(#[from] std::io::Error),

    #[error("image has no pixels")]
    EmptyImage,

    #[error("pixel grid needs at least 3 channels per pixel (got {channels} over {len} bytes)")]
    InvalidGrid { channels: usize, len: usize },

    #[error("image sampling task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("placeholder code {0} is outside [-524288, 524287]")]
    CodeOutOfRange(i64),

    #[error("placeholder code is not an integer: {0}")]
    ParseCode(#[from] ParseIntError),
}
