// THEORY:
// `ParallelPipeline` runs many independent placeholder generations at once, e.g. for
// every image in a content directory at build time. Each item is a separate
// request/response against the sampler; items share nothing, so there is no ordering
// or temporal state to reconcile between them.
//
// Concurrency is bounded (one in-flight item per CPU by default) because every item
// holds a fully decoded image in memory while it is sampled. Results come back in
// input order and each one succeeds or fails on its own.

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::core_modules::placeholder::PlaceholderCode;
use crate::error::PlaceholderError;
use crate::pipeline::PlaceholderPipeline;
use crate::sampler::{ImageCrateSampler, ImageSampler, ImageSource};

/// Outcome of one item in a batch.
#[derive(Debug)]
pub struct BatchItem {
    pub source: ImageSource,
    pub result: Result<PlaceholderCode, PlaceholderError>,
}

pub struct ParallelPipeline<S = ImageCrateSampler> {
    pipeline: PlaceholderPipeline<S>,
    concurrency: usize,
}

impl<S: ImageSampler> ParallelPipeline<S> {
    pub fn new(pipeline: PlaceholderPipeline<S>) -> Self {
        Self {
            pipeline,
            concurrency: num_cpus::get(),
        }
    }

    /// Caps the number of images sampled at the same time. Zero is treated as one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub async fn process_all<I>(&self, sources: I) -> Vec<BatchItem>
    where
        I: IntoIterator,
        I::Item: Into<ImageSource>,
    {
        let items: Vec<BatchItem> = stream::iter(sources.into_iter().map(Into::into))
            .map(|source: ImageSource| async move {
                let result = self.pipeline.generate(source.clone()).await;
                if let Err(error) = &result {
                    warn!(%source, %error, "placeholder generation failed");
                }
                BatchItem { source, result }
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let failed = items.iter().filter(|item| item.result.is_err()).count();
        info!(
            total = items.len(),
            failed,
            concurrency = self.concurrency,
            "batch finished"
        );
        items
    }
}
