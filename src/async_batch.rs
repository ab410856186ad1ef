//! Async batch processing module
//!
//! Every bridge call is independent and owns its own buffers, so a batch of
//! inputs can be spread over blocking worker threads with no coordination
//! beyond a concurrency limit.

#[cfg(feature = "async")]
/// Concurrent execution of many independent bridge calls
pub mod processor {
    use crate::bridge::{Bridge, BridgeOptions};
    use crate::common::{Outcome, Reason};
    use bytes::Bytes;
    use futures::stream::{self, StreamExt};
    use log::warn;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Operation {
        Compress,
        Decompress,
    }

    /// Runs bridge operations over a batch of inputs with bounded concurrency
    #[derive(Debug, Clone)]
    pub struct AsyncBatchProcessor {
        concurrency_limit: usize,
        options: BridgeOptions,
    }

    impl AsyncBatchProcessor {
        /// Create a processor with one call in flight per CPU
        pub fn new() -> Self {
            Self {
                concurrency_limit: num_cpus::get(),
                options: BridgeOptions::default(),
            }
        }

        /// Set the concurrency limit (minimum 1)
        pub fn with_concurrency(mut self, limit: usize) -> Self {
            self.concurrency_limit = limit.max(1);
            self
        }

        /// Set the bridge options used for every call
        pub fn with_options(mut self, options: BridgeOptions) -> Self {
            self.options = options;
            self
        }

        /// Concurrency limit in effect
        pub fn concurrency(&self) -> usize {
            self.concurrency_limit
        }

        /// Compress every input; outcomes are returned in input order
        pub async fn compress_all(&self, inputs: Vec<Bytes>) -> Vec<Outcome> {
            self.run(inputs, Operation::Compress).await
        }

        /// Decompress every input; outcomes are returned in input order
        pub async fn decompress_all(&self, inputs: Vec<Bytes>) -> Vec<Outcome> {
            self.run(inputs, Operation::Decompress).await
        }

        async fn run(&self, inputs: Vec<Bytes>, operation: Operation) -> Vec<Outcome> {
            stream::iter(inputs.into_iter().map(|input| {
                let bridge = Bridge::with_options(self.options);
                async move {
                    let handle = tokio::task::spawn_blocking(move || match operation {
                        Operation::Compress => bridge.compress(&input),
                        Operation::Decompress => bridge.decompress(&input),
                    });
                    match handle.await {
                        Ok(outcome) => outcome,
                        Err(e) => {
                            warn!("{:?} worker failed: {}", operation, e);
                            Outcome::Error(Reason::Unknown)
                        }
                    }
                }
            }))
            .buffered(self.concurrency_limit)
            .collect()
            .await
        }
    }

    impl Default for AsyncBatchProcessor {
        fn default() -> Self {
            Self::new()
        }
    }

}

#[cfg(feature = "async")]
pub use processor::AsyncBatchProcessor;
