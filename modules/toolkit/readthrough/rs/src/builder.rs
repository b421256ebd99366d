use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use eyre::{ensure, eyre, Result, WrapErr};
use rayon::{ThreadPool, ThreadPoolBuilder};
use thread_local::ThreadLocal;

use readthru_core_rs::parallelism;

use crate::annotation::FeatureIndex;
use crate::config::Config;
use crate::engine::Engine;

pub struct EngineBuilder {
    index: Option<FeatureIndex>,
    config: Config,
    thread_pool: Option<ThreadPool>,
    batch_size: usize,
    cancellation: Option<Arc<AtomicBool>>,
}

impl EngineBuilder {
    pub const DEFAULT_BATCH_SIZE: usize = 1024;

    pub fn set_index(mut self, index: FeatureIndex) -> Self {
        self.index = Some(index);
        self
    }

    pub fn set_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn set_thread_pool(mut self, pool: ThreadPool) -> Self {
        self.thread_pool = Some(pool);
        self
    }

    /// Dedicated pool with the given number of threads. Negative values count back from the
    /// number of available cores.
    pub fn set_threads(self, threads: isize) -> Result<Self> {
        let threads = parallelism::available(threads)?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .wrap_err_with(|| format!("Failed to start a thread pool with {threads} threads"))?;
        log::debug!("Readthrough engine will use {threads} threads");
        Ok(self.set_thread_pool(pool))
    }

    /// Number of templates classified in parallel before their annotations are emitted.
    pub fn set_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// The run is aborted at the next batch boundary once the flag is raised.
    pub fn set_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancellation = Some(flag);
        self
    }

    pub fn build(self) -> Result<Engine> {
        let index = self
            .index
            .ok_or_else(|| eyre!("Feature index must be set before building the engine"))?;
        ensure!(self.batch_size > 0, "Batch size must be positive");

        Ok(Engine::new(
            self.thread_pool,
            index,
            self.config,
            self.batch_size,
            self.cancellation.unwrap_or_default(),
            ThreadLocal::new(),
        ))
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            index: None,
            config: Config::default(),
            thread_pool: None,
            batch_size: Self::DEFAULT_BATCH_SIZE,
            cancellation: None,
        }
    }
}
