use std::cell::RefCell;
use std::iter::zip;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use derive_more::Constructor;
use eyre::{bail, Result, WrapErr};
use itertools::Itertools;
use rayon::prelude::*;
use rayon::ThreadPool;
use thread_local::ThreadLocal;

use readthru_core_rs::alignment::Template;

use crate::annotation::FeatureIndex;
use crate::builder::EngineBuilder;
use crate::classify::{Call, Classifier};
use crate::config::Config;
use crate::counter::Counter;
use crate::emitter::{Annotation, Emitter};
use crate::result::Summary;
use crate::worker::Worker;

#[derive(Constructor)]
pub struct Engine {
    thread_pool: Option<ThreadPool>,
    index: FeatureIndex,
    config: Config,
    batch_size: usize,
    cancellation: Arc<AtomicBool>,
    workers: ThreadLocal<RefCell<Worker>>,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn index(&self) -> &FeatureIndex {
        &self.index
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Handle that cancels the current run when raised.
    pub fn cancellation(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancellation)
    }

    /// Classify and count all templates. Annotations reach the emitter in input order.
    /// Any read error or a cancellation aborts the run without partial results.
    pub fn run<E: Emitter>(
        &mut self,
        templates: impl Iterator<Item = Result<Template>>,
        mut emitter: E,
    ) -> Result<Summary> {
        for w in self.workers.iter_mut() {
            w.get_mut().reset();
        }

        let mut total = Counter::new();
        let chunks = templates.chunks(self.batch_size);
        for (ind, chunk) in (&chunks).into_iter().enumerate() {
            if self.cancellation.load(Ordering::Relaxed) {
                log::error!("Readthrough counting was cancelled after {ind} batches");
                bail!("Readthrough counting was cancelled");
            }

            let batch = chunk
                .collect::<Result<Vec<_>>>()
                .wrap_err_with(|| format!("Failed to read batch {ind}"))?;

            let (calls, counter) = match &self.thread_pool {
                Some(pool) => pool.install(|| self.classify_batch(&batch)),
                None => self.classify_batch(&batch),
            };

            if emitter.is_enabled() {
                for (template, calls) in zip(&batch, &calls) {
                    for (placement, call) in zip(template.placements(), calls) {
                        let annotation = Annotation::new(call, &self.index);
                        emitter.emit(template, placement, &annotation)?;
                    }
                }
            }

            log::debug!(
                "Batch {ind}: {} templates, {} base hits",
                batch.len(),
                counter.diagnostics().base_hits()
            );
            total.merge(counter);
        }
        emitter.flush()?;

        let processed: usize = self.workers.iter_mut().map(|w| w.get_mut().templates()).sum();
        let diagnostics = total.diagnostics();
        log::info!(
            "Processed {processed} templates: {} base hits, {} readthrough hits",
            diagnostics.base_hits(),
            diagnostics.readthrough_hits()
        );
        for (name, value) in diagnostics.entries() {
            log::debug!("__{name}\t{value}");
        }

        Ok(total.finalize(&self.index))
    }

    fn classify_batch(&self, batch: &[Template]) -> (Vec<Vec<Call>>, Counter) {
        let classifier = Classifier::new(&self.index, &self.config);

        let calls: Vec<Vec<Call>> = batch
            .par_iter()
            .map(|template| {
                let mut worker = self.workers.get_or_default().borrow_mut();
                worker.classify(&classifier, template)
            })
            .collect();

        let counter = calls
            .par_iter()
            .fold(Counter::new, |mut counter, calls| {
                for call in calls {
                    counter.fold(call.outcome(), *call.weight());
                }
                counter
            })
            .reduce(Counter::new, |mut left, right| {
                left.merge(right);
                left
            });
        (calls, counter)
    }
}
