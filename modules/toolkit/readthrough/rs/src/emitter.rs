use std::io::Write;

use eyre::{Result, WrapErr};
use impl_tools::autoimpl;

use readthru_core_rs::alignment::{Placement, Template};

use crate::annotation::FeatureIndex;
use crate::classify::{Call, Outcome, Reason, Tier};

/// Per-placement annotation forwarded to an [`Emitter`].
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    Hit {
        feature: String,
        base_match_length: u64,
        /// -1 for base hits
        tail_length: i64,
        weight: f64,
    },
    Fail {
        reason: Reason,
    },
}

impl Annotation {
    pub fn new(call: &Call, index: &FeatureIndex) -> Self {
        match call.outcome() {
            Outcome::Rejected(reason) => Annotation::Fail { reason: *reason },
            Outcome::Accepted(hit) => {
                let feature = index
                    .feature(*hit.feature())
                    .map(|x| x.name().clone())
                    .unwrap_or_default();
                let tail_length = match hit.tier() {
                    Tier::Base => -1,
                    Tier::Readthrough => *hit.tail_length() as i64,
                };
                Annotation::Hit {
                    feature,
                    base_match_length: *hit.base_match_length(),
                    tail_length,
                    weight: *call.weight(),
                }
            }
        }
    }
}

/// Sequential sink for classified placements. Placements arrive in input order.
#[autoimpl(for<T: trait + ?Sized> &mut T, Box<T>)]
pub trait Emitter {
    /// Sinks that return `false` never receive annotations.
    fn is_enabled(&self) -> bool {
        true
    }

    fn emit(
        &mut self,
        template: &Template,
        placement: &Placement,
        annotation: &Annotation,
    ) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl Emitter for Discard {
    fn is_enabled(&self) -> bool {
        false
    }

    fn emit(&mut self, _: &Template, _: &Placement, _: &Annotation) -> Result<()> {
        Ok(())
    }
}

/// Keeps (template name, annotation) pairs in memory.
#[derive(Debug, Clone, Default)]
pub struct Collect {
    pub annotations: Vec<(String, Annotation)>,
}

impl Emitter for Collect {
    fn emit(&mut self, template: &Template, _: &Placement, annotation: &Annotation) -> Result<()> {
        self.annotations
            .push((template.name().clone(), annotation.clone()));
        Ok(())
    }
}

/// Writes every segment of an annotated placement as a tab-separated line:
/// `qname contig pos cigar` followed by `fe:Z:` `ba:i:` `rt:i:` `cw:f:` tags for hits or an
/// `xx:i:` tag for fails. `pos` is 1-based as in SAM.
#[derive(Debug)]
pub struct TsvEmitter<W: Write> {
    hits: Option<W>,
    fails: Option<W>,
}

impl<W: Write> TsvEmitter<W> {
    pub fn new(hits: Option<W>, fails: Option<W>) -> Self {
        Self { hits, fails }
    }

    pub fn into_inner(self) -> (Option<W>, Option<W>) {
        (self.hits, self.fails)
    }
}

impl<W: Write> Emitter for TsvEmitter<W> {
    fn is_enabled(&self) -> bool {
        self.hits.is_some() || self.fails.is_some()
    }

    fn emit(
        &mut self,
        template: &Template,
        placement: &Placement,
        annotation: &Annotation,
    ) -> Result<()> {
        let (writer, tags) = match annotation {
            Annotation::Hit {
                feature,
                base_match_length,
                tail_length,
                weight,
            } => (
                &mut self.hits,
                format!("fe:Z:{feature}\tba:i:{base_match_length}\trt:i:{tail_length}\tcw:f:{weight}"),
            ),
            Annotation::Fail { reason } => (&mut self.fails, format!("xx:i:{}", reason.code())),
        };
        let Some(writer) = writer else {
            return Ok(());
        };

        for segment in placement.segments() {
            writeln!(
                writer,
                "{}\t{}\t{}\t{}\t{}",
                template.name(),
                segment.contig(),
                segment.start() + 1,
                segment.cigar(),
                tags
            )
            .wrap_err_with(|| format!("Failed to write annotation for {}", template.name()))?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        for writer in [&mut self.hits, &mut self.fails].into_iter().flatten() {
            writer.flush()?;
        }
        Ok(())
    }
}
