use readthru_core_rs::alignment::Template;

use crate::classify::{Call, Classifier, Scratch};

/// Thread-local classification state.
#[derive(Debug, Default)]
pub struct Worker {
    scratch: Scratch,
    templates: usize,
}

impl Worker {
    pub fn classify(&mut self, classifier: &Classifier, template: &Template) -> Vec<Call> {
        self.templates += 1;
        classifier.classify_with(template, &mut self.scratch)
    }

    /// Number of templates classified by this worker since the last reset.
    pub fn templates(&self) -> usize {
        self.templates
    }

    pub fn reset(&mut self) {
        self.templates = 0;
    }
}
