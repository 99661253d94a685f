//! Test doubles shared by unit and behaviour tests.

use std::sync::{Arc, Mutex, PoisonError};

use crate::diagnostics::{Diagnostic, Reporter};

/// Reporter recording every diagnostic for later assertions.
///
/// Clones share the same record, so a test can hand one clone to the engine
/// and inspect another.
#[derive(Clone, Debug, Default)]
pub struct RecordingReporter {
    diagnostics: Arc<Mutex<Vec<Diagnostic>>>,
}

impl RecordingReporter {
    /// Diagnostics recorded so far, in emission order.
    #[must_use]
    pub fn recorded(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of diagnostics recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, diagnostic: &Diagnostic) {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic.clone());
    }
}
