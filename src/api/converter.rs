use std::sync::Arc;

use tracing::warn;

use kotori_core::conversion::{
    Candidate, ConversionEngine, ConversionError, ConversionResults, ConvertOptions,
};

use super::types::{KotoriCandidate, KotoriConversionResults, KotoriConvertOptions, KotoriError};

/// Conversion engine implemented on the Swift side.
#[uniffi::export(with_foreign)]
pub trait KotoriConverter: Send + Sync {
    fn request_candidates(
        &self,
        target: String,
        options: KotoriConvertOptions,
    ) -> Result<KotoriConversionResults, KotoriError>;

    fn complete_candidate(&self, candidate: KotoriCandidate);

    fn reset_session(&self);
}

/// Adapts a foreign converter to the session's engine contract.
pub(super) struct ForeignEngine {
    inner: Arc<dyn KotoriConverter>,
}

impl ForeignEngine {
    pub(super) fn new(inner: Arc<dyn KotoriConverter>) -> Self {
        Self { inner }
    }
}

impl ConversionEngine for ForeignEngine {
    fn request_candidates(
        &self,
        target: &str,
        options: &ConvertOptions,
    ) -> Result<ConversionResults, ConversionError> {
        if target.is_empty() {
            return Err(ConversionError::EmptyInput);
        }
        self.inner
            .request_candidates(target.to_string(), options.into())
            .map(ConversionResults::from)
            .map_err(|e| {
                warn!("foreign converter failed: {e}");
                ConversionError::from(e)
            })
    }

    fn complete_candidate(&self, candidate: &Candidate) {
        self.inner.complete_candidate(candidate.into());
    }

    fn reset_session(&self) {
        self.inner.reset_session();
    }
}
