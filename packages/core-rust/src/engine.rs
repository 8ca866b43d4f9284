//! The engine facade: batch model learning and request validation.
//!
//! This is the only surface the network layer calls. Both halves of the
//! engine's state — the validator registry and the model store — are
//! injected at construction, so tests and deployments control them
//! explicitly instead of reaching for process globals.

use crate::schema::{compile_model, CompileError};
use crate::store::ModelStore;
use crate::types::{RouteKey, Value};
use crate::validate::{validate_request, MalformedRequest, Verdict};
use crate::validators::ValidatorRegistry;

/// Request-shape learning and validation engine.
///
/// All methods take `&self`; the store is internally synchronized, so one
/// engine is shared behind an `Arc` across concurrent callers.
#[derive(Debug, Default)]
pub struct Engine {
    registry: ValidatorRegistry,
    store: ModelStore,
}

impl Engine {
    /// Engine with the built-in type tags and an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine over an explicit registry and store.
    ///
    /// The seam for custom type tags and for tests that inspect the store
    /// directly.
    #[must_use]
    pub fn with_parts(registry: ValidatorRegistry, store: ModelStore) -> Self {
        Self { registry, store }
    }

    /// Read access to the model store.
    #[must_use]
    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    /// Compiles and installs a batch of model descriptions.
    ///
    /// Items are processed independently: a failing item is collected into
    /// the report and the rest of the batch still learns. A rejected item
    /// leaves any previously learned model for its key untouched, since
    /// compilation completes before the store is touched.
    pub fn submit_models(&self, descriptions: &[Value]) -> SubmitReport {
        let mut report = SubmitReport::default();
        for (index, description) in descriptions.iter().enumerate() {
            match compile_model(&self.registry, description) {
                Ok((key, model)) => {
                    tracing::debug!(%key, "learned model");
                    self.store.put(key.clone(), model);
                    report.learned.push(key);
                }
                Err(error) => {
                    tracing::debug!(index, %error, "model rejected");
                    report.rejected.push(RejectedModel { index, error });
                }
            }
        }
        report
    }

    /// Validates a request description against the learned model for
    /// (path, method).
    ///
    /// # Errors
    ///
    /// [`ValidateError::NotFound`] when no model was learned for the key;
    /// [`ValidateError::MalformedRequest`] when the description cannot be
    /// walked.
    pub fn validate_request(
        &self,
        path: &str,
        method: &str,
        description: &Value,
    ) -> Result<Verdict, ValidateError> {
        let model = self
            .store
            .get(path, method)
            .ok_or_else(|| ValidateError::NotFound {
                path: path.to_string(),
                method: method.to_string(),
            })?;
        Ok(validate_request(description, &model)?)
    }
}

/// Outcome of one batch submission.
#[derive(Debug, Default)]
pub struct SubmitReport {
    /// Keys that now resolve to freshly compiled models, in batch order.
    pub learned: Vec<RouteKey>,
    /// Items that were rejected.
    pub rejected: Vec<RejectedModel>,
}

/// One rejected batch item.
#[derive(Debug)]
pub struct RejectedModel {
    /// Position of the item in the submitted batch.
    pub index: usize,
    /// Why compilation failed.
    pub error: CompileError,
}

/// Why a validation call failed before producing a verdict.
#[derive(Debug, thiserror::Error)]
pub enum ValidateError {
    /// No model has been learned for the requested key.
    #[error("no model learned for {method} {path}")]
    NotFound {
        /// Path of the lookup that missed.
        path: String,
        /// Method of the lookup that missed.
        method: String,
    },
    /// The request description cannot be walked.
    #[error(transparent)]
    MalformedRequest(#[from] MalformedRequest),
}
