//! Errores del orquestador.
//!
//! Ninguna variante es reintentable: todo error termina la corrida actual y
//! debe corregirse y relanzarse por el operador.

use thiserror::Error;

use crate::step::StepKind;

/// Error opaco devuelto por la lógica propia de un step (transformación
/// externa). El invoker lo envuelve en `PipelineError::StepExecution` sin
/// enmascararlo.
pub type StepFailure = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Parámetro requerido ausente o con tipo inválido.
    #[error("configuration error at '{key}': {reason}")]
    Config { key: String, reason: String },
    /// Referencia de artifact sin separador `name:selector`.
    #[error("malformed artifact reference '{reference}': expected 'name:selector'")]
    MalformedReference { reference: String },
    /// Nombre, versión o alias inexistente en el store.
    #[error("artifact not found: {reference}")]
    ArtifactNotFound { reference: String },
    /// La lógica del step falló; `source` conserva la causa original.
    #[error("step '{step}' failed: {source}")]
    StepExecution {
        step: StepKind,
        #[source]
        source: StepFailure,
    },
    /// Uno o más checks del gate fallaron con política `enforce`.
    #[error("validation failed for '{artifact}': failing checks [{}]", failed.join(", "))]
    ValidationFailure { artifact: String, failed: Vec<String> },
    #[error("artifact store error: {0}")]
    Store(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn config(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Config { key: key.into(),
                       reason: reason.into() }
    }

    pub fn step(step: StepKind, source: impl Into<StepFailure>) -> Self {
        Self::StepExecution { step,
                              source: source.into() }
    }

    /// Etiqueta corta y estable del tipo de error (usada en eventos).
    pub fn label(&self) -> &'static str {
        match self {
            Self::Config { .. } => "ConfigError",
            Self::MalformedReference { .. } => "MalformedReferenceError",
            Self::ArtifactNotFound { .. } => "ArtifactNotFoundError",
            Self::StepExecution { .. } => "StepExecutionError",
            Self::ValidationFailure { .. } => "ValidationFailure",
            Self::Store(_) => "StoreError",
            Self::Io(_) => "IoError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_execution_keeps_step_name_and_cause() {
        let err = PipelineError::step(StepKind::Clean, "price column missing");
        assert_eq!(err.to_string(), "step 'clean' failed: price column missing");
        let source = std::error::Error::source(&err).expect("cause is preserved");
        assert_eq!(source.to_string(), "price column missing");
    }

    #[test]
    fn validation_failure_lists_checks() {
        let err = PipelineError::ValidationFailure { artifact: "clean_sample.csv:v2".into(),
                                                     failed: vec!["row_count".into(), "price_range".into()] };
        assert_eq!(err.to_string(),
                   "validation failed for 'clean_sample.csv:v2': failing checks [row_count, price_range]");
        assert_eq!(err.label(), "ValidationFailure");
    }
}
