use rent_core::artifact::StoreError;
use rent_core::{PipelineError, StepKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// Configuración o uso inválido detectado antes de correr ningún step.
    #[error("{0}")]
    Usage(#[from] PipelineError),
    #[error("step '{step}' failed: {cause}")]
    StepFailed { step: StepKind, cause: String },
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Fallo de step: 1; configuración o uso: 2.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 2,
            Self::StepFailed { .. } | Self::Store(_) | Self::Io(_) => 1,
        }
    }

    pub fn step_failed(step: StepKind, cause: &PipelineError) -> Self {
        // StepExecution ya nombra el step; se reporta sólo la causa
        let cause = match cause {
            PipelineError::StepExecution { source, .. } => source.to_string(),
            other => other.to_string(),
        };
        Self::StepFailed { step, cause }
    }
}
