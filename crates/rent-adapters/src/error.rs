use std::path::PathBuf;

use thiserror::Error;

/// Errores de la lógica de steps. Cruzan la frontera del core como
/// `StepFailure` (boxed) sin perder el mensaje.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("cannot read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("column '{0}' is missing")]
    MissingColumn(String),
    #[error("input artifact '{0}' was not provided")]
    MissingInput(String),
    #[error("table has no usable rows: {0}")]
    Empty(String),
    #[error("step '{0}' is not executed by the local runner")]
    Unsupported(String),
}
