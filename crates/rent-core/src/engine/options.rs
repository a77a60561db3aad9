use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::PipelineError;

/// Qué hacer con un reporte de validación que no pasa.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatePolicy {
    /// Se registra y se emite un warning; la corrida continúa. Es la política
    /// cuando nada la configura.
    #[default]
    Record,
    /// La corrida termina con `ValidationFailure`.
    Enforce,
}

impl GatePolicy {
    pub const CONFIG_KEY: &'static str = "main.gate_policy";
}

impl FromStr for GatePolicy {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "record" => Ok(Self::Record),
            "enforce" => Ok(Self::Enforce),
            other => Err(PipelineError::config(Self::CONFIG_KEY, format!("expected 'record' or 'enforce', found '{other}'"))),
        }
    }
}

impl fmt::Display for GatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
                        Self::Record => "record",
                        Self::Enforce => "enforce",
                    })
    }
}

/// Opciones del orquestador que no viven en la configuración del pipeline.
/// Un valor presente aquí gana sobre la clave equivalente de configuración.
#[derive(Debug, Clone, Default)]
pub struct OrchestratorOptions {
    pub gate_policy: Option<GatePolicy>,
    /// Raíz para los scratch de cada step (por defecto, `main.scratch_dir`
    /// o el temporal del sistema).
    pub scratch_root: Option<PathBuf>,
}
