//! Transformaciones concretas de cada step.
//!
//! Cada función recibe sus parámetros tipados y el `StepTask`, escribe sus
//! outputs en `task.work_dir` y devuelve un `StepOutput` con los ficheros
//! por nombre declarado.

pub mod clean;
pub mod download;
pub mod evaluate;
pub mod split;
pub mod train;

use rent_core::artifact::ArtifactHandle;
use rent_core::StepTask;

use crate::error::AdapterError;

pub(crate) fn input<'a>(task: &'a StepTask<'_>, name: &str) -> Result<&'a ArtifactHandle, AdapterError> {
    task.input(name).ok_or_else(|| AdapterError::MissingInput(name.to_string()))
}
