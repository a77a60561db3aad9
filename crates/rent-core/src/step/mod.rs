//! Steps del pipeline.
//!
//! - `StepKind`: enumeración cerrada de los steps y su orden canónico.
//! - `StepSpec`: un step listo para invocar, con sus parámetros tipados ya
//!   resueltos desde la configuración.
//! - `StepRunner`: frontera hacia la lógica externa de cada step.
//! - `StepInvoker`: resuelve inputs, ejecuta, empaqueta y registra outputs.

mod invoker;
mod kind;
mod params;
mod runner;
pub mod spec;
mod status;

pub use invoker::{StepInvoker, StepOutcome};
pub use kind::{names, OutputDecl, StepKind};
pub use params::ParamSet;
pub use runner::{StepOutput, StepRunner, StepTask};
pub use spec::StepSpec;
pub use status::StepStatus;
