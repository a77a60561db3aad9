//! rent-adapters: lógica concreta de los steps detrás de `StepRunner`.
//!
//! Este crate provee:
//! - `Frame`: tabla CSV con cabeceras ordenadas; implementa `rent_core::Table`
//!   para el Validation Gate.
//! - Transformaciones de cada step (`steps::*`): descarga local, limpieza,
//!   split estratificado, baseline de medias por grupo y evaluación.
//! - `LocalStepRunner`: despacha un `StepTask` a la transformación que
//!   corresponde según su `StepSpec`.
//!
//! El core no conoce ninguna de estas piezas: sólo parámetros planos, rutas
//! locales y outputs con nombre.

pub mod error;
pub mod frame;
pub mod model;
pub mod runner;
pub mod steps;

pub use error::AdapterError;
pub use frame::Frame;
pub use model::{GroupedMeanModel, RegressionMetrics};
pub use runner::LocalStepRunner;
