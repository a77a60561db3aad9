//! Validation Gate: batería fija de checks sobre una tabla.
//!
//! El veredicto es el AND de los checks configurados. Un check configurado
//! nunca se omite: si falta algo para evaluarlo (tabla de referencia,
//! columna) el gate falla cerrado con `ConfigError`.

mod checks;
mod divergence;
mod report;
mod table;

pub use checks::{DivergenceBound, GateThresholds, GeoBound, Interval, NumericRangeBound, RowCountBound};
pub use divergence::{category_frequencies, kl_divergence, SMOOTHING_EPSILON};
pub use report::{CheckOutcome, ValidationReport};
pub use table::Table;

use crate::errors::PipelineError;

/// Nombres estables de los checks (aparecen en reportes y errores).
pub mod check_names {
    pub const ROW_COUNT: &str = "row_count";
    pub const GEO_BOUNDS: &str = "geo_bounds";
    pub const KL_DIVERGENCE: &str = "kl_divergence";

    pub fn range(column: &str) -> String {
        format!("{column}_range")
    }
}

pub struct ValidationGate;

impl ValidationGate {
    /// Evalúa `thresholds` sobre `candidate`. `artifact` identifica la
    /// versión evaluada en el reporte (`clean_sample.csv:v3`).
    pub fn evaluate(artifact: &str,
                    candidate: &dyn Table,
                    reference: Option<&dyn Table>,
                    thresholds: &GateThresholds)
                    -> Result<ValidationReport, PipelineError> {
        let mut checks = Vec::new();
        if let Some(bound) = &thresholds.row_count {
            checks.push(bound.check(candidate));
        }
        for bound in &thresholds.numeric_ranges {
            checks.push(bound.check(candidate)?);
        }
        if let Some(bound) = &thresholds.geo {
            checks.push(bound.check(candidate)?);
        }
        if let Some(bound) = &thresholds.divergence {
            let reference = reference.ok_or_else(|| {
                                         PipelineError::config("data_check.reference",
                                                               "divergence check is configured but no reference table was provided")
                                     })?;
            checks.push(bound.check(candidate, reference)?);
        }
        Ok(ValidationReport { artifact: artifact.to_string(),
                              checks })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::BTreeMap;

    use super::Table;

    /// Tabla de columnas textuales para tests del gate.
    #[derive(Debug, Default)]
    pub struct MemTable {
        columns: BTreeMap<String, Vec<String>>,
        rows: usize,
    }

    impl MemTable {
        pub fn with(mut self, name: &str, values: &[&str]) -> Self {
            self.rows = values.len();
            self.columns.insert(name.to_string(), values.iter().map(|v| v.to_string()).collect());
            self
        }
    }

    impl Table for MemTable {
        fn row_count(&self) -> usize {
            self.rows
        }

        fn text_column(&self, name: &str) -> Option<Vec<String>> {
            self.columns.get(name).cloned()
        }
    }
}
