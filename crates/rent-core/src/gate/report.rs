use serde::{Deserialize, Serialize};

/// Resultado de un check individual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub name: String,
    pub passed: bool,
    /// Valor observado (filas, filas marcadas, divergencia).
    pub metric: Option<f64>,
    pub detail: String,
}

/// Reporte inmutable de una evaluación del gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Versión concreta evaluada (`clean_sample.csv:v3`).
    pub artifact: String,
    pub checks: Vec<CheckOutcome>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    pub fn failed_checks(&self) -> Vec<String> {
        self.checks.iter().filter(|c| !c.passed).map(|c| c.name.clone()).collect()
    }

    pub fn check(&self, name: &str) -> Option<&CheckOutcome> {
        self.checks.iter().find(|c| c.name == name)
    }
}
