use serde::{Deserialize, Serialize};

use super::divergence::{category_frequencies, kl_divergence};
use super::{check_names, CheckOutcome, Table};
use crate::errors::PipelineError;

/// Intervalo cerrado `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowCountBound {
    pub min_rows: u64,
    pub max_rows: u64,
}

impl RowCountBound {
    pub fn new(min_rows: u64, max_rows: u64) -> Self {
        Self { min_rows, max_rows }
    }

    pub fn check(&self, table: &dyn Table) -> CheckOutcome {
        let rows = table.row_count() as u64;
        CheckOutcome { name: check_names::ROW_COUNT.to_string(),
                       passed: self.min_rows <= rows && rows <= self.max_rows,
                       metric: Some(rows as f64),
                       detail: format!("{rows} rows, expected [{}, {}]", self.min_rows, self.max_rows) }
    }
}

/// Todos los valores de `column` deben caer en `range`; un valor no numérico
/// cuenta como fuera de rango.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericRangeBound {
    pub column: String,
    pub range: Interval,
}

impl NumericRangeBound {
    pub fn new(column: impl Into<String>, min: f64, max: f64) -> Self {
        Self { column: column.into(),
               range: Interval::new(min, max) }
    }

    pub fn check(&self, table: &dyn Table) -> Result<CheckOutcome, PipelineError> {
        let values = numeric(table, &self.column)?;
        let flagged = values.iter().filter(|v| !v.is_some_and(|x| self.range.contains(x))).count();
        Ok(CheckOutcome { name: check_names::range(&self.column),
                          passed: flagged == 0,
                          metric: Some(flagged as f64),
                          detail: format!("{flagged} values of '{}' outside [{}, {}]",
                                          self.column, self.range.min, self.range.max) })
    }
}

/// Caja geográfica. Una fila pasa sólo si ambas coordenadas están dentro.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBound {
    pub longitude: Interval,
    pub latitude: Interval,
}

impl GeoBound {
    pub const LONGITUDE_COLUMN: &'static str = "longitude";
    pub const LATITUDE_COLUMN: &'static str = "latitude";

    pub fn new(longitude: Interval, latitude: Interval) -> Self {
        Self { longitude, latitude }
    }

    pub fn row_passes(&self, longitude: Option<f64>, latitude: Option<f64>) -> bool {
        matches!((longitude, latitude), (Some(lon), Some(lat)) if self.longitude.contains(lon) && self.latitude.contains(lat))
    }

    pub fn check(&self, table: &dyn Table) -> Result<CheckOutcome, PipelineError> {
        let lon = numeric(table, Self::LONGITUDE_COLUMN)?;
        let lat = numeric(table, Self::LATITUDE_COLUMN)?;
        let flagged = lon.iter().zip(&lat).filter(|(x, y)| !self.row_passes(**x, **y)).count();
        Ok(CheckOutcome { name: check_names::GEO_BOUNDS.to_string(),
                          passed: flagged == 0,
                          metric: Some(flagged as f64),
                          detail: format!("{flagged} rows outside the geographic bounds") })
    }
}

/// Divergencia KL de las frecuencias de `column` respecto de la referencia.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivergenceBound {
    pub column: String,
    pub threshold: f64,
}

impl DivergenceBound {
    pub fn new(column: impl Into<String>, threshold: f64) -> Self {
        Self { column: column.into(),
               threshold }
    }

    pub fn check(&self, candidate: &dyn Table, reference: &dyn Table) -> Result<CheckOutcome, PipelineError> {
        let cand = text(candidate, &self.column, "candidate")?;
        let refr = text(reference, &self.column, "reference")?;
        let kl = kl_divergence(&category_frequencies(&cand), &category_frequencies(&refr));
        Ok(CheckOutcome { name: check_names::KL_DIVERGENCE.to_string(),
                          passed: kl <= self.threshold,
                          metric: Some(kl),
                          detail: format!("KL divergence of '{}' is {kl:.6}, threshold {}", self.column, self.threshold) })
    }
}

/// Checks configurados para una evaluación. `None`/vacío = no configurado.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GateThresholds {
    pub row_count: Option<RowCountBound>,
    pub numeric_ranges: Vec<NumericRangeBound>,
    pub geo: Option<GeoBound>,
    pub divergence: Option<DivergenceBound>,
}

fn numeric(table: &dyn Table, column: &str) -> Result<Vec<Option<f64>>, PipelineError> {
    table.numeric_column(column)
         .ok_or_else(|| PipelineError::config(column, "column required by a validation check is missing from the table"))
}

fn text(table: &dyn Table, column: &str, role: &str) -> Result<Vec<String>, PipelineError> {
    table.text_column(column)
         .ok_or_else(|| PipelineError::config(column, format!("divergence column is missing from the {role} table")))
}
