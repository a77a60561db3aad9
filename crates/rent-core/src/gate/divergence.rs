use std::collections::{BTreeMap, BTreeSet};

/// Suavizado aplicado a cada frecuencia para evitar `ln(0)` y divisiones
/// por cero en categorías ausentes de una de las dos tablas.
pub const SMOOTHING_EPSILON: f64 = 1e-10;

/// Frecuencia relativa de cada categoría.
pub fn category_frequencies(values: &[String]) -> BTreeMap<String, f64> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(v.trim().to_string()).or_default() += 1;
    }
    let n = values.len().max(1) as f64;
    counts.into_iter().map(|(k, c)| (k, c as f64 / n)).collect()
}

/// `KL(candidate ‖ reference)` sobre la unión de categorías, con
/// `SMOOTHING_EPSILON` sumado a ambas distribuciones.
pub fn kl_divergence(candidate: &BTreeMap<String, f64>, reference: &BTreeMap<String, f64>) -> f64 {
    let categories: BTreeSet<&String> = candidate.keys().chain(reference.keys()).collect();
    categories.into_iter()
              .map(|c| {
                  let p = candidate.get(c).copied().unwrap_or(0.0) + SMOOTHING_EPSILON;
                  let q = reference.get(c).copied().unwrap_or(0.0) + SMOOTHING_EPSILON;
                  p * (p / q).ln()
              })
              .sum()
}
