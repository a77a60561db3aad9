use std::path::Path;

use serde_json::{Map, Value};

use super::{merge_json, ConfigTree};
use crate::constants::ENV_OVERRIDE_PREFIX;
use crate::errors::PipelineError;

/// Combina un documento base con overrides en orden de aplicación.
///
/// El orden en que se registran los overrides define la precedencia; la
/// convención del binario es base < entorno < línea de comandos.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    base: Value,
    overrides: Vec<(String, Value)>,
}

impl ConfigResolver {
    pub fn new(base: Value) -> Self {
        Self { base,
               overrides: Vec::new() }
    }

    pub fn from_json_str(document: &str) -> Result<Self, PipelineError> {
        let base: Value = serde_json::from_str(document)
            .map_err(|e| PipelineError::config("<document>", format!("invalid configuration document: {e}")))?;
        Ok(Self::new(base))
    }

    pub fn from_file(path: &Path) -> Result<Self, PipelineError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw).map_err(|e| match e {
                                     PipelineError::Config { reason, .. } => PipelineError::config(path.display().to_string(), reason),
                                     other => other,
                                 })
    }

    /// Registra un override puntual sobre `path` (key path con puntos).
    pub fn with_override(mut self, path: impl Into<String>, value: Value) -> Self {
        self.overrides.push((path.into(), value));
        self
    }

    /// Registra un override en forma `dotted.key=value`.
    pub fn with_assignment(self, assignment: &str) -> Result<Self, PipelineError> {
        let (path, raw) = assignment.split_once('=')
                                    .ok_or_else(|| PipelineError::config(assignment, "override must have the form key.path=value"))?;
        Ok(self.with_override(path.trim(), parse_scalar(raw.trim())))
    }

    /// Registra los overrides de entorno con prefijo `RENTFLOW__`; los
    /// segmentos se separan con `__` y se pasan a minúsculas.
    pub fn with_env_overrides<I>(mut self, vars: I) -> Self
        where I: IntoIterator<Item = (String, String)>
    {
        let mut found: Vec<(String, Value)> =
            vars.into_iter()
                .filter_map(|(k, v)| {
                    k.strip_prefix(ENV_OVERRIDE_PREFIX)
                     .map(|rest| (rest.split("__").map(str::to_lowercase).collect::<Vec<_>>().join("."), parse_scalar(&v)))
                })
                .collect();
        // el entorno no tiene orden estable
        found.sort_by(|a, b| a.0.cmp(&b.0));
        self.overrides.extend(found);
        self
    }

    pub fn resolve(&self) -> Result<ConfigTree, PipelineError> {
        if !self.base.is_object() {
            return Err(PipelineError::config("<document>", "configuration root must be an object"));
        }
        let mut root = self.base.clone();
        for (path, value) in &self.overrides {
            apply_override(&mut root, path, value)?;
        }
        Ok(ConfigTree::new(root))
    }
}

fn apply_override(root: &mut Value, path: &str, value: &Value) -> Result<(), PipelineError> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(PipelineError::config(path, "override key has an empty segment"));
    }
    let (leaf, parents) = segments.split_last()
                                  .ok_or_else(|| PipelineError::config(path, "override key is empty"))?;
    let mut node = root;
    for (i, segment) in parents.iter().enumerate() {
        let map = node.as_object_mut().ok_or_else(|| {
                                          PipelineError::config(path, format!("'{}' is not a section", segments[..i].join(".")))
                                      })?;
        node = map.entry(segment.to_string()).or_insert_with(|| Value::Object(Map::new()));
    }
    let map = node.as_object_mut()
                  .ok_or_else(|| PipelineError::config(path, format!("'{}' is not a section", parents.join("."))))?;
    let merged = match map.get(*leaf) {
        Some(existing) => merge_json(existing, value),
        None => value.clone(),
    };
    map.insert(leaf.to_string(), merged);
    Ok(())
}

/// Interpreta un valor textual como escalar JSON (`50`, `true`, `null`,
/// `"x"`); si no es JSON válido se toma como string literal.
pub fn parse_scalar(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
