//! Árbol de configuración resuelto.
//!
//! Se accede por key path con puntos (`etl.min_price`). Un valor `null` se
//! trata como ausente para los accesores `require_*`.

use serde_json::Value;

use crate::errors::PipelineError;
use crate::hashing::hash_value;

/// Configuración inmutable de una corrida. Construida una sola vez por
/// `ConfigResolver::resolve`; no expone mutadores.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigTree {
    root: Value,
    hash: String,
}

impl ConfigTree {
    pub(crate) fn new(root: Value) -> Self {
        let hash = hash_value(&root);
        Self { root, hash }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Hash blake3 del documento canónico (participa en fingerprints).
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Valor en `path`, incluyendo `null` explícitos.
    pub fn get(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(&self.root, |node, segment| node.as_object().and_then(|m| m.get(segment)))
    }

    /// `true` si `path` existe y no es `null`.
    pub fn contains(&self, path: &str) -> bool {
        self.present(path).is_some()
    }

    fn present(&self, path: &str) -> Option<&Value> {
        self.get(path).filter(|v| !v.is_null())
    }

    fn required(&self, path: &str) -> Result<&Value, PipelineError> {
        self.present(path)
            .ok_or_else(|| PipelineError::config(path, "required key is missing"))
    }

    pub fn require_f64(&self, path: &str) -> Result<f64, PipelineError> {
        let v = self.required(path)?;
        v.as_f64()
         .ok_or_else(|| PipelineError::config(path, format!("expected a number, found {v}")))
    }

    pub fn optional_f64(&self, path: &str) -> Result<Option<f64>, PipelineError> {
        if self.contains(path) { self.require_f64(path).map(Some) } else { Ok(None) }
    }

    pub fn require_u64(&self, path: &str) -> Result<u64, PipelineError> {
        let v = self.required(path)?;
        v.as_u64()
         .ok_or_else(|| PipelineError::config(path, format!("expected a non-negative integer, found {v}")))
    }

    pub fn optional_u64(&self, path: &str) -> Result<Option<u64>, PipelineError> {
        if self.contains(path) { self.require_u64(path).map(Some) } else { Ok(None) }
    }

    pub fn require_str(&self, path: &str) -> Result<&str, PipelineError> {
        let v = self.required(path)?;
        v.as_str()
         .ok_or_else(|| PipelineError::config(path, format!("expected a string, found {v}")))
    }

    pub fn optional_str(&self, path: &str) -> Result<Option<&str>, PipelineError> {
        if self.contains(path) { self.require_str(path).map(Some) } else { Ok(None) }
    }

    /// Lista de strings; acepta también un único string separado por comas.
    pub fn optional_str_list(&self, path: &str) -> Result<Option<Vec<String>>, PipelineError> {
        match self.present(path) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.split(',').map(|p| p.trim().to_string()).filter(|p| !p.is_empty()).collect())),
            Some(Value::Array(items)) => items.iter()
                                              .map(|i| {
                                                  i.as_str().map(str::to_string).ok_or_else(|| {
                                                      PipelineError::config(path, format!("expected a list of strings, found item {i}"))
                                                  })
                                              })
                                              .collect::<Result<Vec<_>, _>>()
                                              .map(Some),
            Some(other) => Err(PipelineError::config(path, format!("expected a list of strings, found {other}"))),
        }
    }

    pub fn require_str_list(&self, path: &str) -> Result<Vec<String>, PipelineError> {
        self.optional_str_list(path)?
            .ok_or_else(|| PipelineError::config(path, "required key is missing"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree() -> ConfigTree {
        ConfigTree::new(json!({
            "etl": {"min_price": 10, "max_price": 350.5, "sample": "sample1.csv"},
            "modeling": {"random_seed": 42, "stratify_by": null, "group_by": ["a", "b"]},
            "main": {"steps": "clean, validate"}
        }))
    }

    #[test]
    fn typed_lookups_by_dotted_path() {
        let t = tree();
        assert_eq!(t.require_f64("etl.min_price").unwrap(), 10.0);
        assert_eq!(t.require_f64("etl.max_price").unwrap(), 350.5);
        assert_eq!(t.require_u64("modeling.random_seed").unwrap(), 42);
        assert_eq!(t.require_str("etl.sample").unwrap(), "sample1.csv");
        assert_eq!(t.optional_str_list("modeling.group_by").unwrap(), Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(t.optional_str_list("main.steps").unwrap(),
                   Some(vec!["clean".to_string(), "validate".to_string()]));
    }

    #[test]
    fn missing_and_null_keys_are_config_errors() {
        let t = tree();
        let err = t.require_f64("data_check.kl_threshold").unwrap_err();
        assert!(matches!(err, PipelineError::Config { ref key, .. } if key == "data_check.kl_threshold"));
        assert!(t.require_str("modeling.stratify_by").is_err());
        assert_eq!(t.optional_str("modeling.stratify_by").unwrap(), None);
        assert!(t.require_str_list("modeling.stratify_by").is_err());
        assert!(t.get("modeling.stratify_by").is_some());
    }

    #[test]
    fn wrong_type_is_a_config_error() {
        let t = tree();
        assert!(matches!(t.require_f64("etl.sample"), Err(PipelineError::Config { .. })));
        assert!(matches!(t.optional_u64("etl.max_price"), Err(PipelineError::Config { .. })));
    }

    #[test]
    fn hash_ignores_key_order() {
        let a = ConfigTree::new(json!({"a": 1, "b": {"c": 2, "d": 3}}));
        let b = ConfigTree::new(json!({"b": {"d": 3, "c": 2}, "a": 1}));
        assert_eq!(a.hash(), b.hash());
    }
}
