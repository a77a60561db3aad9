use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Conjunto plano clave→valor entregado a un step (strings, números,
/// booleanos o `null`). Las secciones anidadas se aplanan con `.` y las
/// listas de escalares se unen con `,`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamSet(BTreeMap<String, Value>);

impl ParamSet {
    pub fn from_value(value: &Value) -> Self {
        let mut out = BTreeMap::new();
        flatten("", value, &mut out);
        Self(out)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

fn flatten(prefix: &str, value: &Value, out: &mut BTreeMap<String, Value>) {
    let key = |k: &str| if prefix.is_empty() { k.to_string() } else { format!("{prefix}.{k}") };
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                flatten(&key(k), v, out);
            }
        }
        Value::Array(items) => {
            let joined: Vec<String> = items.iter()
                                           .map(|i| match i {
                                               Value::String(s) => s.clone(),
                                               other => other.to_string(),
                                           })
                                           .collect();
            out.insert(prefix.to_string(), Value::String(joined.join(",")));
        }
        scalar => {
            out.insert(prefix.to_string(), scalar.clone());
        }
    }
}
