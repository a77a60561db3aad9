//! Fusión determinista de documentos JSON.
//!
//! Merge profundo: cuando ambos lados son objetos se fusionan clave a clave;
//! en cualquier otro caso `b` reemplaza a `a`.

use serde_json::Value;

pub fn merge_json(a: &Value, b: &Value) -> Value {
    match (a, b) {
        (Value::Object(ma), Value::Object(mb)) => {
            let mut out = ma.clone();
            for (k, v) in mb.iter() {
                let merged = match out.get(k) {
                    Some(existing) => merge_json(existing, v),
                    None => v.clone(),
                };
                out.insert(k.clone(), merged);
            }
            Value::Object(out)
        }
        (_, other) => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_sections_merge_and_scalars_override() {
        let base = json!({"etl": {"min_price": 10, "max_price": 350}, "main": {"steps": "all"}});
        let over = json!({"etl": {"min_price": 50}});
        let merged = merge_json(&base, &over);
        assert_eq!(merged, json!({"etl": {"min_price": 50, "max_price": 350}, "main": {"steps": "all"}}));
    }
}
