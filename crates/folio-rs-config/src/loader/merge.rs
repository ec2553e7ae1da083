//! JSON merge helpers for layered configuration.

use serde_json::{Map, Value};

/// Merge one layer into the accumulated config.
///
/// Objects merge recursively and scalars or arrays from the overlay replace
/// the base, except the top-level `documents` list, whose entries are matched
/// by `name` and merged individually.
pub(super) fn merge_layer(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match (key.as_str(), base_map.get_mut(key), value) {
                    ("documents", Some(Value::Array(existing)), Value::Array(entries)) => {
                        merge_documents(existing, entries);
                    }
                    (_, Some(existing), _) => merge_json_values(existing, value),
                    (_, None, _) => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base_slot, overlay_value) => {
            *base_slot = overlay_value.clone();
        }
    }
}

/// Merge overlay values into the base, recursively overriding objects.
pub(super) fn merge_json_values(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            merge_maps(base_map, overlay_map);
        }
        (base_slot, overlay_value) => {
            *base_slot = overlay_value.clone();
        }
    }
}

fn merge_maps(base_map: &mut Map<String, Value>, overlay_map: &Map<String, Value>) {
    for (key, value) in overlay_map {
        match base_map.get_mut(key) {
            Some(existing) => merge_json_values(existing, value),
            None => {
                base_map.insert(key.clone(), value.clone());
            }
        }
    }
}

fn merge_documents(existing: &mut Vec<Value>, entries: &[Value]) {
    for entry in entries {
        let name = entry.get("name").and_then(Value::as_str);
        let slot = name.and_then(|name| {
            existing
                .iter_mut()
                .find(|candidate| candidate.get("name").and_then(Value::as_str) == Some(name))
        });
        match slot {
            Some(slot) => merge_json_values(slot, entry),
            None => existing.push(entry.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::merge_layer;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn documents_merge_by_name() {
        let mut base = json!({
            "endpoint": { "base_url": "http://a", "timeout_secs": 5 },
            "documents": [
                { "name": "hero", "api_path": "/a/hero", "array_fallback": ["x"] },
                { "name": "promo", "api_path": "/a/promo" },
            ],
        });
        let overlay = json!({
            "endpoint": { "base_url": "http://b" },
            "documents": [
                { "name": "hero", "array_fallback": ["y"] },
                { "name": "team", "api_path": "/b/team" },
            ],
        });

        merge_layer(&mut base, &overlay);

        assert_eq!(
            base,
            json!({
                "endpoint": { "base_url": "http://b", "timeout_secs": 5 },
                "documents": [
                    { "name": "hero", "api_path": "/a/hero", "array_fallback": ["y"] },
                    { "name": "promo", "api_path": "/a/promo" },
                    { "name": "team", "api_path": "/b/team" },
                ],
            })
        );
    }
}
