use serde_json::{Map, Value};

use crate::error::ParseError;

/// Resolve a JSON Reference like `#/definitions/Pet` from the document root.
///
/// Only local references (`#` or `#/...`) are supported. Returns `None` for
/// external refs and for pointers that lead nowhere.
pub fn resolve_ref<'a>(root: &'a Value, ref_path: &str) -> Option<&'a Value> {
    if ref_path == "#" {
        return Some(root);
    }
    let pointer = ref_path.strip_prefix("#/")?;
    let mut current = root;
    for segment in pointer.split('/') {
        let unescaped = segment.replace("~1", "/").replace("~0", "~");
        current = match current {
            Value::Array(items) => items.get(unescaped.parse::<usize>().ok()?)?,
            other => other.get(&unescaped)?,
        };
    }
    Some(current)
}

/// Inline every local `$ref` in the document.
///
/// A reference that points back into its own resolution chain is left in
/// place, so recursive definitions survive as `{"$ref": "#/definitions/..."}`
/// pointers. Vendor extensions (`x-*`) are copied untouched.
pub fn dereference(document: &Value) -> Result<Value, ParseError> {
    let mut chain = Vec::new();
    resolve_refs(document, document, &mut chain)
}

fn resolve_refs(value: &Value, root: &Value, chain: &mut Vec<String>) -> Result<Value, ParseError> {
    match value {
        Value::Object(obj) => {
            if let Some(ref_str) = obj.get("$ref").and_then(|v| v.as_str()) {
                if chain.iter().any(|seen| seen == ref_str) {
                    return Ok(Value::Object(obj.clone()));
                }
                if !ref_str.starts_with('#') {
                    return Err(ParseError::UnresolvedRef(format!(
                        "{} (external references are not supported)",
                        ref_str
                    )));
                }
                let target = resolve_ref(root, ref_str)
                    .ok_or_else(|| ParseError::UnresolvedRef(ref_str.to_string()))?;
                chain.push(ref_str.to_string());
                let resolved = resolve_refs(target, root, chain);
                chain.pop();
                resolved
            } else {
                let mut new_obj = Map::with_capacity(obj.len());
                for (key, val) in obj {
                    let resolved = if key.starts_with("x-") {
                        val.clone()
                    } else {
                        resolve_refs(val, root, chain)?
                    };
                    new_obj.insert(key.clone(), resolved);
                }
                Ok(Value::Object(new_obj))
            }
        }
        Value::Array(arr) => {
            let items: Result<Vec<_>, _> = arr.iter().map(|v| resolve_refs(v, root, chain)).collect();
            Ok(Value::Array(items?))
        }
        other => Ok(other.clone()),
    }
}

/// Whether any `$ref` pointer remains anywhere inside `value`.
pub fn contains_ref(value: &Value) -> bool {
    match value {
        Value::Object(obj) => obj.contains_key("$ref") || obj.values().any(contains_ref),
        Value::Array(items) => items.iter().any(contains_ref),
        _ => false,
    }
}
