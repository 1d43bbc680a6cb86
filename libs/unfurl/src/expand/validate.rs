use serde_json::Value;

use super::errors::ValidationError;
use super::paths::{ExpandPath, ExpandPaths};
use crate::config::ExpandConfig;
use crate::resource::json_type;

/// Validate the raw `expand` parameter and normalize it into an [`ExpandPaths`] set.
///
/// A missing parameter (or an explicit `null`) is the same as an empty list.
/// Otherwise the parameter must be an array of dotted paths, where every segment
/// is an identifier (`[A-Za-z_][A-Za-z0-9_]*`), with no more elements than
/// [`ExpandConfig`] allows.
/// Duplicate paths are collapsed.
///
/// It only checks the syntax: whether the paths match the declared associations
/// is discovered later, while decorating.
pub fn validate(
    raw: Option<&Value>,
    config: &ExpandConfig,
) -> Result<ExpandPaths, ValidationError> {
    let elements = match raw {
        None | Some(Value::Null) => return Ok(ExpandPaths::new()),
        Some(Value::Array(elements)) => elements,
        Some(other) => {
            return Err(ValidationError::NotAnArray {
                found: json_type(other),
            });
        }
    };
    if let Some(limit) = config.effective_limit() {
        if elements.len() > limit {
            return Err(ValidationError::TooManyPaths {
                limit,
                actual: elements.len(),
            });
        }
    }

    let mut paths = Vec::with_capacity(elements.len());
    for (index, element) in elements.iter().enumerate() {
        let path = match element {
            Value::String(raw) => ExpandPath::parse(raw),
            _ => None,
        };
        let Some(path) = path else {
            return Err(ValidationError::MalformedPath {
                index,
                value: element.to_string(),
            });
        };
        paths.push(path);
    }
    Ok(paths.into_iter().collect())
}

/// Extract the raw `expand` parameter from a URL query string.
///
/// `expand[]=a&expand[]=b` becomes an array, while a bare `expand=a` is kept as a string
/// and will therefore be rejected by [`validate`].
/// If both forms are used, the last one wins.
/// It returns `None` if the parameter is absent.
pub fn raw_expand_from_query(query: &str) -> Option<Value> {
    let mut raw: Option<Value> = None;
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "expand[]" => {
                let value = Value::String(value.into_owned());
                match &mut raw {
                    Some(Value::Array(items)) => items.push(value),
                    _ => raw = Some(Value::Array(vec![value])),
                }
            }
            "expand" => raw = Some(Value::String(value.into_owned())),
            _ => {}
        }
    }
    raw
}

/// `true` if `s` matches `[A-Za-z_][A-Za-z0-9_]*`.
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
