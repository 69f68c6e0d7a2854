use super::{Cx, Direction, Outcome, SerializerHost};
use crate::types::TypeRef;
use crate::value::{Map, Value};
use crate::wire;

/// Elements convert in ascending index order; the first failure stops the
/// walk and is reported under `Index i`.
pub(super) fn array<H: SerializerHost + ?Sized>(
    cx: &Cx<'_, H>,
    value: &Value,
    element: &TypeRef,
    element_optional: bool,
) -> Outcome {
    let Value::Array(items) = value else {
        return Err(cx.reject(value, "Value is not an array"));
    };
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let converted = cx
            .convert(item, element_optional, element)
            .map_err(|f| cx.nest(format!("Index {i}"), value, f))?;
        out.push(converted);
    }
    Ok(Value::Array(out))
}

/// Entries convert in insertion order; the first failure is reported under
/// `Key '<k>'`. A `$jsii.map` envelope is accepted when deserializing.
pub(super) fn map<H: SerializerHost + ?Sized>(
    cx: &Cx<'_, H>,
    value: &Value,
    element: &TypeRef,
    element_optional: bool,
) -> Outcome {
    let source = match cx.direction {
        Direction::Deserialize => wire::map_envelope(value).unwrap_or(value),
        Direction::Serialize => value,
    };
    let entries = match source {
        Value::Object(entries) => entries,
        Value::Array(_) => return Err(cx.reject(value, "Value is an array")),
        _ => return Err(cx.reject(value, "Value is not an object")),
    };
    let mut out = Map::with_capacity(entries.len());
    for (key, item) in entries {
        let converted = cx
            .convert(item, element_optional, element)
            .map_err(|f| cx.nest(format!("Key '{key}'"), value, f))?;
        out.insert(key.clone(), converted);
    }
    Ok(Value::Object(out))
}
