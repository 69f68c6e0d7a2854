use std::collections::HashSet;

use indexmap::IndexMap;

use super::{reference, Cx, Direction, Outcome, SerializerHost};
use crate::error::ResolveError;
use crate::types::{InterfaceType, NamedType, Property};
use crate::value::{Map, Value};
use crate::wire;

pub(super) fn structure<H: SerializerHost + ?Sized>(cx: &Cx<'_, H>, value: &Value, iface: &InterfaceType) -> Outcome {
    match cx.direction {
        Direction::Serialize => serialize(cx, value, iface),
        Direction::Deserialize => deserialize(cx, value, iface),
    }
}

fn serialize<H: SerializerHost + ?Sized>(cx: &Cx<'_, H>, value: &Value, iface: &InterfaceType) -> Outcome {
    let entries = match value {
        Value::Object(entries) => entries,
        Value::Array(_) => return Err(cx.reject(value, "Value is an array")),
        _ => return Err(cx.reject(value, "Value is not an object")),
    };
    let declared = declared_properties(cx.host, iface)?;
    convert_properties(cx, value, entries, &declared)
}

fn deserialize<H: SerializerHost + ?Sized>(cx: &Cx<'_, H>, value: &Value, iface: &InterfaceType) -> Outcome {
    // passed by reference rather than by value
    if wire::reference(value).is_some() {
        return reference::deserialize(cx, value);
    }
    let data = wire::struct_envelope(value).map_or(value, |(_, data)| data);
    let entries = match data {
        Value::Object(entries) => entries,
        Value::Array(_) => {
            return Err(cx.reject(value, "Value is an array (varargs may have been incorrectly supplied)"));
        }
        _ => return Err(cx.reject(value, "Value is not an object")),
    };
    let declared = declared_properties(cx.host, iface)?;
    let missing: Vec<String> = declared
        .iter()
        .filter(|p| !p.optional && entries.get(&p.name).is_none_or(Value::is_absent))
        .map(|p| format!("'{}'", p.name))
        .collect();
    if !missing.is_empty() {
        return Err(cx.reject(value, format!("Missing required properties for {}: {}", iface.fqn, missing.join(", "))));
    }
    convert_properties(cx, value, entries, &declared)
}

/// Declared order; undeclared keys are dropped and absent results omitted.
fn convert_properties<H: SerializerHost + ?Sized>(
    cx: &Cx<'_, H>,
    value: &Value,
    entries: &Map,
    declared: &[&Property],
) -> Outcome {
    let undefined = Value::Undefined;
    let mut out = Map::new();
    for prop in declared {
        let item = entries.get(&prop.name).unwrap_or(&undefined);
        let converted = cx
            .convert(item, prop.optional, &prop.ty)
            .map_err(|f| cx.nest(format!("Key '{}'", prop.name), value, f))?;
        if !converted.is_absent() {
            out.insert(prop.name.clone(), converted);
        }
    }
    Ok(Value::Object(out))
}

/// Own properties plus those inherited from base interfaces. Bases come
/// first; a redeclared property keeps its base position but takes the
/// subtype's definition.
pub(crate) fn declared_properties<'h, H: SerializerHost + ?Sized>(
    host: &'h H,
    iface: &'h InterfaceType,
) -> Result<Vec<&'h Property>, ResolveError> {
    let mut props = IndexMap::new();
    let mut seen = HashSet::new();
    collect(host, iface, &mut props, &mut seen)?;
    Ok(props.into_values().collect())
}

fn collect<'h, H: SerializerHost + ?Sized>(
    host: &'h H,
    iface: &'h InterfaceType,
    props: &mut IndexMap<&'h str, &'h Property>,
    seen: &mut HashSet<&'h str>,
) -> Result<(), ResolveError> {
    if !seen.insert(iface.fqn.as_str()) {
        return Ok(());
    }
    for base in &iface.interfaces {
        if let NamedType::Interface(parent) = host.lookup_type(base)? {
            collect(host, parent, props, seen)?;
        }
    }
    for prop in &iface.properties {
        props.insert(prop.name.as_str(), prop);
    }
    Ok(())
}
