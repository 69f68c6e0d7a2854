//! Reserved marker keys on wire-format keyed structures.
//!
//! Each sniffer checks for exactly one reserved key. Callers must sniff for
//! markers before treating a keyed structure as plain data.
use crate::value::{Map, Value};

pub const TOKEN_REF: &str = "$jsii.byref";
pub const TOKEN_INTERFACES: &str = "$jsii.interfaces";
pub const TOKEN_DATE: &str = "$jsii.date";
pub const TOKEN_ENUM: &str = "$jsii.enum";
pub const TOKEN_MAP: &str = "$jsii.map";
pub const TOKEN_STRUCT: &str = "$jsii.struct";

/// A keyed structure recognized by its reserved key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Marker<'a> {
    Date(&'a Value),
    Enum(&'a Value),
    Ref(&'a Value),
    Map(&'a Value),
    Struct(&'a Value),
}

/// Checked in order: reference, date, enum, struct envelope, map envelope.
pub fn sniff(value: &Value) -> Option<Marker<'_>> {
    let map = value.as_object()?;
    if let Some(v) = map.get(TOKEN_REF) { return Some(Marker::Ref(v)); }
    if let Some(v) = map.get(TOKEN_DATE) { return Some(Marker::Date(v)); }
    if let Some(v) = map.get(TOKEN_ENUM) { return Some(Marker::Enum(v)); }
    if let Some(v) = map.get(TOKEN_STRUCT) { return Some(Marker::Struct(v)); }
    if let Some(v) = map.get(TOKEN_MAP) { return Some(Marker::Map(v)); }
    None
}

pub fn date(value: &Value) -> Option<&Value> { reserved(value, TOKEN_DATE) }

pub fn enum_member(value: &Value) -> Option<&Value> { reserved(value, TOKEN_ENUM) }

pub fn reference(value: &Value) -> Option<&Value> { reserved(value, TOKEN_REF) }

pub fn map_envelope(value: &Value) -> Option<&Value> { reserved(value, TOKEN_MAP) }

/// `{"$jsii.struct": {"fqn": …, "data": {…}}}` → (fqn, data).
pub fn struct_envelope(value: &Value) -> Option<(&str, &Value)> {
    let inner = reserved(value, TOKEN_STRUCT)?.as_object()?;
    let fqn = inner.get("fqn")?.as_str()?;
    let data = inner.get("data")?;
    Some((fqn, data))
}

fn reserved<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.as_object()?.get(key)
}

// ------------------------------- Builders --------------------------------- //

pub fn make_date(iso: String) -> Value { single(TOKEN_DATE, Value::String(iso)) }

pub fn make_enum(fqn: &str, member: &str) -> Value {
    single(TOKEN_ENUM, Value::String(format!("{fqn}/{member}")))
}

/// Interfaces are omitted when empty.
pub fn make_ref(id: String, interfaces: &[String]) -> Value {
    let mut map = Map::new();
    map.insert(TOKEN_REF.to_owned(), Value::String(id));
    if !interfaces.is_empty() {
        map.insert(
            TOKEN_INTERFACES.to_owned(),
            Value::Array(interfaces.iter().cloned().map(Value::String).collect()),
        );
    }
    Value::Object(map)
}

fn single(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_owned(), value);
    Value::Object(map)
}
