//! Dynamic values crossing the kernel boundary.
//!
//! One representation serves both sides: host values may carry dates and
//! native instances, wire values are plain JSON plus reserved marker keys.
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use indexmap::IndexMap;

pub type Map = IndexMap<String, Value>;

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Date(DateTime<Utc>),
    Array(Vec<Value>),
    Object(Map),
    Instance(ObjectRef),
}

impl Value {
    /// Both "no value" sentinels.
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Lowers to JSON for output. Lossy for host-only shapes: dates become
    /// ISO strings, instances become `"[<fqn>]"`, undefined becomes null and
    /// undefined object entries are skipped.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as J;
        match self {
            Value::Undefined | Value::Null => J::Null,
            Value::Boolean(b) => J::Bool(*b),
            Value::Number(n) => json_num_pref_i64(*n),
            Value::String(s) => J::String(s.clone()),
            Value::Date(d) => J::String(iso_string(d)),
            Value::Array(xs) => J::Array(xs.iter().map(Value::to_json).collect()),
            Value::Object(m) => J::Object(
                m.iter()
                    .filter(|(_, v)| !matches!(v, Value::Undefined))
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Instance(obj) => J::String(format!("[{}]", obj.fqn())),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value as J;
        match v {
            J::Null => Value::Null,
            J::Bool(b) => Value::Boolean(b),
            J::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            J::String(s) => Value::String(s),
            J::Array(xs) => Value::Array(xs.into_iter().map(Value::from).collect()),
            J::Object(m) => Value::Object(m.into_iter().map(|(k, v)| (k, Value::from(v))).collect()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::String(s.to_owned()) }
}

impl From<String> for Value {
    fn from(s: String) -> Self { Value::String(s) }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self { Value::Number(n) }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self { Value::Boolean(b) }
}

/// Truncates to the millisecond precision the wire form carries.
impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self { Value::Date(d.trunc_subsecs(3)) }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self { Value::Instance(obj) }
}

/// Millisecond precision with a `Z` suffix, e.g. `1970-01-01T00:01:05.535Z`.
pub fn iso_string(d: &DateTime<Utc>) -> String {
    d.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// Prefer emitting integers when exact
fn json_num_pref_i64(n: f64) -> serde_json::Value {
    if n.is_finite() && n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

// ----------------------------- Native objects ----------------------------- //

/// A native object owned by the host process.
///
/// Construction and method dispatch live outside the kernel; the kernel only
/// needs the declared type and the interfaces it implements.
#[derive(Debug)]
pub struct NativeObject {
    fqn: String,
    interfaces: Vec<String>,
    properties: Map,
}

impl NativeObject {
    pub fn new(fqn: impl Into<String>, interfaces: Vec<String>) -> Self {
        Self { fqn: fqn.into(), interfaces, properties: Map::new() }
    }

    pub fn with_properties(mut self, properties: Map) -> Self {
        self.properties = properties;
        self
    }

    pub fn fqn(&self) -> &str { &self.fqn }

    pub fn interfaces(&self) -> &[String] { &self.interfaces }

    pub fn properties(&self) -> &Map { &self.properties }
}

/// Shared handle to a [`NativeObject`]. Equality is identity.
#[derive(Clone)]
pub struct ObjectRef(Rc<NativeObject>);

impl ObjectRef {
    pub fn new(object: NativeObject) -> Self { Self(Rc::new(object)) }

    pub fn ptr_eq(&self, other: &Self) -> bool { Rc::ptr_eq(&self.0, &other.0) }

    pub(crate) fn addr(&self) -> *const NativeObject { Rc::as_ptr(&self.0) }
}

impl std::ops::Deref for ObjectRef {
    type Target = NativeObject;
    fn deref(&self) -> &NativeObject { &self.0 }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool { self.ptr_eq(other) }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef({} @ {:p})", self.0.fqn, Rc::as_ptr(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_conversion_keeps_key_order() {
        let v = Value::from(json!({"zeta": 1, "alpha": [true, null], "mid": "x"}));
        let keys: Vec<_> = v.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
        assert_eq!(v.to_json().to_string(), r#"{"zeta":1,"alpha":[true,null],"mid":"x"}"#);
    }

    #[test]
    fn integral_numbers_lower_as_integers() {
        assert_eq!(Value::Number(1337.0).to_json(), json!(1337));
        assert_eq!(Value::Number(4.5).to_json(), json!(4.5));
        assert_eq!(Value::Number(f64::NAN).to_json(), json!(null));
    }

    #[test]
    fn undefined_entries_are_skipped() {
        let mut m = Map::new();
        m.insert("a".into(), Value::Undefined);
        m.insert("b".into(), Value::Null);
        assert_eq!(Value::Object(m).to_json(), json!({"b": null}));
    }

    #[test]
    fn object_refs_compare_by_identity() {
        let a = ObjectRef::new(NativeObject::new("phony.Thing", vec![]));
        let b = ObjectRef::new(NativeObject::new("phony.Thing", vec![]));
        assert_eq!(Value::Instance(a.clone()), Value::Instance(a.clone()));
        assert_ne!(Value::Instance(a), Value::Instance(b));
    }

    #[test]
    fn iso_string_has_millis() {
        let d = DateTime::<Utc>::from_timestamp_millis(65_535).unwrap();
        assert_eq!(iso_string(&d), "1970-01-01T00:01:05.535Z");
    }
}
