//! In-memory registry of named types and their enum symbol tables.
use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::Deserialize;

use crate::error::{LoadError, ResolveError};
use crate::path_de;
use crate::types::{EnumType, NamedType, SymbolValue};
use crate::value::Value;

// ————————————————————————————————————————————————————————————————————————————
// ENUM SYMBOLS
// ————————————————————————————————————————————————————————————————————————————

/// Member name ↔ runtime symbol, in both directions.
#[derive(Debug, Clone, Default)]
pub struct EnumSymbols {
    by_name: IndexMap<String, SymbolValue>,
    by_value: HashMap<SymbolKey, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum SymbolKey {
    Str(String),
    Num(OrderedFloat<f64>),
}

impl SymbolKey {
    fn of(symbol: &SymbolValue) -> Self {
        match symbol {
            SymbolValue::String(s) => SymbolKey::Str(s.clone()),
            SymbolValue::Number(n) => SymbolKey::Num(OrderedFloat(*n)),
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(SymbolKey::Str(s.clone())),
            Value::Number(n) => Some(SymbolKey::Num(OrderedFloat(*n))),
            _ => None,
        }
    }
}

impl EnumSymbols {
    pub fn new() -> Self { Self::default() }

    /// Later inserts of the same member replace its symbol.
    pub fn insert(&mut self, member: impl Into<String>, symbol: SymbolValue) {
        let member = member.into();
        if let Some(previous) = self.by_name.insert(member.clone(), symbol.clone()) {
            self.by_value.remove(&SymbolKey::of(&previous));
        }
        self.by_value.insert(SymbolKey::of(&symbol), member);
    }

    /// Members without an explicit value map to their own name.
    pub fn from_enum(ty: &EnumType) -> Self {
        let mut symbols = Self::new();
        for member in &ty.members {
            let symbol = member.value.clone().unwrap_or_else(|| SymbolValue::String(member.name.clone()));
            symbols.insert(member.name.clone(), symbol);
        }
        symbols
    }

    /// The member whose symbol equals `value`.
    pub fn name_of(&self, value: &Value) -> Option<&str> {
        let key = SymbolKey::from_value(value)?;
        self.by_value.get(&key).map(String::as_str)
    }

    pub fn value_of(&self, member: &str) -> Option<&SymbolValue> {
        self.by_name.get(member)
    }

    pub fn len(&self) -> usize { self.by_name.len() }

    pub fn is_empty(&self) -> bool { self.by_name.is_empty() }
}

impl From<&SymbolValue> for Value {
    fn from(symbol: &SymbolValue) -> Self {
        match symbol {
            SymbolValue::String(s) => Value::String(s.clone()),
            SymbolValue::Number(n) => Value::Number(*n),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TYPE SYSTEM
// ————————————————————————————————————————————————————————————————————————————

/// Holds no native handles, so one instance can back many sessions across
/// threads.
#[derive(Debug, Clone, Default)]
pub struct TypeSystem {
    types: IndexMap<String, NamedType>,
    symbols: HashMap<String, EnumSymbols>,
}

/// On-disk shape: `{"types": {"<fqn>": {"kind": …, …}}}`.
#[derive(Debug, Deserialize)]
struct TypeDocument {
    #[serde(default)]
    types: IndexMap<String, NamedType>,
}

impl TypeSystem {
    pub fn new() -> Self { Self::default() }

    /// Enums get their default symbol table; re-registering an fqn replaces it.
    pub fn register(&mut self, ty: NamedType) {
        let fqn = ty.fqn().to_owned();
        if let NamedType::Enum(e) = &ty {
            self.symbols.insert(fqn.clone(), EnumSymbols::from_enum(e));
        }
        self.types.insert(fqn, ty);
    }

    pub fn get(&self, fqn: &str) -> Option<&NamedType> {
        self.types.get(fqn)
    }

    pub fn lookup_type(&self, fqn: &str) -> Result<&NamedType, ResolveError> {
        self.get(fqn).ok_or_else(|| ResolveError::UnknownType { fqn: fqn.to_owned() })
    }

    pub fn find_symbol(&self, fqn: &str) -> Result<&EnumSymbols, ResolveError> {
        match self.lookup_type(fqn)? {
            NamedType::Enum(_) => self
                .symbols
                .get(fqn)
                .ok_or_else(|| ResolveError::UnknownSymbols { fqn: fqn.to_owned() }),
            _ => Err(ResolveError::NotAnEnum { fqn: fqn.to_owned() }),
        }
    }

    /// Fails on the first fqn both registries declare; `self` is left
    /// unchanged in that case.
    pub fn merge(&mut self, other: TypeSystem) -> Result<(), LoadError> {
        if let Some(fqn) = other.types.keys().find(|fqn| self.types.contains_key(*fqn)) {
            return Err(LoadError::Duplicate { fqn: fqn.clone() });
        }
        self.types.extend(other.types);
        self.symbols.extend(other.symbols);
        Ok(())
    }

    pub fn from_json_str(src: &str) -> Result<Self, LoadError> {
        Self::from_document(path_de::from_str_with_path(src)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
        let system = Self::from_document(path_de::from_slice_with_path(&bytes)?)?;
        tracing::debug!(path = %path.display(), types = system.len(), "loaded type system");
        Ok(system)
    }

    /// Each entry's key must be the fqn it declares.
    fn from_document(doc: TypeDocument) -> Result<Self, LoadError> {
        let mut system = Self::new();
        for (key, ty) in doc.types {
            if key != ty.fqn() {
                return Err(LoadError::FqnMismatch { key, fqn: ty.fqn().to_owned() });
            }
            system.register(ty);
        }
        Ok(system)
    }

    pub fn len(&self) -> usize { self.types.len() }

    pub fn is_empty(&self) -> bool { self.types.is_empty() }

    pub fn fqns(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EnumMember;

    const DOC: &str = r#"{
        "types": {
            "phony.Color": {
                "kind": "enum",
                "fqn": "phony.Color",
                "members": [{"name": "RED"}, {"name": "GREEN", "value": 2}]
            },
            "phony.Point": {
                "kind": "interface",
                "fqn": "phony.Point",
                "datatype": true,
                "properties": [
                    {"name": "x", "type": {"primitive": "number"}},
                    {"name": "label", "type": {"primitive": "string"}, "optional": true}
                ]
            },
            "phony.Widget": {"kind": "class", "fqn": "phony.Widget", "interfaces": ["phony.IWidget"]}
        }
    }"#;

    #[test]
    fn loads_types_and_default_symbols() {
        let ts = TypeSystem::from_json_str(DOC).unwrap();
        assert_eq!(ts.len(), 3);
        assert_eq!(ts.fqns().collect::<Vec<_>>(), ["phony.Color", "phony.Point", "phony.Widget"]);
        let symbols = ts.find_symbol("phony.Color").unwrap();
        assert_eq!(symbols.name_of(&Value::from("RED")), Some("RED"));
        assert_eq!(symbols.name_of(&Value::Number(2.0)), Some("GREEN"));
        assert_eq!(symbols.value_of("GREEN"), Some(&SymbolValue::Number(2.0)));
        assert_eq!(symbols.name_of(&Value::from("GREEN")), None);
    }

    #[test]
    fn resolution_errors_are_specific() {
        let ts = TypeSystem::from_json_str(DOC).unwrap();
        assert_eq!(
            ts.lookup_type("phony.Nope").unwrap_err(),
            ResolveError::UnknownType { fqn: "phony.Nope".into() }
        );
        assert_eq!(
            ts.find_symbol("phony.Point").unwrap_err(),
            ResolveError::NotAnEnum { fqn: "phony.Point".into() }
        );
    }

    #[test]
    fn reinserted_members_drop_their_old_symbol() {
        let mut symbols = EnumSymbols::new();
        symbols.insert("RED", SymbolValue::Number(0.0));
        symbols.insert("RED", SymbolValue::Number(1.0));
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols.value_of("RED"), Some(&SymbolValue::Number(1.0)));
        assert_eq!(symbols.name_of(&Value::Number(1.0)), Some("RED"));
        assert_eq!(symbols.name_of(&Value::Number(0.0)), None);
    }

    #[test]
    fn enum_without_symbols_is_reported() {
        let mut ts = TypeSystem::new();
        ts.register(NamedType::Enum(EnumType {
            fqn: "phony.E".into(),
            members: vec![EnumMember { name: "A".into(), value: None }],
        }));
        ts.symbols.clear();
        assert_eq!(
            ts.find_symbol("phony.E").unwrap_err(),
            ResolveError::UnknownSymbols { fqn: "phony.E".into() }
        );
    }

    #[test]
    fn merge_rejects_duplicates() {
        let mut a = TypeSystem::from_json_str(DOC).unwrap();
        let b = TypeSystem::from_json_str(
            r#"{"types": {"phony.Widget": {"kind": "class", "fqn": "phony.Widget"}}}"#,
        )
        .unwrap();
        let err = a.merge(b).unwrap_err();
        assert!(matches!(err, LoadError::Duplicate { ref fqn } if fqn == "phony.Widget"));
        assert_eq!(a.len(), 3);

        let c = TypeSystem::from_json_str(r#"{"types": {"phony.Other": {"kind": "class", "fqn": "phony.Other"}}}"#)
            .unwrap();
        a.merge(c).unwrap();
        assert!(a.get("phony.Other").is_some());
    }

    #[test]
    fn keys_must_match_declared_fqns() {
        let err = TypeSystem::from_json_str(r#"{"types": {"phony.A": {"kind": "class", "fqn": "phony.B"}}}"#)
            .unwrap_err();
        assert!(matches!(err, LoadError::FqnMismatch { ref key, ref fqn } if key == "phony.A" && fqn == "phony.B"));
        assert_eq!(err.to_string(), "type registered under phony.A declares fqn phony.B");
    }

    #[test]
    fn malformed_documents_report_a_path() {
        let err = TypeSystem::from_json_str(r#"{"types": []}"#).unwrap_err();
        match err {
            LoadError::Parse { path, .. } => assert_eq!(path, "types"),
            other => panic!("expected a parse error, got {other:?}"),
        }
        let err = TypeSystem::load("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().starts_with("failed to read /definitely/not/here.json"));
    }
}
