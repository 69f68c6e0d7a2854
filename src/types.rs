// Type descriptors and named type definitions, in the assembly's JSON shapes.
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OptionalValue {
    #[serde(default)]
    pub optional: bool,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

impl OptionalValue {
    pub fn required(ty: TypeRef) -> Self { Self { optional: false, ty } }
    pub fn optional(ty: TypeRef) -> Self { Self { optional: true, ty } }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
    Date,
    Json,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    Array,
    Map,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "TypeRefRepr")]
pub enum TypeRef {
    Primitive(PrimitiveKind),
    Collection { kind: CollectionKind, element: Box<TypeRef> },
    Named(String),
    Union(Vec<TypeRef>),
}

impl TypeRef {
    pub fn array(element: TypeRef) -> Self {
        TypeRef::Collection { kind: CollectionKind::Array, element: Box::new(element) }
    }
    pub fn map(element: TypeRef) -> Self {
        TypeRef::Collection { kind: CollectionKind::Map, element: Box::new(element) }
    }
    pub fn named(fqn: impl Into<String>) -> Self { TypeRef::Named(fqn.into()) }
}

impl From<PrimitiveKind> for TypeRef {
    fn from(kind: PrimitiveKind) -> Self { TypeRef::Primitive(kind) }
}

// Assembly wire shapes; one key identifies the variant.
#[derive(Deserialize)]
#[serde(untagged)]
enum TypeRefRepr {
    Primitive { primitive: PrimitiveKind },
    Collection { collection: CollectionRepr },
    Union { union: UnionRepr },
    Named { fqn: String },
}

#[derive(Deserialize)]
struct CollectionRepr {
    kind: CollectionKind,
    elementtype: TypeRef,
}

#[derive(Deserialize)]
struct UnionRepr {
    types: Vec<TypeRef>,
}

impl From<TypeRefRepr> for TypeRef {
    fn from(repr: TypeRefRepr) -> Self {
        match repr {
            TypeRefRepr::Primitive { primitive } => TypeRef::Primitive(primitive),
            TypeRefRepr::Collection { collection } => TypeRef::Collection {
                kind: collection.kind,
                element: Box::new(collection.elementtype),
            },
            TypeRefRepr::Union { union } => TypeRef::Union(union.types),
            TypeRefRepr::Named { fqn } => TypeRef::Named(fqn),
        }
    }
}

// ------------------------------- Display ---------------------------------- //

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Date => "date",
            PrimitiveKind::Json => "json",
            PrimitiveKind::Any => "any",
        })
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(kind) => write!(f, "{kind}"),
            TypeRef::Collection { kind: CollectionKind::Array, element } => write!(f, "array<{element}>"),
            TypeRef::Collection { kind: CollectionKind::Map, element } => write!(f, "map<{element}>"),
            TypeRef::Named(fqn) => f.write_str(fqn),
            TypeRef::Union(types) => {
                for (i, t) in types.iter().enumerate() {
                    if i > 0 { f.write_str(" | ")?; }
                    write!(f, "{t}")?;
                }
                Ok(())
            }
        }
    }
}

// -------------------------------- Parsing --------------------------------- //

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeSyntaxError {
    #[error("empty type reference")]
    Empty,
    #[error("unbalanced '<' / '>' in `{0}`")]
    Unbalanced(String),
    #[error("unexpected trailing input in `{0}`")]
    Trailing(String),
}

/// Parses the display syntax back: `array<T>`, `map<T>`, `A | B`, primitive
/// names, anything else is a fully qualified name.
impl FromStr for TypeRef {
    type Err = TypeSyntaxError;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        let src = src.trim();
        if src.is_empty() {
            return Err(TypeSyntaxError::Empty);
        }
        let arms = split_top_level(src, '|')?;
        if arms.len() > 1 {
            return arms.into_iter().map(str::parse).collect::<Result<Vec<_>, _>>().map(TypeRef::Union);
        }
        for (prefix, kind) in [("array<", CollectionKind::Array), ("map<", CollectionKind::Map)] {
            if let Some(rest) = src.strip_prefix(prefix) {
                let inner = rest.strip_suffix('>').ok_or_else(|| TypeSyntaxError::Trailing(src.to_owned()))?;
                let element: TypeRef = inner.parse()?;
                return Ok(TypeRef::Collection { kind, element: Box::new(element) });
            }
        }
        if src.contains(['<', '>']) {
            return Err(TypeSyntaxError::Unbalanced(src.to_owned()));
        }
        let primitive = match src {
            "string" => Some(PrimitiveKind::String),
            "number" => Some(PrimitiveKind::Number),
            "boolean" => Some(PrimitiveKind::Boolean),
            "date" => Some(PrimitiveKind::Date),
            "json" => Some(PrimitiveKind::Json),
            "any" => Some(PrimitiveKind::Any),
            _ => None,
        };
        Ok(match primitive {
            Some(kind) => TypeRef::Primitive(kind),
            None => TypeRef::Named(src.to_owned()),
        })
    }
}

fn split_top_level(src: &str, sep: char) -> Result<Vec<&str>, TypeSyntaxError> {
    let mut depth = 0usize;
    let mut start = 0;
    let mut out = Vec::new();
    for (i, c) in src.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth = depth.checked_sub(1).ok_or_else(|| TypeSyntaxError::Unbalanced(src.to_owned()))?;
            }
            c if c == sep && depth == 0 => {
                out.push(src[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(TypeSyntaxError::Unbalanced(src.to_owned()));
    }
    out.push(src[start..].trim());
    if out.iter().any(|s| s.is_empty()) {
        return Err(TypeSyntaxError::Empty);
    }
    Ok(out)
}

// ----------------------------- Named types -------------------------------- //

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NamedType {
    Enum(EnumType),
    Class(ClassType),
    Interface(InterfaceType),
}

impl NamedType {
    pub fn fqn(&self) -> &str {
        match self {
            NamedType::Enum(t) => &t.fqn,
            NamedType::Class(t) => &t.fqn,
            NamedType::Interface(t) => &t.fqn,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnumType {
    pub fqn: String,
    #[serde(default)]
    pub members: Vec<EnumMember>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnumMember {
    pub name: String,
    /// Runtime symbol; defaults to the member name.
    #[serde(default)]
    pub value: Option<SymbolValue>,
}

/// Runtime value an enum member maps to on the host side.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SymbolValue {
    Number(f64),
    String(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClassType {
    pub fqn: String,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InterfaceType {
    pub fqn: String,
    /// Plain-data aggregate, converted property by property.
    #[serde(default)]
    pub datatype: bool,
    #[serde(default)]
    pub properties: Vec<Property>,
    /// Base interfaces.
    #[serde(default)]
    pub interfaces: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub optional: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_matches_diagnostic_format() {
        let t = TypeRef::array(TypeRef::map(PrimitiveKind::Number.into()));
        assert_eq!(t.to_string(), "array<map<number>>");
        let u = TypeRef::Union(vec![PrimitiveKind::String.into(), TypeRef::named("phony.module.Struct")]);
        assert_eq!(u.to_string(), "string | phony.module.Struct");
        assert_eq!(TypeRef::from(PrimitiveKind::Json).to_string(), "json");
    }

    #[test]
    fn parse_inverts_display() {
        for src in ["number", "array<number>", "map<array<date>>", "phony.module.Struct", "string | array<@scope/pkg.Enum>"] {
            let t: TypeRef = src.parse().unwrap();
            assert_eq!(t.to_string(), src);
        }
        assert_eq!("array<string | number>".parse::<TypeRef>().unwrap(),
                   TypeRef::array(TypeRef::Union(vec![PrimitiveKind::String.into(), PrimitiveKind::Number.into()])));
    }

    #[test]
    fn parse_rejects_malformed() {
        assert_eq!("".parse::<TypeRef>(), Err(TypeSyntaxError::Empty));
        assert!(matches!("array<number".parse::<TypeRef>(), Err(TypeSyntaxError::Unbalanced(_))));
        assert!(matches!("array<number>x".parse::<TypeRef>(), Err(TypeSyntaxError::Trailing(_))));
        assert_eq!("string |".parse::<TypeRef>(), Err(TypeSyntaxError::Empty));
    }

    #[test]
    fn deserializes_assembly_shapes() {
        let v: OptionalValue = serde_json::from_value(json!({
            "optional": true,
            "type": { "collection": { "kind": "map", "elementtype": {
                "union": { "types": [ { "primitive": "string" }, { "fqn": "phony.Enum" } ] }
            } } }
        })).unwrap();
        assert!(v.optional);
        assert_eq!(v.ty.to_string(), "map<string | phony.Enum>");
    }

    #[test]
    fn deserializes_named_types() {
        let t: NamedType = serde_json::from_value(json!({
            "kind": "interface", "fqn": "phony.Struct", "datatype": true,
            "properties": [ { "name": "that", "type": { "primitive": "number" } } ]
        })).unwrap();
        let NamedType::Interface(iface) = t else { panic!("expected interface") };
        assert!(iface.datatype);
        assert!(!iface.properties[0].optional);

        let e: NamedType = serde_json::from_value(json!({
            "kind": "enum", "fqn": "phony.Enum", "members": [ { "name": "A" }, { "name": "B", "value": 2 } ]
        })).unwrap();
        let NamedType::Enum(e) = e else { panic!("expected enum") };
        assert_eq!(e.members[1].value, Some(SymbolValue::Number(2.0)));
    }
}
