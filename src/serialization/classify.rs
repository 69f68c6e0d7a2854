// Type descriptor → serialization strategy.
use std::fmt;

use crate::error::ResolveError;
use crate::types::{CollectionKind, EnumType, InterfaceType, NamedType, PrimitiveKind, TypeRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Number,
    Boolean,
    Any,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScalarKind::String => "string",
            ScalarKind::Number => "number",
            ScalarKind::Boolean => "boolean",
            ScalarKind::Any => "any",
        })
    }
}

/// The strategy that applies to a type, carrying what the strategy needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classification<'a> {
    Array(&'a TypeRef),
    Map(&'a TypeRef),
    Date,
    Json,
    Enum(&'a EnumType),
    Scalar(ScalarKind),
    /// A datatype interface.
    Struct(&'a InterfaceType),
    /// A class or a non-datatype interface.
    ObjectReference(&'a NamedType),
    Union(&'a [TypeRef]),
}

impl Classification<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Classification::Array(_) => "array",
            Classification::Map(_) => "map",
            Classification::Date => "date",
            Classification::Json => "json",
            Classification::Enum(_) => "enum",
            Classification::Scalar(_) => "scalar",
            Classification::Struct(_) => "struct",
            Classification::ObjectReference(_) => "reference",
            Classification::Union(_) => "union",
        }
    }
}

/// Total over well-formed type references. The only error is a named type
/// the resolver cannot find, which is forwarded unchanged.
pub fn classify<'a>(
    ty: &'a TypeRef,
    resolve: impl FnOnce(&str) -> Result<&'a NamedType, ResolveError>,
) -> Result<Classification<'a>, ResolveError> {
    Ok(match ty {
        TypeRef::Primitive(kind) => match kind {
            PrimitiveKind::String => Classification::Scalar(ScalarKind::String),
            PrimitiveKind::Number => Classification::Scalar(ScalarKind::Number),
            PrimitiveKind::Boolean => Classification::Scalar(ScalarKind::Boolean),
            PrimitiveKind::Any => Classification::Scalar(ScalarKind::Any),
            PrimitiveKind::Date => Classification::Date,
            PrimitiveKind::Json => Classification::Json,
        },
        TypeRef::Collection { kind: CollectionKind::Array, element } => Classification::Array(element),
        TypeRef::Collection { kind: CollectionKind::Map, element } => Classification::Map(element),
        TypeRef::Union(members) => Classification::Union(members),
        TypeRef::Named(fqn) => match resolve(fqn)? {
            NamedType::Enum(e) => Classification::Enum(e),
            NamedType::Interface(iface) if iface.datatype => Classification::Struct(iface),
            named => Classification::ObjectReference(named),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClassType, Property};

    fn no_types<'a>(fqn: &str) -> Result<&'a NamedType, ResolveError> {
        Err(ResolveError::UnknownType { fqn: fqn.to_owned() })
    }

    #[test]
    fn primitives_and_collections() {
        let t = TypeRef::array(PrimitiveKind::Number.into());
        assert_eq!(classify(&t, no_types).unwrap(), Classification::Array(&TypeRef::Primitive(PrimitiveKind::Number)));
        let t = TypeRef::map(PrimitiveKind::String.into());
        assert_eq!(classify(&t, no_types).unwrap().name(), "map");
        assert_eq!(classify(&PrimitiveKind::Date.into(), no_types).unwrap(), Classification::Date);
        assert_eq!(classify(&PrimitiveKind::Json.into(), no_types).unwrap(), Classification::Json);
        assert_eq!(classify(&PrimitiveKind::Any.into(), no_types).unwrap(), Classification::Scalar(ScalarKind::Any));
    }

    #[test]
    fn named_types_split_by_kind() {
        let strukt = NamedType::Interface(InterfaceType {
            fqn: "phony.Struct".into(),
            datatype: true,
            properties: vec![Property { name: "a".into(), ty: PrimitiveKind::Number.into(), optional: false }],
            interfaces: vec![],
        });
        let iface = NamedType::Interface(InterfaceType {
            fqn: "phony.IThing".into(),
            datatype: false,
            properties: vec![],
            interfaces: vec![],
        });
        let class = NamedType::Class(ClassType { fqn: "phony.Thing".into(), interfaces: vec![], is_abstract: false });
        let t = TypeRef::named("x");
        assert_eq!(classify(&t, |_| Ok(&strukt)).unwrap().name(), "struct");
        assert_eq!(classify(&t, |_| Ok(&iface)).unwrap().name(), "reference");
        assert_eq!(classify(&t, |_| Ok(&class)).unwrap().name(), "reference");
    }

    #[test]
    fn unresolvable_names_are_not_diagnostics() {
        let err = classify(&TypeRef::named("nope.Missing"), no_types).unwrap_err();
        assert_eq!(err, ResolveError::UnknownType { fqn: "nope.Missing".into() });
    }
}
