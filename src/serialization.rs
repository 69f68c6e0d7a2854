//! Recursive validate-and-convert engine.
//!
//! `process` checks required-ness, classifies the declared type once, then
//! dispatches to the matching strategy. Strategies recurse through
//! [`convert`] for element and property types and wrap child failures in
//! nested reasons, so the reported failure is always the first one found in
//! traversal order: ascending index, declaration/insertion key order, union
//! members in declaration order.
pub mod classify;
mod any;
mod collections;
mod date;
mod enums;
mod reference;
mod scalar;
mod structs;
mod union;

use crate::diagnostics::{DiagnosticNode, Reason};
use crate::error::{Error, ResolveError, SerializationError};
use crate::objects::ReferenceTable;
use crate::type_system::EnumSymbols;
use crate::types::{NamedType, OptionalValue, TypeRef};
use crate::value::Value;

pub use classify::{classify, Classification, ScalarKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Host value → wire value.
    Serialize,
    /// Wire value → host value.
    Deserialize,
}

impl Direction {
    pub fn verb(self) -> &'static str {
        match self {
            Direction::Serialize => "serialize",
            Direction::Deserialize => "deserialize",
        }
    }
}

/// Capabilities the engine needs from its embedding.
pub trait SerializerHost {
    fn lookup_type(&self, fqn: &str) -> Result<&NamedType, ResolveError>;
    fn find_symbol(&self, fqn: &str) -> Result<&EnumSymbols, ResolveError>;
    fn objects(&self) -> &ReferenceTable;
    /// Best effort; must not fail.
    fn debug(&self, message: &str) {
        tracing::trace!(target: "jsii_marshal::serialization", "{message}");
    }
}

const REQUIRED: &str = "A value is required (type is non-optional)";

/// Converts `value` as `ty`. On a shape failure the error carries one
/// diagnostic tree rooted at `label`.
pub fn process<H: SerializerHost + ?Sized>(
    host: &H,
    direction: Direction,
    value: &Value,
    ty: &OptionalValue,
    label: &str,
) -> Result<Value, Error> {
    convert(host, direction, value, ty.optional, &ty.ty).map_err(|failure| match failure {
        Failure::Rejected(node) => Error::Serialization(SerializationError { label: label.to_owned(), node }),
        Failure::Resolve(e) => Error::Resolve(e),
    })
}

// ------------------------------ Internals --------------------------------- //

#[derive(Debug)]
pub(crate) enum Failure {
    Rejected(DiagnosticNode),
    Resolve(ResolveError),
}

impl From<ResolveError> for Failure {
    fn from(e: ResolveError) -> Self { Failure::Resolve(e) }
}

pub(crate) type Outcome = Result<Value, Failure>;

pub(crate) fn convert<H: SerializerHost + ?Sized>(
    host: &H,
    direction: Direction,
    value: &Value,
    optional: bool,
    ty: &TypeRef,
) -> Outcome {
    if value.is_absent() {
        if optional {
            return Ok(Value::Undefined);
        }
        return Err(Failure::Rejected(DiagnosticNode::for_value(
            direction,
            ty.to_string(),
            value,
            vec![REQUIRED.into()],
        )));
    }
    convert_present(host, direction, value, ty)
}

fn convert_present<H: SerializerHost + ?Sized>(host: &H, direction: Direction, value: &Value, ty: &TypeRef) -> Outcome {
    let class = classify(ty, |fqn| host.lookup_type(fqn))?;
    host.debug(&format!("{} {} value as {ty}", direction.verb(), class.name()));
    let cx = Cx { host, direction, ty };
    match class {
        Classification::Array(element) => collections::array(&cx, value, element, false),
        Classification::Map(element) => collections::map(&cx, value, element, false),
        Classification::Date => date::date(&cx, value),
        Classification::Json => Ok(value.clone()),
        Classification::Enum(enum_type) => enums::enumeration(&cx, value, enum_type),
        Classification::Scalar(kind) => scalar::scalar(&cx, value, kind),
        Classification::Struct(iface) => structs::structure(&cx, value, iface),
        Classification::ObjectReference(named) => reference::reference(&cx, value, named),
        Classification::Union(members) => union::union(&cx, value, members),
    }
}

/// Per-step context handed to strategies.
pub(crate) struct Cx<'a, H: ?Sized> {
    pub host: &'a H,
    pub direction: Direction,
    pub ty: &'a TypeRef,
}

impl<H: SerializerHost + ?Sized> Cx<'_, H> {
    pub fn reject(&self, value: &Value, reason: impl Into<String>) -> Failure {
        self.reject_with(value, vec![Reason::Plain(reason.into())])
    }

    pub fn reject_with(&self, value: &Value, reasons: Vec<Reason>) -> Failure {
        Failure::Rejected(DiagnosticNode::for_value(self.direction, self.ty.to_string(), value, reasons))
    }

    /// Wraps a child failure under `path`; resolution failures pass through.
    pub fn nest(&self, path: String, value: &Value, failure: Failure) -> Failure {
        match failure {
            Failure::Rejected(child) => self.reject_with(value, vec![Reason::nested(path, child)]),
            other => other,
        }
    }

    pub fn convert(&self, value: &Value, optional: bool, ty: &TypeRef) -> Outcome {
        convert(self.host, self.direction, value, optional, ty)
    }

    pub fn convert_present(&self, value: &Value, ty: &TypeRef) -> Outcome {
        convert_present(self.host, self.direction, value, ty)
    }
}
