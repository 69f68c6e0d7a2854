use super::{collections, date, reference, Cx, Direction, Outcome, SerializerHost};
use crate::types::{NamedType, PrimitiveKind, TypeRef};
use crate::value::Value;
use crate::wire::{self, Marker};

static ANY: TypeRef = TypeRef::Primitive(PrimitiveKind::Any);

/// `any` still converts recursively: dates, references and the envelope
/// markers keep their wire forms, nested absent values are allowed.
pub(super) fn any<H: SerializerHost + ?Sized>(cx: &Cx<'_, H>, value: &Value) -> Outcome {
    match cx.direction {
        Direction::Serialize => match value {
            Value::Date(d) => date::to_wire(cx, value, d),
            Value::Instance(obj) => Ok(reference::register(cx, obj)),
            Value::Array(_) => collections::array(cx, value, &ANY, true),
            Value::Object(_) => collections::map(cx, value, &ANY, true),
            _ => Ok(value.clone()),
        },
        Direction::Deserialize => match wire::sniff(value) {
            Some(Marker::Ref(_)) => reference::deserialize(cx, value),
            Some(Marker::Date(_)) => cx.convert_present(value, &TypeRef::Primitive(PrimitiveKind::Date)),
            Some(Marker::Enum(member)) => {
                let fqn = member.as_str().and_then(|s| s.rsplit_once('/')).map(|(fqn, _)| fqn);
                match fqn {
                    Some(fqn) if matches!(cx.host.lookup_type(fqn), Ok(NamedType::Enum(_))) => {
                        cx.convert_present(value, &TypeRef::named(fqn))
                    }
                    _ => Err(cx.reject(value, "Value is not a valid enum reference")),
                }
            }
            // The fqn comes from the value, so an unknown one is a shape failure.
            Some(Marker::Struct(_)) => match wire::struct_envelope(value) {
                Some((fqn, _)) if cx.host.lookup_type(fqn).is_ok() => cx.convert_present(value, &TypeRef::named(fqn)),
                _ => Err(cx.reject(value, "Value is not a valid struct envelope")),
            },
            Some(Marker::Map(_)) => collections::map(cx, value, &ANY, true),
            None => match value {
                Value::Array(_) => collections::array(cx, value, &ANY, true),
                Value::Object(_) => collections::map(cx, value, &ANY, true),
                _ => Ok(value.clone()),
            },
        },
    }
}
