use super::{Cx, Direction, Outcome, SerializerHost};
use crate::types::NamedType;
use crate::value::{NativeObject, ObjectRef, Value};
use crate::wire;

/// Fqn given to plain objects passed where an interface is expected.
const ANONYMOUS_FQN: &str = "Object";

pub(super) fn reference<H: SerializerHost + ?Sized>(cx: &Cx<'_, H>, value: &Value, expected: &NamedType) -> Outcome {
    match cx.direction {
        Direction::Serialize => serialize(cx, value, expected),
        Direction::Deserialize => deserialize(cx, value),
    }
}

fn serialize<H: SerializerHost + ?Sized>(cx: &Cx<'_, H>, value: &Value, expected: &NamedType) -> Outcome {
    match (value, expected) {
        (Value::Instance(obj), _) => Ok(register(cx, obj)),
        (Value::Object(props), NamedType::Interface(iface)) => {
            let wrapped = ObjectRef::new(
                NativeObject::new(ANONYMOUS_FQN, vec![iface.fqn.clone()]).with_properties(props.clone()),
            );
            Ok(register(cx, &wrapped))
        }
        (Value::Object(_), named) => Err(cx.reject(value, format!("Value is not an instance of {}", named.fqn()))),
        (Value::Array(_), _) => Err(cx.reject(value, "Value is an array")),
        _ => Err(cx.reject(value, "Value is not an object")),
    }
}

pub(super) fn deserialize<H: SerializerHost + ?Sized>(cx: &Cx<'_, H>, value: &Value) -> Outcome {
    let Some(marker) = wire::reference(value) else {
        return Err(cx.reject(value, format!("Value does not have the \"{}\" key", wire::TOKEN_REF)));
    };
    marker
        .as_str()
        .and_then(|id| cx.host.objects().resolve(id))
        .map(Value::Instance)
        .ok_or_else(|| cx.reject(value, "Value is not a valid object reference"))
}

/// Registers (or finds) the handle and builds its wire reference.
pub(super) fn register<H: SerializerHost + ?Sized>(cx: &Cx<'_, H>, obj: &ObjectRef) -> Value {
    let id = cx.host.objects().register_or_lookup(obj);
    cx.host.debug(&format!("reference {id}"));
    wire::make_ref(id, obj.interfaces())
}
