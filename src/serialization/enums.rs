use super::{Cx, Direction, Outcome, SerializerHost};
use crate::types::EnumType;
use crate::value::Value;
use crate::wire;

pub(super) fn enumeration<H: SerializerHost + ?Sized>(cx: &Cx<'_, H>, value: &Value, ty: &EnumType) -> Outcome {
    let symbols = cx.host.find_symbol(&ty.fqn)?;
    let not_present = || cx.reject(value, format!("Value is not present in enum {}", ty.fqn));
    match cx.direction {
        Direction::Serialize => {
            if !matches!(value, Value::String(_) | Value::Number(_)) {
                return Err(cx.reject(value, "Value is not a string or number"));
            }
            symbols
                .name_of(value)
                .map(|member| wire::make_enum(&ty.fqn, member))
                .ok_or_else(not_present)
        }
        Direction::Deserialize => {
            let Some(marker) = wire::enum_member(value) else {
                return Err(cx.reject(value, format!("Value does not have the \"{}\" key", wire::TOKEN_ENUM)));
            };
            // fqns may contain '/' (npm scopes); the member never does
            marker
                .as_str()
                .and_then(|s| s.rsplit_once('/'))
                .filter(|(fqn, _)| *fqn == ty.fqn)
                .and_then(|(_, member)| symbols.value_of(member))
                .map(Value::from)
                .ok_or_else(not_present)
        }
    }
}
