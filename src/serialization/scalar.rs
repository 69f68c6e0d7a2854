use super::{any, Cx, Outcome, ScalarKind, SerializerHost};
use crate::value::Value;

pub(super) fn scalar<H: SerializerHost + ?Sized>(cx: &Cx<'_, H>, value: &Value, kind: ScalarKind) -> Outcome {
    let matches = match kind {
        ScalarKind::String => matches!(value, Value::String(_)),
        ScalarKind::Number => matches!(value, Value::Number(_)),
        ScalarKind::Boolean => matches!(value, Value::Boolean(_)),
        ScalarKind::Any => return any::any(cx, value),
    };
    if matches {
        Ok(value.clone())
    } else {
        Err(cx.reject(value, format!("Value is not a {kind}")))
    }
}
