use super::{Cx, Failure, Outcome, SerializerHost};
use crate::diagnostics::Reason;
use crate::types::TypeRef;
use crate::value::Value;

/// First member that accepts the value wins. When none does, every member's
/// failure is flattened into one leaf so the report stays a single level.
pub(super) fn union<H: SerializerHost + ?Sized>(cx: &Cx<'_, H>, value: &Value, members: &[TypeRef]) -> Outcome {
    let mut reasons = vec![Reason::from("Value does not match any type in union")];
    for member in members {
        match cx.convert_present(value, member) {
            Ok(converted) => return Ok(converted),
            Err(Failure::Rejected(node)) => {
                reasons.extend(node.flatten().into_iter().map(|line| Reason::Plain(format!("{member}: {line}"))));
            }
            Err(resolve) => return Err(resolve),
        }
    }
    Err(cx.reject_with(value, reasons))
}
