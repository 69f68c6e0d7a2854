use chrono::{DateTime, SubsecRound, Utc};

use super::{Cx, Direction, Outcome, SerializerHost};
use crate::value::{iso_string, Value};
use crate::wire;

pub(super) fn date<H: SerializerHost + ?Sized>(cx: &Cx<'_, H>, value: &Value) -> Outcome {
    match cx.direction {
        Direction::Serialize => match value {
            Value::Date(d) => to_wire(cx, value, d),
            _ => Err(cx.reject(value, "Value is not an instance of Date")),
        },
        Direction::Deserialize => {
            let Some(marker) = wire::date(value) else {
                return Err(cx.reject(value, format!("Value does not have the \"{}\" key", wire::TOKEN_DATE)));
            };
            marker
                .as_str()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|d| Value::Date(d.with_timezone(&Utc)))
                .ok_or_else(|| cx.reject(value, "Value is not a valid ISO-8601 date"))
        }
    }
}

/// The marker carries milliseconds; finer dates would not come back equal.
pub(super) fn to_wire<H: SerializerHost + ?Sized>(cx: &Cx<'_, H>, value: &Value, d: &DateTime<Utc>) -> Outcome {
    if d.trunc_subsecs(3) != *d {
        return Err(cx.reject(value, "Value has sub-millisecond precision"));
    }
    Ok(wire::make_date(iso_string(d)))
}
