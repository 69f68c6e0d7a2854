// Failing-value summaries and bounded, single-level renderings.
use once_cell::sync::Lazy;
use regex::Regex;

use crate::value::{iso_string, Map, Value};

// Rendering bounds; objects share the item cap
const MAX_ARRAY_ITEMS: usize = 100;
const MAX_STRING_CHARS: usize = 10_000;
const BREAK_LENGTH: usize = 72;

static BARE_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z_][a-zA-Z_0-9]*$").unwrap());

/// Summary of the value's runtime shape plus an optional rendering. Absent
/// values and native instances are never rendered; anonymous `Object`
/// instances render as the plain object they wrap.
pub fn describe_failure(value: &Value) -> (String, Option<String>) {
    let summary = match value {
        Value::Undefined => "undefined".to_owned(),
        Value::Null => "null".to_owned(),
        Value::Boolean(_) => "a boolean".to_owned(),
        Value::Number(_) => "a number".to_owned(),
        Value::String(_) => "a string".to_owned(),
        Value::Array(_) => "an array".to_owned(),
        Value::Date(_) => "an instance of Date".to_owned(),
        Value::Object(_) => "an object".to_owned(),
        Value::Instance(obj) if obj.fqn() == "Object" => "an object".to_owned(),
        Value::Instance(obj) => format!("an instance of {}", obj.fqn()),
    };
    let rendering = match value {
        Value::Instance(obj) if obj.fqn() == "Object" => Some(inspect_object(obj.properties())),
        Value::Undefined | Value::Null | Value::Instance(_) => None,
        _ => Some(inspect(value)),
    };
    (summary, rendering)
}

/// Renders one level deep; nested collections collapse to `[Array]` /
/// `[Object]`.
pub fn inspect(value: &Value) -> String {
    match value {
        Value::Array(xs) => {
            let entries = xs.iter().take(MAX_ARRAY_ITEMS).map(inspect_nested).collect();
            braces("[", "]", capped(entries, xs.len()))
        }
        Value::Object(m) => inspect_object(m),
        other => inspect_nested(other),
    }
}

fn inspect_object(m: &Map) -> String {
    let entries = m
        .iter()
        .take(MAX_ARRAY_ITEMS)
        .map(|(k, v)| format!("{}: {}", key(k), inspect_nested(v)))
        .collect();
    braces("{", "}", capped(entries, m.len()))
}

fn capped(mut entries: Vec<String>, total: usize) -> Vec<String> {
    if total > entries.len() {
        let more = total - entries.len();
        entries.push(format!("... {more} more item{}", if more == 1 { "" } else { "s" }));
    }
    entries
}

fn inspect_nested(value: &Value) -> String {
    match value {
        Value::Undefined => "undefined".to_owned(),
        Value::Null => "null".to_owned(),
        Value::Boolean(b) => b.to_string(),
        Value::Number(n) => js_number(*n),
        Value::String(s) => quote(s),
        Value::Date(d) => iso_string(d),
        Value::Array(_) => "[Array]".to_owned(),
        Value::Object(_) => "[Object]".to_owned(),
        Value::Instance(obj) => format!("[{}]", obj.fqn()),
    }
}

fn braces(open: &str, close: &str, entries: Vec<String>) -> String {
    if entries.is_empty() {
        return format!("{open}{close}");
    }
    let single = format!("{open} {} {close}", entries.join(", "));
    if single.chars().count() <= BREAK_LENGTH {
        single
    } else {
        format!("{open}\n  {}\n{close}", entries.join(",\n  "))
    }
}

fn key(k: &str) -> String {
    if BARE_KEY.is_match(k) { k.to_owned() } else { quote(k) }
}

/// Single quotes unless the text contains one; then double quotes, then
/// backticks, then escaped single quotes.
fn quote(s: &str) -> String {
    let total = s.chars().count();
    let shown: String = s.chars().take(MAX_STRING_CHARS).collect();
    let q = if !shown.contains('\'') {
        '\''
    } else if !shown.contains('"') {
        '"'
    } else if !shown.contains('`') && !shown.contains("${") {
        '`'
    } else {
        '\''
    };
    let mut out = String::with_capacity(shown.len() + 2);
    out.push(q);
    for c in shown.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\u{b}' => out.push_str("\\v"),
            c if c == q => { out.push('\\'); out.push(c); }
            c if (c as u32) < 0x20 || c as u32 == 0x7f => out.push_str(&format!("\\x{:02X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(q);
    if total > MAX_STRING_CHARS {
        let more = total - MAX_STRING_CHARS;
        out.push_str(&format!("... {more} more character{}", if more == 1 { "" } else { "s" }));
    }
    out
}

/// Number formatting as the foreign side prints it: integral values without
/// a fraction, `NaN` / `Infinity`, signed zero kept, exponent form below
/// 1e-6 and from 1e21 up.
pub fn js_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_owned()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity".to_owned() } else { "-Infinity".to_owned() }
    } else if n == 0.0 && n.is_sign_negative() {
        "-0".to_owned()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        let exp = format!("{n:e}");
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
            _ => exp,
        }
    } else {
        format!("{n}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{NativeObject, ObjectRef};
    use chrono::{DateTime, Utc};
    use serde_json::json;

    fn v(j: serde_json::Value) -> Value { Value::from(j) }

    #[test]
    fn summaries() {
        assert_eq!(describe_failure(&Value::Undefined), ("undefined".into(), None));
        assert_eq!(describe_failure(&Value::Null), ("null".into(), None));
        assert_eq!(describe_failure(&v(json!(1337))), ("a number".into(), Some("1337".into())));
        let d = DateTime::<Utc>::from_timestamp_millis(65_535).unwrap();
        assert_eq!(
            describe_failure(&Value::Date(d)),
            ("an instance of Date".into(), Some("1970-01-01T00:01:05.535Z".into()))
        );
        let obj = ObjectRef::new(NativeObject::new("phony.Thing", vec![]));
        assert_eq!(describe_failure(&Value::Instance(obj)), ("an instance of phony.Thing".into(), None));

        let Value::Object(props) = v(json!({"name": "hi"})) else { unreachable!() };
        let anon = ObjectRef::new(NativeObject::new("Object", vec!["phony.IGreeter".into()]).with_properties(props));
        assert_eq!(describe_failure(&Value::Instance(anon)), ("an object".into(), Some("{ name: 'hi' }".into())));
    }

    #[test]
    fn strings_pick_quotes() {
        assert_eq!(inspect(&v(json!("Not a number"))), "'Not a number'");
        assert_eq!(inspect(&v(json!("I'm here"))), "\"I'm here\"");
        assert_eq!(inspect(&v(json!("I'm \"here\""))), "`I'm \"here\"`");
        assert_eq!(inspect(&v(json!("a\nb"))), "'a\\nb'");
    }

    #[test]
    fn collections_render_one_level() {
        assert_eq!(inspect(&v(json!(["Not a number"]))), "[ 'Not a number' ]");
        assert_eq!(inspect(&v(json!(["is", "not", "an", "Array"]))), "[ 'is', 'not', 'an', 'Array' ]");
        assert_eq!(inspect(&v(json!({"this": ["is", "not"]}))), "{ this: [Array] }");
        assert_eq!(inspect(&v(json!({"that": "is not a number"}))), "{ that: 'is not a number' }");
        assert_eq!(inspect(&v(json!({"$jsii.date": {}}))), "{ '$jsii.date': [Object] }");
        assert_eq!(inspect(&v(json!([]))), "[]");
        assert_eq!(inspect(&v(json!({}))), "{}");
    }

    #[test]
    fn long_renderings_wrap_and_truncate() {
        let xs: Vec<_> = (0..150).collect();
        let out = inspect(&v(json!(xs)));
        assert!(out.starts_with("[\n  0,\n  1,"));
        assert!(out.ends_with("  99,\n  ... 50 more items\n]"));

        let keys: serde_json::Map<_, _> = (0..150).map(|i| (format!("k{i}"), json!(i))).collect();
        let out = inspect(&v(serde_json::Value::Object(keys)));
        assert!(out.starts_with("{\n  k0: 0,\n"));
        assert!(out.ends_with("  k99: 99,\n  ... 50 more items\n}"), "{out}");

        let long = "é".repeat(MAX_STRING_CHARS + 3);
        let out = inspect(&Value::String(long));
        assert!(out.ends_with("'... 3 more characters"));
    }

    #[test]
    fn numbers_print_like_the_foreign_side() {
        assert_eq!(js_number(1337.0), "1337");
        assert_eq!(js_number(4.25), "4.25");
        assert_eq!(js_number(-0.0), "-0");
        assert_eq!(js_number(f64::INFINITY), "Infinity");
        assert_eq!(js_number(f64::NAN), "NaN");
        assert_eq!(js_number(0.000001), "0.000001");
        assert_eq!(js_number(1e-7), "1e-7");
        assert_eq!(js_number(-2.5e-8), "-2.5e-8");
        assert_eq!(js_number(1e21), "1e+21");
        assert_eq!(js_number(1.5e300), "1.5e+300");
        assert_eq!(js_number(123456789012345680000.0), "123456789012345680000");
    }
}
