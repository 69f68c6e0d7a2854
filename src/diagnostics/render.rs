// Box-drawing layout for diagnostic trees.
use super::{DiagnosticNode, Reason};
use crate::serialization::Direction;

/// ```text
/// Dummy value: Unable to serialize value as array<number>
/// ├── 🛑 Failing value is an array
/// │      [ 'Not a number' ]
/// ╰── 🔍 Failure reason(s):
///     ╰─ Index 0: Unable to serialize value as number
///         ├── 🛑 Failing value is a string
///         │      'Not a number'
///         ╰── 🔍 Failure reason(s):
///             ╰─ Value is not a number
/// ```
pub fn render(label: &str, direction: Direction, type_display: &str, node: &DiagnosticNode) -> String {
    let mut out = header(&capitalize(label), direction, type_display);
    for line in tree(node) {
        out.push('\n');
        out.push_str(&line);
    }
    out
}

fn header(label: &str, direction: Direction, type_display: &str) -> String {
    format!("{label}: Unable to {} value as {type_display}", direction.verb())
}

fn tree(node: &DiagnosticNode) -> Vec<String> {
    let has_reasons = !node.reasons.is_empty();
    let mut lines = Vec::new();

    lines.push(format!("{}── 🛑 Failing value is {}", if has_reasons { '├' } else { '╰' }, node.summary));
    if let Some(rendering) = &node.rendering {
        let bar = if has_reasons { '│' } else { ' ' };
        lines.extend(rendering.lines().map(|text| format!("{bar}      {text}")));
    }
    if !has_reasons {
        return lines;
    }

    lines.push("╰── 🔍 Failure reason(s):".to_owned());
    let last = node.reasons.len() - 1;
    for (i, reason) in node.reasons.iter().enumerate() {
        let (connector, continuation) = if i == last { ("╰─", "        ") } else { ("├─", "    │   ") };
        match reason {
            Reason::Plain(text) => lines.push(format!("    {connector} {text}")),
            Reason::Nested { path, node: child } => {
                lines.push(format!("    {connector} {}", header(path, child.direction, &child.type_display)));
                lines.extend(tree(child).into_iter().map(|l| format!("{continuation}{l}")));
            }
        }
    }
    lines
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
