//! `{{path}}` placeholder binding.
//!
//! Placeholders look up a value in a JSON data object by a dotted path with
//! optional bracket indices (`order.items[2].name`). Anything that fails to
//! resolve becomes an empty string; binding never fails.

use std::collections::BTreeSet;

use serde_json::Value;

use super::Block;

/// A placeholder found in a template string.
struct Placeholder<'a> {
    /// Byte range of the whole `{{ ... }}` token.
    start: usize,
    end: usize,
    /// Path with surrounding whitespace removed.
    path: &'a str,
}

/// Scan `template` for `{{ path }}` tokens, left to right.
///
/// The path is everything up to the first `}`; a token is only recognised
/// when that `}` is immediately followed by another.
fn placeholders(template: &str) -> Vec<Placeholder<'_>> {
    let mut found = Vec::new();
    let mut pos = 0;

    while let Some(offset) = template[pos..].find("{{") {
        let start = pos + offset;
        let inner_start = start + 2;
        let inner_len = template[inner_start..]
            .find('}')
            .unwrap_or(template.len() - inner_start);
        let inner_end = inner_start + inner_len;

        if inner_len > 0 && template[inner_end..].starts_with("}}") {
            found.push(Placeholder {
                start,
                end: inner_end + 2,
                path: template[inner_start..inner_end].trim(),
            });
            pos = inner_end + 2;
        } else {
            pos = start + 1;
        }
    }

    found
}

/// Split one path segment into its key and bracket indices.
///
/// `items[2]` → `("items", [2])`. Returns `None` if the segment is not a
/// word followed by zero or more `[digits]`.
fn parse_segment(segment: &str) -> Option<(&str, Vec<usize>)> {
    let key_end = segment.find('[').unwrap_or(segment.len());
    let key = &segment[..key_end];
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }

    let mut indices = Vec::new();
    let mut rest = &segment[key_end..];
    while !rest.is_empty() {
        let inner = rest.strip_prefix('[')?;
        let close = inner.find(']')?;
        let digits = &inner[..close];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        indices.push(digits.parse().ok()?);
        rest = &inner[close + 1..];
    }

    Some((key, indices))
}

/// Look up `path` in `data`.
///
/// Returns `None` for a missing key, an index out of range, or a step
/// through a scalar. A present `null` resolves to `Some(Value::Null)`.
pub fn resolve_path<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.').map(str::trim).filter(|s| !s.is_empty()).peekable();
    segments.peek()?;

    let mut cur = data;
    for segment in segments {
        let (key, indices) = parse_segment(segment)?;
        cur = match cur {
            Value::Object(map) => map.get(key)?,
            Value::Array(items) => items.get(key.parse::<usize>().ok()?)?,
            _ => return None,
        };
        for idx in indices {
            cur = cur.as_array()?.get(idx)?;
        }
    }
    Some(cur)
}

/// Render a JSON value the way it should appear in printed text.
fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            // Integral floats print without a trailing ".0"
            Some(f) if !n.is_i64() && !n.is_u64() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// Replace every `{{ path }}` in `template` with the value at `path` in `data`.
///
/// ```
/// use printcraft::document::bind_text;
/// use serde_json::json;
///
/// let data = json!({"customer": {"name": "Ada"}});
/// assert_eq!(bind_text("Hi {{ customer.name }}!", &data), "Hi Ada!");
/// assert_eq!(bind_text("{{customer.missing}}", &data), "");
/// ```
pub fn bind_text(template: &str, data: &Value) -> String {
    let found = placeholders(template);
    if found.is_empty() {
        return template.to_string();
    }

    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    for p in found {
        out.push_str(&template[last..p.start]);
        if let Some(value) = resolve_path(data, p.path) {
            out.push_str(&stringify(value));
        }
        last = p.end;
    }
    out.push_str(&template[last..]);
    out
}

/// Collect the placeholder paths used in `template`, without resolving them.
pub fn find_placeholders(template: &str) -> BTreeSet<String> {
    placeholders(template)
        .into_iter()
        .filter(|p| !p.path.is_empty())
        .map(|p| p.path.to_string())
        .collect()
}

/// Placeholder paths used by `blocks` that do not resolve in `data`.
pub fn missing_bindings(blocks: &[Block], data: &Value) -> BTreeSet<String> {
    blocks
        .iter()
        .filter_map(Block::template_text)
        .flat_map(find_placeholders)
        .filter(|path| resolve_path(data, path).is_none())
        .collect()
}
