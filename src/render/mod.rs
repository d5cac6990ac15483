//! Placeholder substitution for notification templates.
//!
//! Patterns carry `{variable}` tokens (snake_case identifiers). Each
//! known variable is substituted in one `replace` pass, so repeated
//! tokens are all rewritten. Tokens with no matching variable are left
//! verbatim rather than erroring; the repair sweep depends on finding
//! exactly that left-over state, so this policy is contractual.

use serde_json::{Map, Value};

/// Substitute known variables into a pattern.
///
/// Stringification is locale-free and deterministic: strings pass
/// through, numbers render in decimal, booleans as `true`/`false`,
/// arrays and objects as compact JSON. Dates arrive as ISO-8601
/// strings (chrono's serde form). A `null` variable counts as missing
/// and its token stays verbatim.
pub fn render(pattern: &str, variables: &Map<String, Value>) -> String {
    let mut rendered = pattern.to_string();
    for (name, value) in variables {
        let Some(text) = stringify(value) else {
            continue;
        };
        let token = format!("{{{name}}}");
        rendered = rendered.replace(&token, &text);
    }
    rendered
}

fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Collect the `{identifier}` tokens present in a text, in order of
/// appearance (repeats included). Identifiers are ASCII alphanumerics
/// and underscores; anything else between braces is not a placeholder.
pub fn placeholders(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut found = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'{' {
            let start = i + 1;
            let mut end = start;
            while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
                end += 1;
            }
            if end > start && end < bytes.len() && bytes[end] == b'}' {
                found.push(&text[start..end]);
                i = end + 1;
                continue;
            }
        }
        i += 1;
    }
    found
}

/// Whether a text still carries at least one unsubstituted token.
pub fn has_placeholders(text: &str) -> bool {
    !placeholders(text).is_empty()
}
