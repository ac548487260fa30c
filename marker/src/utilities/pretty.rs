use serde_json::Value;

/// Renders a prompt block: JSON (or a string holding JSON) is pretty-printed, text stays as-is.
///
/// Key order is preserved and non-ASCII characters are kept literally.
pub fn pretty_block(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => pretty_text(s),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

/// Same as [`pretty_block`] for a value that arrived as text.
pub fn pretty_text(text: &str) -> String {
    match serde_json::from_str::<Value>(text) {
        Ok(parsed) => serde_json::to_string_pretty(&parsed).unwrap_or_else(|_| text.to_string()),
        Err(_) => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn structured_values_are_indented() {
        let out = pretty_block(&json!({"zeta": 1, "alfa": "ñ"}));
        assert_eq!(out, "{\n  \"zeta\": 1,\n  \"alfa\": \"ñ\"\n}");
    }

    #[test]
    fn json_strings_are_reindented() {
        assert_eq!(pretty_block(&json!("[1,2]")), "[\n  1,\n  2\n]");
    }

    #[test]
    fn plain_text_is_kept() {
        assert_eq!(pretty_block(&json!("entrada: 3\nsalida: 6")), "entrada: 3\nsalida: 6");
        assert_eq!(pretty_block(&Value::Null), "");
    }
}
