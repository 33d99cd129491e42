use std::collections::HashMap;

use serde_json::Value;

/// Flat translation table keyed by dotted paths, e.g.
/// `translation.help.embedTitle`.
///
/// Loaded from the host's translation file (nested JSON objects are
/// flattened into dotted keys). Values are used verbatim in user-facing
/// text; templates may carry placeholders such as `<COMMAND>` that the
/// consumer substitutes.
#[derive(Debug, Default, Clone)]
pub struct Translations {
    entries: HashMap<String, String>,
}

impl Translations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten a JSON document into dotted keys. Non-string leaves are
    /// ignored.
    pub fn from_json(value: &Value) -> Self {
        let mut entries = HashMap::new();
        flatten("", value, &mut entries);
        Self { entries }
    }

    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(key.into(), text.into());
    }

    /// Missing keys resolve to the key itself, so a hole in the
    /// translation file stays visible instead of rendering blank.
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        self.entries.get(key).map(String::as_str).unwrap_or(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn flatten(prefix: &str, value: &Value, out: &mut HashMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, child, out);
            }
        },
        Value::String(text) => {
            out.insert(prefix.to_string(), text.clone());
        },
        _ => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_objects_flatten_to_dotted_keys() {
        let json = serde_json::json!({
            "translation": {
                "help": {
                    "embedTitle": "Commands",
                    "notFound": "Command <COMMAND> not found!",
                }
            }
        });
        let translations = Translations::from_json(&json);
        assert_eq!(translations.len(), 2);
        assert_eq!(translations.get("translation.help.embedTitle"), "Commands");
        assert_eq!(
            translations.get("translation.help.notFound"),
            "Command <COMMAND> not found!"
        );
    }

    #[test]
    fn missing_key_falls_back_to_key() {
        let translations = Translations::new();
        assert!(translations.is_empty());
        assert_eq!(
            translations.get("translation.help.embedTitle"),
            "translation.help.embedTitle"
        );
    }

    #[test]
    fn non_string_leaves_are_ignored() {
        let json = serde_json::json!({
            "translation": { "count": 3, "enabled": true, "title": "ok" }
        });
        let translations = Translations::from_json(&json);
        assert_eq!(translations.len(), 1);
        assert_eq!(translations.get("translation.title"), "ok");
    }

    #[test]
    fn insert_overrides_loaded_value() {
        let json = serde_json::json!({ "a": { "b": "old" } });
        let mut translations = Translations::from_json(&json);
        translations.insert("a.b", "new");
        assert_eq!(translations.get("a.b"), "new");
    }
}
