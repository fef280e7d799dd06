pub mod store;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single template-defined value extracted from a sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Number(i64),
    Dots(u32),
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Dots(n) => write!(f, "{n}"),
        }
    }
}

/// One player character, parsed from a Google Sheet and keyed by its URL.
/// `fields` only ever contains keys defined by the base sheet template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub sheet_url: String,
    pub owner_id: String,
    pub fields: BTreeMap<String, FieldValue>,
    pub created_at: String,
    pub updated_at: String,
}

impl Character {
    pub fn new(sheet_url: String, owner_id: String, fields: BTreeMap<String, FieldValue>) -> Self {
        // Fixed-width fractional seconds so timestamps compare as strings.
        let now = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true);
        Self {
            sheet_url,
            owner_id,
            fields,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Display name for embeds and logs.
    pub fn name(&self) -> &str {
        match self.fields.get("name") {
            Some(FieldValue::Text(s)) if !s.is_empty() => s,
            _ => "Unknown",
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_from_fields() {
        let mut fields = BTreeMap::new();
        fields.insert("name".to_string(), FieldValue::Text("Lucien".to_string()));
        let c = Character::new("https://example".into(), "42".into(), fields);
        assert_eq!(c.name(), "Lucien");
    }

    #[test]
    fn test_name_fallback() {
        let c = Character::new("https://example".into(), "42".into(), BTreeMap::new());
        assert_eq!(c.name(), "Unknown");
    }

    #[test]
    fn test_new_sets_matching_timestamps() {
        let c = Character::new("https://example".into(), "42".into(), BTreeMap::new());
        assert_eq!(c.created_at, c.updated_at);
    }

    #[test]
    fn test_field_value_roundtrip() {
        let v = FieldValue::Dots(4);
        let json = serde_json::to_string(&v).unwrap();
        let back: FieldValue = serde_json::from_str(&json).unwrap();
        assert_eq!(v, back);
    }
}
