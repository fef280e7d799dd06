use serde::Deserialize;

use super::parse_a1;

/// How a single field is extracted from the sheet grid.
///
/// `Dots` mirrors the base sheet's trait rows: the rating is the number of
/// filled cells in a horizontal span, plus a fixed bonus (attributes carry a
/// +1 that the printed sheet leaves implicit).
#[derive(Deserialize, Clone, Debug)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    Text { cell: String },
    Number { cell: String },
    Dots {
        cell: String,
        len: usize,
        #[serde(default)]
        bonus: u32,
    },
}

impl FieldKind {
    pub fn cell(&self) -> &str {
        match self {
            FieldKind::Text { cell } => cell,
            FieldKind::Number { cell } => cell,
            FieldKind::Dots { cell, .. } => cell,
        }
    }

    pub fn expected(&self) -> &'static str {
        match self {
            FieldKind::Text { .. } => "text",
            FieldKind::Number { .. } => "number",
            FieldKind::Dots { .. } => "dots",
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct FieldSpec {
    pub name: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
}

/// The base sheet template: the canonical set of fields every character sheet
/// must conform to. Loaded once at startup from the `BASE_SHEET` file and
/// immutable afterwards.
#[derive(Deserialize, Clone, Debug)]
pub struct SheetTemplate {
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug)]
pub enum TemplateError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Empty,
    DuplicateField(String),
    BadCell { field: String, cell: String },
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateError::Io(e) => write!(f, "could not read base sheet template: {e}"),
            TemplateError::Parse(e) => write!(f, "base sheet template is not valid JSON: {e}"),
            TemplateError::Empty => write!(f, "base sheet template defines no fields"),
            TemplateError::DuplicateField(name) => {
                write!(f, "base sheet template defines field '{name}' twice")
            }
            TemplateError::BadCell { field, cell } => {
                write!(f, "field '{field}' has invalid cell address '{cell}'")
            }
        }
    }
}

impl std::error::Error for TemplateError {}

impl SheetTemplate {
    pub fn load(path: &str) -> Result<Self, TemplateError> {
        let raw = std::fs::read_to_string(path).map_err(TemplateError::Io)?;
        let template: SheetTemplate =
            serde_json::from_str(&raw).map_err(TemplateError::Parse)?;
        template.validate()?;
        Ok(template)
    }

    /// Every cell address must parse and every field name must be unique, so
    /// the parser never has to handle a malformed template at command time.
    fn validate(&self) -> Result<(), TemplateError> {
        if self.fields.is_empty() {
            return Err(TemplateError::Empty);
        }
        let mut seen = std::collections::HashSet::new();
        for spec in &self.fields {
            if !seen.insert(spec.name.as_str()) {
                return Err(TemplateError::DuplicateField(spec.name.clone()));
            }
            if parse_a1(spec.kind.cell()).is_none() {
                return Err(TemplateError::BadCell {
                    field: spec.name.clone(),
                    cell: spec.kind.cell().to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_json(json: &str) -> Result<SheetTemplate, TemplateError> {
        let template: SheetTemplate = serde_json::from_str(json).map_err(TemplateError::Parse)?;
        template.validate()?;
        Ok(template)
    }

    #[test]
    fn test_template_parses_all_kinds() {
        let t = from_json(
            r#"{"fields": [
                {"name": "name", "kind": "text", "cell": "AS3", "required": true},
                {"name": "generation", "kind": "number", "cell": "AS13"},
                {"name": "strength", "kind": "dots", "cell": "I35", "len": 10, "bonus": 1}
            ]}"#,
        )
        .unwrap();
        assert_eq!(t.fields.len(), 3);
        assert!(t.fields[0].required);
        assert!(!t.fields[1].required);
        match &t.fields[2].kind {
            FieldKind::Dots { len, bonus, .. } => {
                assert_eq!(*len, 10);
                assert_eq!(*bonus, 1);
            }
            other => panic!("expected dots, got {other:?}"),
        }
    }

    #[test]
    fn test_template_rejects_empty() {
        assert!(matches!(
            from_json(r#"{"fields": []}"#),
            Err(TemplateError::Empty)
        ));
    }

    #[test]
    fn test_template_rejects_duplicate_names() {
        let result = from_json(
            r#"{"fields": [
                {"name": "name", "kind": "text", "cell": "A1"},
                {"name": "name", "kind": "text", "cell": "B1"}
            ]}"#,
        );
        assert!(matches!(result, Err(TemplateError::DuplicateField(n)) if n == "name"));
    }

    #[test]
    fn test_template_rejects_bad_cell() {
        let result = from_json(
            r#"{"fields": [{"name": "name", "kind": "text", "cell": "nope"}]}"#,
        );
        assert!(matches!(result, Err(TemplateError::BadCell { .. })));
    }

    #[test]
    fn test_dots_bonus_defaults_to_zero() {
        let t = from_json(
            r#"{"fields": [{"name": "brawl", "kind": "dots", "cell": "I44", "len": 10}]}"#,
        )
        .unwrap();
        match &t.fields[0].kind {
            FieldKind::Dots { bonus, .. } => assert_eq!(*bonus, 0),
            other => panic!("expected dots, got {other:?}"),
        }
    }
}
