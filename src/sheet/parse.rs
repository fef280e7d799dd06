use std::collections::BTreeMap;

use crate::character::FieldValue;

use super::template::{FieldKind, FieldSpec, SheetTemplate};
use super::{parse_a1, SheetGrid};

/// Errors raised when a sheet does not conform to the base sheet template.
#[derive(Debug)]
pub enum ValidationError {
    MissingField(String),
    TypeMismatch {
        field: String,
        expected: &'static str,
        got: String,
    },
    MalformedContent(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingField(name) => {
                write!(f, "The sheet is missing the required field '{name}'.")
            }
            ValidationError::TypeMismatch {
                field,
                expected,
                got,
            } => write!(
                f,
                "The field '{field}' should be a {expected}, but the sheet contains '{got}'."
            ),
            ValidationError::MalformedContent(detail) => {
                write!(f, "The sheet does not look like a character sheet: {detail}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Interpret the base sheet template over a raw grid.
///
/// Extraction is template-driven, so sheet content outside the template is
/// never read; unknown fields are dropped by construction. Optional fields
/// that are blank or outside the grid are simply omitted from the result.
pub fn parse(
    grid: &SheetGrid,
    template: &SheetTemplate,
) -> Result<BTreeMap<String, FieldValue>, ValidationError> {
    if grid.is_empty() {
        return Err(ValidationError::MalformedContent(
            "the worksheet contains no rows".to_string(),
        ));
    }

    let mut fields = BTreeMap::new();
    for spec in &template.fields {
        match extract(grid, spec)? {
            Some(value) => {
                fields.insert(spec.name.clone(), value);
            }
            None if spec.required => {
                return Err(ValidationError::MissingField(spec.name.clone()));
            }
            None => {}
        }
    }
    Ok(fields)
}

fn extract(grid: &SheetGrid, spec: &FieldSpec) -> Result<Option<FieldValue>, ValidationError> {
    // Cell addresses are validated at template load time.
    let Some(at) = parse_a1(spec.kind.cell()) else {
        return Err(ValidationError::MalformedContent(format!(
            "invalid cell address '{}' for field '{}'",
            spec.kind.cell(),
            spec.name
        )));
    };

    match &spec.kind {
        FieldKind::Text { .. } => {
            let value = grid.cell(at.row, at.col).map(str::trim).unwrap_or_default();
            if value.is_empty() {
                Ok(None)
            } else {
                Ok(Some(FieldValue::Text(value.to_string())))
            }
        }
        FieldKind::Number { .. } => {
            let value = grid.cell(at.row, at.col).map(str::trim).unwrap_or_default();
            if value.is_empty() {
                return Ok(None);
            }
            match value.parse::<i64>() {
                Ok(n) => Ok(Some(FieldValue::Number(n))),
                Err(_) => Err(ValidationError::TypeMismatch {
                    field: spec.name.clone(),
                    expected: spec.kind.expected(),
                    got: value.to_string(),
                }),
            }
        }
        FieldKind::Dots { len, bonus, .. } => {
            // A dot row that is entirely outside the grid counts as missing;
            // a present row with no filled cells is a legitimate zero rating.
            if !grid.has_row(at.row) {
                return Ok(None);
            }
            let filled = (0..*len)
                .filter_map(|offset| grid.cell(at.row, at.col + offset))
                .filter(|v| !v.trim().is_empty())
                .count() as u32;
            Ok(Some(FieldValue::Dots(filled + bonus)))
        }
    }
}
