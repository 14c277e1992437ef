use serde_json::Value;

use crate::error::OverlapError;

/// One structured edit: replace lines `[start, end)` (1-based) with `code`.
///
/// `start == end` is a pure insertion before line `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDescriptor {
    pub code: String,
    pub start: usize,
    pub end: usize,
}

impl EditDescriptor {
    #[must_use]
    pub fn new(code: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            code: code.into(),
            start,
            end,
        }
    }

    /// Reads `code`, `start` and `end` from one parsed block object.
    ///
    /// Extra fields are ignored. The error is a human-readable reason suitable for
    /// [`crate::ParseError::ContractViolation`].
    pub fn from_value(value: &Value) -> Result<Self, String> {
        let Value::Object(fields) = value else {
            return Err(format!("expected an object, found {}", json_kind(value)));
        };

        let code = match fields.get("code") {
            Some(Value::String(code)) => code.clone(),
            Some(other) => {
                return Err(format!(
                    "field 'code' must be a string, found {}",
                    json_kind(other)
                ))
            }
            None => return Err("missing required field 'code'".to_string()),
        };
        let start = line_field(fields.get("start"), "start")?;
        let end = line_field(fields.get("end"), "end")?;

        Ok(Self { code, start, end })
    }
}

fn line_field(value: Option<&Value>, name: &str) -> Result<usize, String> {
    let Some(value) = value else {
        return Err(format!("missing required field '{name}'"));
    };

    value
        .as_u64()
        .and_then(|line| usize::try_from(line).ok())
        .ok_or_else(|| {
            format!(
                "field '{name}' must be a non-negative integer, found {}",
                value
            )
        })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Sorts a batch by `(start, end)` and rejects overlapping neighbours.
///
/// Touching edits (`end == next.start`) are accepted.
pub fn sorted_edits(mut edits: Vec<EditDescriptor>) -> Result<Vec<EditDescriptor>, OverlapError> {
    edits.sort_by_key(|edit| (edit.start, edit.end));

    for pair in edits.windows(2) {
        if pair[0].end > pair[1].start {
            return Err(OverlapError {
                first: pair[0].clone(),
                second: pair[1].clone(),
            });
        }
    }

    Ok(edits)
}

/// A batch that passed [`sorted_edits`]: ascending and non-overlapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBatch {
    edits: Vec<EditDescriptor>,
}

impl EditBatch {
    pub fn validate(edits: Vec<EditDescriptor>) -> Result<Self, OverlapError> {
        sorted_edits(edits).map(|edits| Self { edits })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Ascending `(start, end)` order.
    #[must_use]
    pub fn edits(&self) -> &[EditDescriptor] {
        &self.edits
    }

    /// Application order: bottom of the file first, so pending edits keep their line numbers.
    pub fn descending(&self) -> impl Iterator<Item = &EditDescriptor> {
        self.edits.iter().rev()
    }
}
