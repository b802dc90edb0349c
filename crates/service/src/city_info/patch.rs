//! Partial updates for points of interest.
//!
//! The request body is a JSON-Patch style array of `{op, path, from?, value?}`
//! objects. It is parsed into [`PatchOperation`]s over the closed set of
//! patchable fields and applied, in order, to a copy of the update DTO. The
//! copy is re-validated afterwards; on any error the caller gets the error and
//! the original DTO is left as it was.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::dto::PointOfInterestForUpdateDto;
use super::validation::{DESCRIPTION_FIELD, NAME_FIELD};
use crate::errors::ValidationErrors;

/// One operation exactly as it arrives on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonPatchOperation {
    pub op: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// `None` when the member is absent; an explicit `null` is `Some(Value::Null)`.
    #[serde(default, deserialize_with = "present_value", skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

fn present_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl JsonPatchOperation {
    pub fn new(op: &str, path: &str, value: Option<Value>) -> Self {
        Self { op: op.to_string(), path: path.to_string(), from: None, value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchField {
    Name,
    Description,
}

impl PatchField {
    /// Resolve a JSON pointer such as `/name`. Matching ignores ASCII case.
    pub fn from_pointer(pointer: &str) -> Option<Self> {
        let segment = pointer.strip_prefix('/')?;
        if segment.eq_ignore_ascii_case(NAME_FIELD) {
            Some(Self::Name)
        } else if segment.eq_ignore_ascii_case(DESCRIPTION_FIELD) {
            Some(Self::Description)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => NAME_FIELD,
            Self::Description => DESCRIPTION_FIELD,
        }
    }

    fn get(self, target: &PointOfInterestForUpdateDto) -> Option<String> {
        match self {
            Self::Name => Some(target.name.clone()),
            Self::Description => target.description.clone(),
        }
    }

    /// `None` clears the field: an empty name, an absent description.
    fn set(self, target: &mut PointOfInterestForUpdateDto, value: Option<String>) {
        match self {
            Self::Name => target.name = value.unwrap_or_default(),
            Self::Description => target.description = value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOperation {
    Add { path: PatchField, value: Option<String> },
    Remove { path: PatchField },
    Replace { path: PatchField, value: Option<String> },
    Move { from: PatchField, path: PatchField },
    Copy { from: PatchField, path: PatchField },
    Test { path: PatchField, value: Option<String> },
}

impl PatchOperation {
    fn parse(raw: &JsonPatchOperation) -> Result<Self, (String, String)> {
        let path = PatchField::from_pointer(&raw.path).ok_or_else(|| {
            (raw.path.clone(), format!("The target location specified by path '{}' was not found.", raw.path))
        })?;

        let op = raw.op.to_ascii_lowercase();
        match op.as_str() {
            "add" => Ok(Self::Add { path, value: string_value(path, &op, raw.value.as_ref())? }),
            "remove" => Ok(Self::Remove { path }),
            "replace" => Ok(Self::Replace { path, value: string_value(path, &op, raw.value.as_ref())? }),
            "test" => Ok(Self::Test { path, value: string_value(path, &op, raw.value.as_ref())? }),
            "move" | "copy" => {
                let from_pointer = raw.from.as_deref().ok_or_else(|| {
                    (path.as_str().to_string(), format!("The 'from' location is required for '{op}'."))
                })?;
                let from = PatchField::from_pointer(from_pointer).ok_or_else(|| {
                    (
                        from_pointer.to_string(),
                        format!("The target location specified by path '{from_pointer}' was not found."),
                    )
                })?;
                if op == "move" { Ok(Self::Move { from, path }) } else { Ok(Self::Copy { from, path }) }
            }
            _ => Err((path.as_str().to_string(), format!("Invalid JsonPatch operation '{}'.", raw.op))),
        }
    }

    fn apply(&self, target: &mut PointOfInterestForUpdateDto) -> Result<(), (String, String)> {
        match *self {
            Self::Add { path, ref value } | Self::Replace { path, ref value } => path.set(target, value.clone()),
            Self::Remove { path } => path.set(target, None),
            Self::Move { from, path } => {
                if from != path {
                    let value = from.get(target);
                    from.set(target, None);
                    path.set(target, value);
                }
            }
            Self::Copy { from, path } => {
                let value = from.get(target);
                path.set(target, value);
            }
            Self::Test { path, ref value } => {
                let current = path.get(target);
                if current != *value {
                    return Err((
                        path.as_str().to_string(),
                        format!(
                            "The current value '{}' at path '{}' is not equal to the test value '{}'.",
                            current.unwrap_or_default(),
                            path.as_str(),
                            value.clone().unwrap_or_default()
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Patchable fields are strings; an explicit `null` clears. The member itself is required.
fn string_value(path: PatchField, op: &str, value: Option<&Value>) -> Result<Option<String>, (String, String)> {
    match value {
        None => Err((path.as_str().to_string(), format!("The 'value' member is required for '{op}'."))),
        Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err((
            path.as_str().to_string(),
            format!("The value '{other}' is invalid for target location."),
        )),
    }
}

/// A parsed, ordered list of operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchDocument {
    operations: Vec<PatchOperation>,
}

impl PatchDocument {
    pub fn new(operations: Vec<PatchOperation>) -> Self {
        Self { operations }
    }

    pub fn operations(&self) -> &[PatchOperation] {
        &self.operations
    }

    /// Apply every operation to a copy of `target`, then re-validate the copy.
    /// Either all operations take effect or `target`'s state is never exposed
    /// half-patched.
    pub fn apply_to(&self, target: &PointOfInterestForUpdateDto) -> Result<PointOfInterestForUpdateDto, ValidationErrors> {
        let mut working = target.clone();
        for operation in &self.operations {
            operation
                .apply(&mut working)
                .map_err(|(field, message)| ValidationErrors::single(field, message))?;
        }
        working.validate()?;
        Ok(working)
    }
}

impl TryFrom<Vec<JsonPatchOperation>> for PatchDocument {
    type Error = ValidationErrors;

    /// Every malformed operation is reported, not only the first.
    fn try_from(raw: Vec<JsonPatchOperation>) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();
        let mut operations = Vec::with_capacity(raw.len());
        for op in &raw {
            match PatchOperation::parse(op) {
                Ok(parsed) => operations.push(parsed),
                Err((field, message)) => errors.add(field, message),
            }
        }
        errors.into_result()?;
        Ok(Self { operations })
    }
}
