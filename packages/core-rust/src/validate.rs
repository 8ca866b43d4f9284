//! Request validation against a compiled model.
//!
//! Walks the three sections in their fixed order and collects every
//! deviation: fields the model never mentioned, values no declared type
//! accepted, and required fields that never appeared. Pure given its two
//! inputs; performs no I/O and cannot block.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::schema::CompiledModel;
use crate::types::{SectionName, Value};

/// Kind of deviation between an observed request and the learned schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiscrepancyKind {
    /// The field is declared in the schema but no declared type accepted
    /// the observed value.
    #[serde(rename = "type mismatch")]
    TypeMismatch,
    /// The field does not appear in the schema at all.
    #[serde(rename = "unexpected field")]
    UnexpectedField,
    /// A required field was not observed.
    #[serde(rename = "missing required field")]
    MissingRequiredField,
}

/// One deviation of an observed request from its learned model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Discrepancy {
    /// Section the deviation was found in.
    pub section: SectionName,
    /// Field name involved.
    pub name: String,
    /// What went wrong.
    pub error: DiscrepancyKind,
    /// The offending value. Attached for every type mismatch — including
    /// `0`, `false`, and `null` — and absent for the other kinds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Outcome of validating one request against one model.
///
/// Serializes to `{"valid": true}` or
/// `{"valid": false, "abnormalFields": [...]}`; the list is omitted
/// entirely when the request conforms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    /// `true` iff no discrepancy was found in any section.
    pub valid: bool,
    /// Discrepancies in section order (`query_params`, `headers`, `body`);
    /// within a section, observed-field order first, missing-required last.
    #[serde(rename = "abnormalFields", skip_serializing_if = "Option::is_none")]
    pub abnormal_fields: Option<Vec<Discrepancy>>,
}

impl Verdict {
    fn from_discrepancies(found: Vec<Discrepancy>) -> Self {
        if found.is_empty() {
            Self {
                valid: true,
                abnormal_fields: None,
            }
        } else {
            Self {
                valid: false,
                abnormal_fields: Some(found),
            }
        }
    }
}

/// A request description the validator cannot walk.
///
/// Treated as caller error: the engine fails fast rather than guessing a
/// missing section's shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed request description: {reason}")]
pub struct MalformedRequest {
    /// What was wrong with the description.
    pub reason: String,
}

impl MalformedRequest {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Validates a parsed request description against a compiled model.
///
/// The description must be an object carrying the three sections, each a
/// list of `{name, value}` entries. A duplicate name within a section is
/// checked on every occurrence, and any occurrence counts as "seen" for
/// the required-field scan. An entry without a `value` key is validated
/// as `null`.
///
/// # Errors
///
/// [`MalformedRequest`] when the description is not an object, a section
/// is missing or not a list, or an entry lacks a string `name`.
pub fn validate_request(
    description: &Value,
    model: &CompiledModel,
) -> Result<Verdict, MalformedRequest> {
    let entries = description
        .as_map()
        .ok_or_else(|| MalformedRequest::new("request description is not an object"))?;

    let mut found = Vec::new();
    for section in SectionName::ALL {
        validate_section(section, entries, model, &mut found)?;
    }

    Ok(Verdict::from_discrepancies(found))
}

fn validate_section(
    section: SectionName,
    entries: &BTreeMap<String, Value>,
    model: &CompiledModel,
    found: &mut Vec<Discrepancy>,
) -> Result<(), MalformedRequest> {
    let observed = entries
        .get(section.as_str())
        .ok_or_else(|| MalformedRequest::new(format!("section `{section}` is missing")))?
        .as_array()
        .ok_or_else(|| MalformedRequest::new(format!("section `{section}` is not a list")))?;

    let schema = model.section(section);
    let mut seen: HashSet<&str> = HashSet::new();

    for (index, entry) in observed.iter().enumerate() {
        let field = entry
            .as_map()
            .ok_or_else(|| MalformedRequest::new(format!("{section}[{index}] is not an object")))?;
        let name = field.get("name").and_then(Value::as_str).ok_or_else(|| {
            MalformedRequest::new(format!("{section}[{index}] lacks a string `name`"))
        })?;
        let value = field.get("value").unwrap_or(&Value::Null);

        seen.insert(name);

        match schema.predicates_for(name) {
            None => found.push(Discrepancy {
                section,
                name: name.to_string(),
                error: DiscrepancyKind::UnexpectedField,
                value: None,
            }),
            Some(predicates) => {
                // OR across declared types, stopping at the first match.
                if !predicates.iter().any(|p| p.accepts(value)) {
                    found.push(Discrepancy {
                        section,
                        name: name.to_string(),
                        error: DiscrepancyKind::TypeMismatch,
                        value: Some(value.clone()),
                    });
                }
            }
        }
    }

    for name in schema.required_fields() {
        if !seen.contains(name.as_str()) {
            found.push(Discrepancy {
                section,
                name: name.clone(),
                error: DiscrepancyKind::MissingRequiredField,
                value: None,
            });
        }
    }

    Ok(())
}
