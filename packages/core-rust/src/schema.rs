//! Model compilation: raw descriptions into validator-ready schemas.
//!
//! A model description names, per section, the fields a request may carry,
//! which of them are required, and the acceptable types for each. Compiling
//! resolves every declared type tag to its predicate up front, so validation
//! never consults the registry. Compilation is atomic: any failure surfaces
//! before anything can reach the store.

use std::collections::{BTreeMap, HashMap};

use crate::types::{RouteKey, SectionName, Value};
use crate::validators::{Predicate, ValidatorRegistry};

/// Compiled shape of one request section.
///
/// Invariant: every name in the required list is also a key of the fields
/// map. An empty input section compiles to an empty schema, a valid state
/// distinct from the model being absent from the store.
#[derive(Debug, Clone, Default)]
pub struct SectionSchema {
    required_fields: Vec<String>,
    fields: HashMap<String, Vec<Predicate>>,
}

impl SectionSchema {
    /// Names that must appear in the observed section, in descriptor order.
    #[must_use]
    pub fn required_fields(&self) -> &[String] {
        &self.required_fields
    }

    /// Predicates declared for a field, in declaration order, or `None`
    /// for a field the model never mentioned.
    #[must_use]
    pub fn predicates_for(&self, name: &str) -> Option<&[Predicate]> {
        self.fields.get(name).map(Vec::as_slice)
    }

    /// Number of declared fields.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

/// Validator-ready form of one submitted model: one schema per section.
///
/// Immutable once compiled; resubmission for the same key replaces the
/// whole model, never a single section.
#[derive(Debug, Clone, Default)]
pub struct CompiledModel {
    query_params: SectionSchema,
    headers: SectionSchema,
    body: SectionSchema,
}

impl CompiledModel {
    /// Schema for the given section.
    #[must_use]
    pub fn section(&self, name: SectionName) -> &SectionSchema {
        match name {
            SectionName::QueryParams => &self.query_params,
            SectionName::Headers => &self.headers,
            SectionName::Body => &self.body,
        }
    }

    fn section_mut(&mut self, name: SectionName) -> &mut SectionSchema {
        match name {
            SectionName::QueryParams => &mut self.query_params,
            SectionName::Headers => &mut self.headers,
            SectionName::Body => &mut self.body,
        }
    }
}

/// Why a submitted model was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// The description is missing required structure.
    #[error("malformed model: {reason}")]
    MalformedModel {
        /// What was wrong, naming the offending section and index.
        reason: String,
    },
    /// A field declared a type tag the registry does not know.
    #[error("unknown type tag `{tag}`")]
    UnknownType {
        /// The unresolvable tag.
        tag: String,
    },
}

impl CompileError {
    fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedModel {
            reason: reason.into(),
        }
    }
}

/// Compiles a raw model description into its route key and validator-ready
/// form.
///
/// The description must be an object with string `path` and `method`
/// entries and the three sections `query_params`, `headers`, `body`, each
/// a list of `{name, required?, types}` field descriptors.
///
/// # Errors
///
/// [`CompileError::MalformedModel`] when the shape is wrong,
/// [`CompileError::UnknownType`] when a declared tag cannot be resolved.
pub fn compile_model(
    registry: &ValidatorRegistry,
    description: &Value,
) -> Result<(RouteKey, CompiledModel), CompileError> {
    let entries = description
        .as_map()
        .ok_or_else(|| CompileError::malformed("model description is not an object"))?;

    let path = string_entry(entries, "path")?;
    let method = string_entry(entries, "method")?;

    let mut model = CompiledModel::default();
    for section in SectionName::ALL {
        *model.section_mut(section) = compile_section(registry, entries, section)?;
    }

    Ok((RouteKey::new(path, method), model))
}

fn string_entry<'a>(
    entries: &'a BTreeMap<String, Value>,
    key: &str,
) -> Result<&'a str, CompileError> {
    entries
        .get(key)
        .ok_or_else(|| CompileError::malformed(format!("model is missing `{key}`")))?
        .as_str()
        .ok_or_else(|| CompileError::malformed(format!("model `{key}` is not a string")))
}

fn compile_section(
    registry: &ValidatorRegistry,
    entries: &BTreeMap<String, Value>,
    section: SectionName,
) -> Result<SectionSchema, CompileError> {
    let descriptors = entries
        .get(section.as_str())
        .ok_or_else(|| CompileError::malformed(format!("section `{section}` is missing")))?
        .as_array()
        .ok_or_else(|| CompileError::malformed(format!("section `{section}` is not a list")))?;

    let mut schema = SectionSchema::default();
    for (index, descriptor) in descriptors.iter().enumerate() {
        let field = descriptor
            .as_map()
            .ok_or_else(|| CompileError::malformed(format!("{section}[{index}] is not an object")))?;

        let name = field.get("name").and_then(Value::as_str).ok_or_else(|| {
            CompileError::malformed(format!("{section}[{index}] lacks a string `name`"))
        })?;

        let required = match field.get("required") {
            None => false,
            Some(Value::Bool(flag)) => *flag,
            Some(_) => {
                return Err(CompileError::malformed(format!(
                    "{section}[{index}] `required` is not a boolean"
                )))
            }
        };

        let declared = field
            .get("types")
            .ok_or_else(|| CompileError::malformed(format!("{section}[{index}] lacks `types`")))?
            .as_array()
            .ok_or_else(|| {
                CompileError::malformed(format!("{section}[{index}] `types` is not a list"))
            })?;

        let mut predicates = Vec::with_capacity(declared.len());
        for tag in declared {
            let tag = tag.as_str().ok_or_else(|| {
                CompileError::malformed(format!("{section}[{index}] has a non-string type tag"))
            })?;
            let predicate = registry.resolve(tag).ok_or_else(|| CompileError::UnknownType {
                tag: tag.to_string(),
            })?;
            predicates.push(predicate);
        }

        if required {
            schema.required_fields.push(name.to_string());
        }
        schema.fields.insert(name.to_string(), predicates);
    }

    Ok(schema)
}
