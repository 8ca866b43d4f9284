use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Generic runtime value for model descriptions and observed request fields.
///
/// Mirrors the JSON data model; transports deserialize payloads directly
/// into this enum. Untagged, so `5` becomes `Int`, `5.5` becomes `Float`,
/// `"x"` becomes `String`, and so on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// JSON null.
    Null,
    /// JSON boolean.
    Bool(bool),
    /// JSON integer (signed 64-bit).
    Int(i64),
    /// JSON floating-point (64-bit IEEE 754).
    Float(f64),
    /// JSON string (UTF-8).
    String(String),
    /// JSON array (ordered sequence of values).
    Array(Vec<Value>),
    /// JSON object. Uses `BTreeMap` for deterministic serialization order.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Returns the string slice if this value is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the element slice if this value is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entry map if this value is an object.
    #[must_use]
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }
}

/// Composite key identifying one learned model: exact path plus exact method.
///
/// No path templating and no wildcard methods; `/users/7` and `/users/8`
/// are distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteKey {
    /// Request path, matched verbatim.
    pub path: String,
    /// HTTP method, matched verbatim.
    pub method: String,
}

impl RouteKey {
    /// Creates a key from a path and a method.
    #[must_use]
    pub fn new(path: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// The three fixed request sections every model describes.
///
/// The compiler and the validator both walk sections in [`Self::ALL`] order,
/// so discrepancy output is deterministic for a given request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionName {
    /// Query-string parameters.
    #[serde(rename = "query_params")]
    QueryParams,
    /// HTTP headers.
    #[serde(rename = "headers")]
    Headers,
    /// Request body fields.
    #[serde(rename = "body")]
    Body,
}

impl SectionName {
    /// Stable section iteration order.
    pub const ALL: [Self; 3] = [Self::QueryParams, Self::Headers, Self::Body];

    /// Wire name of the section, as it appears in model and request JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::QueryParams => "query_params",
            Self::Headers => "headers",
            Self::Body => "body",
        }
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Value {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn untagged_deserialization_picks_natural_variants() {
        assert_eq!(parse("null"), Value::Null);
        assert_eq!(parse("true"), Value::Bool(true));
        assert_eq!(parse("5"), Value::Int(5));
        assert_eq!(parse("5.5"), Value::Float(5.5));
        assert_eq!(parse("\"five\""), Value::String("five".to_string()));
        assert_eq!(
            parse("[1, 2]"),
            Value::Array(vec![Value::Int(1), Value::Int(2)])
        );
    }

    #[test]
    fn integral_float_stays_a_float() {
        // 5.0 carries a decimal point on the wire, so it parses as Float,
        // not Int. The Int type predicate still accepts it.
        assert_eq!(parse("5.0"), Value::Float(5.0));
    }

    #[test]
    fn object_deserializes_to_map() {
        let value = parse(r#"{"name": "id", "value": 7}"#);
        let entries = value.as_map().unwrap();
        assert_eq!(entries.get("name").unwrap().as_str(), Some("id"));
        assert_eq!(entries.get("value"), Some(&Value::Int(7)));
    }

    #[test]
    fn accessors_reject_other_variants() {
        assert!(Value::Int(1).as_str().is_none());
        assert!(Value::String("x".into()).as_array().is_none());
        assert!(Value::Array(vec![]).as_map().is_none());
    }

    #[test]
    fn route_key_display_is_method_then_path() {
        let key = RouteKey::new("/users", "GET");
        assert_eq!(key.to_string(), "GET /users");
    }

    #[test]
    fn section_names_serialize_to_wire_form() {
        for section in SectionName::ALL {
            let encoded = serde_json::to_string(&section).unwrap();
            assert_eq!(encoded, format!("\"{}\"", section.as_str()));
        }
    }

    #[test]
    fn section_order_is_query_params_headers_body() {
        let names: Vec<&str> = SectionName::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["query_params", "headers", "body"]);
    }
}
