//! Built-in type predicates and the validator registry.
//!
//! Every type tag resolves to a pure predicate over a single [`Value`].
//! The built-in tags form a closed enum dispatched through one exhaustive
//! match; deployments add tags only through [`ValidatorRegistry::register`]
//! while the registry is being built, never by mutating shared state later.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::types::Value;

static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("UUID pattern compiles")
});

static AUTH_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^Bearer [A-Za-z0-9-]+$").expect("Auth-Token pattern compiles"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .expect("Email pattern compiles")
});

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}-\d{2}-\d{4}$").expect("Date pattern compiles"));

/// Closed set of built-in type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// Integral number: any `Int`, or a `Float` with no fractional part.
    Int,
    /// Boolean value.
    Boolean,
    /// Any string.
    String,
    /// Ordered sequence (array-shaped value).
    List,
    /// String in canonical 8-4-4-4-12 hex UUID form, case-insensitive.
    Uuid,
    /// String of the form `Bearer <token>`, token drawn from `[A-Za-z0-9-]`.
    AuthToken,
    /// String shaped like `local@domain.tld`.
    Email,
    /// String shaped like `DD-MM-YYYY`. Shape only, no calendar check.
    Date,
}

impl TypeTag {
    /// All built-in tags, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Int,
        Self::Boolean,
        Self::String,
        Self::List,
        Self::Uuid,
        Self::AuthToken,
        Self::Email,
        Self::Date,
    ];

    /// Parses a wire tag (`"UUID"`, `"Auth-Token"`, ...) into a built-in tag.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "Int" => Some(Self::Int),
            "Boolean" => Some(Self::Boolean),
            "String" => Some(Self::String),
            "List" => Some(Self::List),
            "UUID" => Some(Self::Uuid),
            "Auth-Token" => Some(Self::AuthToken),
            "Email" => Some(Self::Email),
            "Date" => Some(Self::Date),
            _ => None,
        }
    }

    /// Wire name of the tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Int => "Int",
            Self::Boolean => "Boolean",
            Self::String => "String",
            Self::List => "List",
            Self::Uuid => "UUID",
            Self::AuthToken => "Auth-Token",
            Self::Email => "Email",
            Self::Date => "Date",
        }
    }

    /// Whether `value` satisfies this tag's predicate.
    ///
    /// Total over every [`Value`]: a non-matching or malformed input
    /// returns `false`, never panics.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Int => match value {
                Value::Int(_) => true,
                // NaN and infinities fall out here: their fract() is NaN.
                Value::Float(f) => f.fract() == 0.0,
                _ => false,
            },
            Self::Boolean => matches!(value, Value::Bool(_)),
            Self::String => matches!(value, Value::String(_)),
            Self::List => matches!(value, Value::Array(_)),
            Self::Uuid => value.as_str().is_some_and(|s| UUID_RE.is_match(s)),
            Self::AuthToken => value.as_str().is_some_and(|s| AUTH_TOKEN_RE.is_match(s)),
            Self::Email => value.as_str().is_some_and(|s| EMAIL_RE.is_match(s)),
            Self::Date => value.as_str().is_some_and(|s| DATE_RE.is_match(s)),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A custom check registered alongside the built-in tags.
pub type CustomCheck = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// A compiled, ready-to-run type predicate.
///
/// Cloning is cheap: built-ins are `Copy` and custom checks are shared
/// behind an `Arc`.
#[derive(Clone)]
pub enum Predicate {
    /// One of the built-in tags.
    Builtin(TypeTag),
    /// A check registered through [`ValidatorRegistry::register`].
    Custom {
        /// Wire name the check was registered under.
        tag: Arc<str>,
        /// The check itself.
        check: CustomCheck,
    },
}

impl Predicate {
    /// Whether `value` satisfies this predicate.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Builtin(tag) => tag.accepts(value),
            Self::Custom { check, .. } => check(value),
        }
    }

    /// Wire name of the predicate's tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Builtin(tag) => tag.as_str(),
            Self::Custom { tag, .. } => tag,
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate").field(&self.tag()).finish()
    }
}

/// Resolves wire type tags to predicates.
///
/// The built-in tags are always present and take precedence over custom
/// registrations of the same name. Registration happens only while the
/// registry is being built; once handed to an engine the set is fixed.
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    custom: HashMap<String, CustomCheck>,
}

impl ValidatorRegistry {
    /// Registry with built-in tags only.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a custom tag. Consuming builder, so the tag set is sealed by
    /// the time the registry reaches an engine.
    #[must_use]
    pub fn register(
        mut self,
        tag: impl Into<String>,
        check: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.custom.insert(tag.into(), Arc::new(check));
        self
    }

    /// Resolves a wire tag to its predicate. `None` means the tag is
    /// unknown, which rejects the whole model at compile time.
    #[must_use]
    pub fn resolve(&self, tag: &str) -> Option<Predicate> {
        if let Some(builtin) = TypeTag::parse(tag) {
            return Some(Predicate::Builtin(builtin));
        }
        self.custom.get(tag).map(|check| Predicate::Custom {
            tag: Arc::from(tag),
            check: Arc::clone(check),
        })
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<&str> = self.custom.keys().map(String::as_str).collect();
        tags.sort_unstable();
        f.debug_struct("ValidatorRegistry")
            .field("custom", &tags)
            .finish()
    }
}
