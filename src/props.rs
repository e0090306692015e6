//! Property values, property maps, and property specifications.
//!
//! Every value that flows through a render pass is a [`Value`] (JSON-shaped,
//! re-exported from `serde_json`). Maps of values are [`Props`], an
//! insertion-ordered `IndexMap` so iteration order is always the order in which
//! keys were written. A rule declares its properties as [`PropSpecs`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use serde_json::Value;

/// Insertion-ordered map of property name to value.
pub type Props = IndexMap<String, Value>;

/// Insertion-ordered map of property name to its specification.
pub type PropSpecs = IndexMap<String, PropSpec>;

/// Build a [`Props`] map from `key => value` pairs.
///
/// Values go through `Value::from`, so string slices, numbers, and booleans
/// can be written directly.
///
/// ```
/// use rule_render::props;
///
/// let p = props! { "title" => "Hello", "count" => 3 };
/// assert_eq!(p["title"], "Hello");
/// ```
#[macro_export]
macro_rules! props {
    () => {
        $crate::props::Props::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut __props = $crate::props::Props::new();
        $(
            __props.insert(::std::string::String::from($key), $crate::props::Value::from($value));
        )+
        __props
    }};
}

/// The sentinel "present" marker used as the value under a rule's name key
/// when the item carries no other payload for it.
pub fn present() -> Value {
    Value::Bool(true)
}

// ---------------------------------------------------------------------------
// PropType
// ---------------------------------------------------------------------------

/// Type tag of a declared property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropType {
    String,
    Number,
    Boolean,
    Array,
    Object,
    /// Any value, including `null`.
    #[default]
    Any,
}

impl PropType {
    /// Whether `value` has this type. `Any` accepts everything.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            PropType::String => value.is_string(),
            PropType::Number => value.is_number(),
            PropType::Boolean => value.is_boolean(),
            PropType::Array => value.is_array(),
            PropType::Object => value.is_object(),
            PropType::Any => true,
        }
    }

    /// Lowercase name, as used in serialized specs and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            PropType::String => "string",
            PropType::Number => "number",
            PropType::Boolean => "boolean",
            PropType::Array => "array",
            PropType::Object => "object",
            PropType::Any => "any",
        }
    }
}

impl std::fmt::Display for PropType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PropSpec
// ---------------------------------------------------------------------------

/// Specification of one declared property.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PropSpec {
    /// Expected value type.
    #[serde(rename = "type", default)]
    pub ty: PropType,
    /// Default applied when neither the component binding nor the item
    /// supplies a value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Whether the property must be supplied. Required properties carry no
    /// default.
    #[serde(default)]
    pub required: bool,
    /// Whether the property is exposed as a bindable property on the produced
    /// component.
    #[serde(default)]
    pub input: bool,
}

impl PropSpec {
    /// A spec of the given type with no default, not required, not input.
    pub fn new(ty: PropType) -> Self {
        Self {
            ty,
            ..Self::default()
        }
    }

    /// Shorthand for `PropSpec::new(PropType::String)`.
    pub fn string() -> Self {
        Self::new(PropType::String)
    }

    /// Shorthand for `PropSpec::new(PropType::Number)`.
    pub fn number() -> Self {
        Self::new(PropType::Number)
    }

    /// Shorthand for `PropSpec::new(PropType::Boolean)`.
    pub fn boolean() -> Self {
        Self::new(PropType::Boolean)
    }

    /// Shorthand for `PropSpec::new(PropType::Any)`.
    pub fn any() -> Self {
        Self::new(PropType::Any)
    }

    /// Set the default value (builder).
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Mark as required (builder).
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark as an input (externally bindable) property (builder).
    pub fn input(mut self) -> Self {
        self.input = true;
        self
    }
}

/// Convert a JSON object into [`Props`]. Returns `None` for any other value.
pub fn props_from_value(value: Value) -> Option<Props> {
    match value {
        Value::Object(map) => Some(map.into_iter().collect()),
        _ => None,
    }
}

/// Convert [`Props`] into a JSON object value.
pub fn props_to_value(props: &Props) -> Value {
    Value::Object(
        props
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    )
}
