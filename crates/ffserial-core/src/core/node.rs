use super::error::SerializationError;
use std::borrow::Cow;
use std::fmt;

/// The scalar kinds a property can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Int,
    Float,
    Bool,
    String,
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropertyKind::Int => "int",
            PropertyKind::Float => "float",
            PropertyKind::Bool => "bool",
            PropertyKind::String => "string",
        };
        f.write_str(name)
    }
}

/// A single scalar property value stored on a [`PropertyNode`].
///
/// The [`Display`](fmt::Display) implementation produces the canonical text form used by
/// document formats. Floats are always rendered so that they carry a decimal point, an
/// exponent, `inf` or `NaN`, which keeps them distinguishable from integers.
///
/// Documents carry no type information, so values read from a document are strings and
/// the typed accessors parse that text on demand. Equality follows the same model: two
/// values are equal when their canonical text is equal, so `Int(3) == String("3")`, and a
/// tree compares equal to the tree parsed back from its own rendering.
#[derive(Debug, Clone)]
pub enum PropertyValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),
}

impl PropertyValue {
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::Int(_) => PropertyKind::Int,
            PropertyValue::Float(_) => PropertyKind::Float,
            PropertyValue::Bool(_) => PropertyKind::Bool,
            PropertyValue::String(_) => PropertyKind::String,
        }
    }

    /// Strings are parsed as decimal integers.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(v) => Some(*v),
            PropertyValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Integers widen to `f64` and strings are parsed; booleans are rejected.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(v) => Some(*v),
            PropertyValue::Int(v) => Some(*v as f64),
            PropertyValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Only the strings `true` and `false` read as booleans.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(v) => Some(*v),
            PropertyValue::String(s) => match s.trim() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Returns the canonical text of the value.
    ///
    /// Strings are borrowed as-is. Other kinds are rendered.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            PropertyValue::String(s) => Cow::Borrowed(s),
            other => Cow::Owned(other.to_string()),
        }
    }
}

impl PartialEq for PropertyValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropertyValue::String(a), PropertyValue::String(b)) => a == b,
            _ => self.as_text() == other.as_text(),
        }
    }
}

impl Eq for PropertyValue {}

fn format_float(value: f64) -> String {
    format!("{:?}", value)
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Int(v) => write!(f, "{}", v),
            PropertyValue::Float(v) => f.write_str(&format_float(*v)),
            PropertyValue::Bool(v) => write!(f, "{}", v),
            PropertyValue::String(v) => f.write_str(v),
        }
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Int(value.into())
    }
}

impl From<u32> for PropertyValue {
    fn from(value: u32) -> Self {
        PropertyValue::Int(value.into())
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<&String> for PropertyValue {
    fn from(value: &String) -> Self {
        PropertyValue::String(value.clone())
    }
}

/// A node in a serialization tree.
///
/// A node has a name, a set of uniquely named scalar properties kept in insertion order,
/// and an ordered list of child nodes it owns outright. Child names need not be unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyNode {
    name: String,
    properties: Vec<(String, PropertyValue)>,
    children: Vec<PropertyNode>,
}

impl PropertyNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stores a property, silently replacing any previous value with the same name.
    ///
    /// An overwritten property keeps its original position in the property order.
    pub fn set_property(
        &mut self,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> &mut Self {
        let name = name.into();
        let value = value.into();
        match self.properties.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.properties.push((name, value)),
        }
        self
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.iter().any(|(n, _)| n == name)
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn property(&self, name: &str) -> Result<&PropertyValue, SerializationError> {
        self.get(name)
            .ok_or_else(|| SerializationError::PropertyNotFound {
                node: self.name.clone(),
                property: name.to_owned(),
            })
    }

    pub fn remove_property(&mut self, name: &str) -> Option<PropertyValue> {
        let index = self.properties.iter().position(|(n, _)| n == name)?;
        Some(self.properties.remove(index).1)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.properties.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn int_property(&self, name: &str) -> Result<i64, SerializationError> {
        self.typed(name, PropertyKind::Int, PropertyValue::as_int)
    }

    pub fn float_property(&self, name: &str) -> Result<f64, SerializationError> {
        self.typed(name, PropertyKind::Float, PropertyValue::as_float)
    }

    pub fn bool_property(&self, name: &str) -> Result<bool, SerializationError> {
        self.typed(name, PropertyKind::Bool, PropertyValue::as_bool)
    }

    /// Reads a property as text. Any scalar kind is accepted and rendered canonically.
    pub fn string_property(&self, name: &str) -> Result<Cow<'_, str>, SerializationError> {
        self.property(name).map(PropertyValue::as_text)
    }

    pub fn optional_int_property(&self, name: &str) -> Result<Option<i64>, SerializationError> {
        self.optional(name, |node| node.int_property(name))
    }

    pub fn optional_float_property(
        &self,
        name: &str,
    ) -> Result<Option<f64>, SerializationError> {
        self.optional(name, |node| node.float_property(name))
    }

    pub fn optional_bool_property(&self, name: &str) -> Result<Option<bool>, SerializationError> {
        self.optional(name, |node| node.bool_property(name))
    }

    pub fn optional_string_property(
        &self,
        name: &str,
    ) -> Result<Option<Cow<'_, str>>, SerializationError> {
        self.optional(name, |node| node.string_property(name))
    }

    /// Appends a new, empty child node and returns it for population.
    pub fn create_child_node(&mut self, name: impl Into<String>) -> &mut PropertyNode {
        self.push_child(PropertyNode::new(name))
    }

    pub fn push_child(&mut self, child: PropertyNode) -> &mut PropertyNode {
        let index = self.children.len();
        self.children.push(child);
        &mut self.children[index]
    }

    pub fn children(&self) -> &[PropertyNode] {
        &self.children
    }

    pub fn children_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a PropertyNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub fn child(&self, name: &str) -> Option<&PropertyNode> {
        self.children.iter().find(|c| c.name == name)
    }

    fn typed<T>(
        &self,
        name: &str,
        expected: PropertyKind,
        extract: impl Fn(&PropertyValue) -> Option<T>,
    ) -> Result<T, SerializationError> {
        let value = self.property(name)?;
        extract(value).ok_or_else(|| SerializationError::TypeMismatch {
            node: self.name.clone(),
            property: name.to_owned(),
            expected,
            found: value.kind(),
        })
    }

    fn optional<'a, T>(
        &'a self,
        name: &str,
        read: impl FnOnce(&'a Self) -> Result<T, SerializationError>,
    ) -> Result<Option<T>, SerializationError> {
        if self.has_property(name) {
            read(self).map(Some)
        } else {
            Ok(None)
        }
    }
}
