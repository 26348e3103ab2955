use super::node::PropertyKind;
use thiserror::Error;

pub type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("Unsupported version {found} for type '{tag}' (supported: {min}..={max})")]
    UnsupportedVersion {
        tag: String,
        found: i64,
        min: i64,
        max: i64,
    },

    #[error("Property '{property}' not found on node '{node}'")]
    PropertyNotFound { node: String, property: String },

    #[error("Property '{property}' on node '{node}' is {found}, expected {expected}")]
    TypeMismatch {
        node: String,
        property: String,
        expected: PropertyKind,
        found: PropertyKind,
    },

    #[error("No serialization proxy registered for {0}")]
    UnknownType(String),

    #[error("Proxy for '{tag}' expected an object of type {expected}")]
    ObjectTypeMismatch { tag: String, expected: &'static str },

    #[error("Failed to construct '{tag}' object: {source}")]
    InvalidObject {
        tag: String,
        #[source]
        source: BoxedSource,
    },
}

impl SerializationError {
    pub fn invalid_object(
        tag: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::InvalidObject {
            tag: tag.into(),
            source: Box::new(source),
        }
    }
}
