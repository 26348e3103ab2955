use super::error::SerializationError;
use super::node::PropertyNode;
use std::any::{Any, TypeId};
use std::ops::RangeInclusive;

/// The property every proxy writes first; the anchor for forward compatibility.
pub const VERSION_PROPERTY: &str = "version";

/// Converts one plugin object type to and from a [`PropertyNode`].
///
/// A proxy is stateless with respect to individual objects: one instance serializes and
/// deserializes every object of its type. Implementations are expected to:
///
/// - write [`VERSION_PROPERTY`] before anything else in [`serialize`](Self::serialize);
/// - gate [`deserialize`](Self::deserialize) on that version via [`check_version`];
/// - treat optional properties as "apply if present, otherwise keep the constructor
///   default" so that documents missing newer fields remain loadable.
pub trait SerializationProxy: Send + Sync {
    /// The concrete plugin type handled by this proxy.
    type Object: Any + Send;

    /// The tag naming [`Self::Object`] within documents.
    fn type_tag(&self) -> &'static str;

    /// Writes the object's configuration into `node`.
    ///
    /// # Errors
    ///
    /// Returns an error if the object cannot be represented as a property tree.
    fn serialize(
        &self,
        object: &Self::Object,
        node: &mut PropertyNode,
    ) -> Result<(), SerializationError>;

    /// Builds a new object from `node`.
    ///
    /// Either a fully constructed object is returned or an error; no partially
    /// configured object escapes.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::UnsupportedVersion`] for unknown versions,
    /// [`SerializationError::PropertyNotFound`] / [`SerializationError::TypeMismatch`]
    /// for malformed nodes and [`SerializationError::InvalidObject`] when the object
    /// rejects a value.
    fn deserialize(&self, node: &PropertyNode) -> Result<Self::Object, SerializationError>;
}

/// Object-safe view of a [`SerializationProxy`], operating on type-erased objects.
///
/// Every `SerializationProxy` is a `DynProxy` through a blanket implementation; the
/// registry stores proxies in this form.
pub trait DynProxy: Send + Sync {
    fn tag(&self) -> &str;

    fn object_type_id(&self) -> TypeId;

    fn object_type_name(&self) -> &'static str;

    fn serialize_dyn(
        &self,
        object: &dyn Any,
        node: &mut PropertyNode,
    ) -> Result<(), SerializationError>;

    fn deserialize_dyn(
        &self,
        node: &PropertyNode,
    ) -> Result<Box<dyn Any + Send>, SerializationError>;
}

impl<P: SerializationProxy> DynProxy for P {
    fn tag(&self) -> &str {
        SerializationProxy::type_tag(self)
    }

    fn object_type_id(&self) -> TypeId {
        TypeId::of::<P::Object>()
    }

    fn object_type_name(&self) -> &'static str {
        std::any::type_name::<P::Object>()
    }

    fn serialize_dyn(
        &self,
        object: &dyn Any,
        node: &mut PropertyNode,
    ) -> Result<(), SerializationError> {
        let object = object.downcast_ref::<P::Object>().ok_or_else(|| {
            SerializationError::ObjectTypeMismatch {
                tag: SerializationProxy::type_tag(self).to_owned(),
                expected: std::any::type_name::<P::Object>(),
            }
        })?;
        self.serialize(object, node)
    }

    fn deserialize_dyn(
        &self,
        node: &PropertyNode,
    ) -> Result<Box<dyn Any + Send>, SerializationError> {
        let object = self.deserialize(node)?;
        Ok(Box::new(object))
    }
}

/// Reads the node's version and checks it against the versions a proxy understands.
///
/// # Errors
///
/// Returns [`SerializationError::PropertyNotFound`] if the node has no version,
/// [`SerializationError::TypeMismatch`] if it is not an integer, and
/// [`SerializationError::UnsupportedVersion`] if it lies outside `supported`.
pub fn check_version(
    node: &PropertyNode,
    tag: &str,
    supported: RangeInclusive<i64>,
) -> Result<i64, SerializationError> {
    let version = node.int_property(VERSION_PROPERTY)?;
    if supported.contains(&version) {
        Ok(version)
    } else {
        Err(SerializationError::UnsupportedVersion {
            tag: tag.to_owned(),
            found: version,
            min: *supported.start(),
            max: *supported.end(),
        })
    }
}
