use crate::core::error::SerializationError;
use crate::core::io::traits::DocumentFormat;
use crate::core::io::xml::{XmlError, XmlFormat};
use crate::core::node::PropertyNode;
use crate::core::registry::{ProxyRegistry, global_registry};
use std::any::{Any, TypeId};
use std::io::{BufRead, Write};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};

/// Property on the root node naming the tag of the object stored beneath it.
pub const TYPE_PROPERTY: &str = "type";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),
    #[error("Document format error: {0}")]
    Format(#[from] XmlError),
}

/// Converts plugin objects to documents and back using the proxies in a [`ProxyRegistry`].
///
/// The root node of every document carries a [`TYPE_PROPERTY`] written before any
/// property of the proxy's own, so that loading can pick the proxy without knowing the
/// object type in advance.
#[derive(Debug, Clone, Copy)]
pub struct DocumentDriver<'r> {
    registry: &'r ProxyRegistry,
}

impl<'r> DocumentDriver<'r> {
    pub fn new(registry: &'r ProxyRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r ProxyRegistry {
        self.registry
    }

    /// Serializes `object` into a new root node named `root_name`.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::UnknownType`] if the object's runtime type has no
    /// registered proxy, or whatever the proxy itself reports.
    #[instrument(skip_all, fields(root = root_name))]
    pub fn to_node(
        &self,
        object: &dyn Any,
        root_name: &str,
    ) -> Result<PropertyNode, SerializationError> {
        let proxy = self.registry.proxy_for_object(object)?;
        debug!(tag = proxy.tag(), "Dispatching object to serialization proxy.");

        let mut root = PropertyNode::new(root_name);
        root.set_property(TYPE_PROPERTY, proxy.tag());
        proxy.serialize_dyn(object, &mut root)?;
        Ok(root)
    }

    /// Rebuilds the object described by `node`, choosing the proxy from its type tag.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::PropertyNotFound`] if the node has no type tag,
    /// [`SerializationError::UnknownType`] if the tag is not registered, or whatever the
    /// proxy reports.
    #[instrument(skip_all, fields(root = node.name()))]
    pub fn from_node(&self, node: &PropertyNode) -> Result<Box<dyn Any + Send>, SerializationError> {
        let tag = node.string_property(TYPE_PROPERTY)?;
        let proxy = self.registry.proxy(&tag)?;
        debug!(tag = %tag, "Dispatching node to serialization proxy.");
        proxy.deserialize_dyn(node)
    }

    /// Like [`from_node`](Self::from_node), but yields a concrete `T`.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::ObjectTypeMismatch`] if the node's tag belongs to a
    /// type other than `T`. The node is not deserialized in that case.
    pub fn from_node_as<T: Any>(&self, node: &PropertyNode) -> Result<T, SerializationError> {
        let tag = node.string_property(TYPE_PROPERTY)?;
        let proxy = self.registry.proxy(&tag)?;
        let mismatch = || SerializationError::ObjectTypeMismatch {
            tag: tag.to_string(),
            expected: std::any::type_name::<T>(),
        };
        if proxy.object_type_id() != TypeId::of::<T>() {
            return Err(mismatch());
        }

        let object = proxy.deserialize_dyn(node)?;
        object
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| mismatch())
    }

    pub fn write(
        &self,
        object: &dyn Any,
        root_name: &str,
        writer: &mut impl Write,
    ) -> Result<(), DocumentError> {
        let node = self.to_node(object, root_name)?;
        XmlFormat::write_to(&node, writer)?;
        Ok(())
    }

    pub fn read(&self, reader: &mut impl BufRead) -> Result<Box<dyn Any + Send>, DocumentError> {
        let node = XmlFormat::read_from(reader)?;
        Ok(self.from_node(&node)?)
    }

    pub fn read_as<T: Any>(&self, reader: &mut impl BufRead) -> Result<T, DocumentError> {
        let node = XmlFormat::read_from(reader)?;
        Ok(self.from_node_as(&node)?)
    }

    /// Renders `object` to an in-memory document.
    pub fn render(&self, object: &dyn Any, root_name: &str) -> Result<String, DocumentError> {
        let node = self.to_node(object, root_name)?;
        Ok(XmlFormat::render(&node)?)
    }

    /// Parses an in-memory document and rebuilds its object.
    pub fn parse(&self, text: &str) -> Result<Box<dyn Any + Send>, DocumentError> {
        let node = XmlFormat::parse(text)?;
        Ok(self.from_node(&node)?)
    }

    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn save(
        &self,
        object: &dyn Any,
        root_name: &str,
        path: impl AsRef<Path>,
    ) -> Result<(), DocumentError> {
        let node = self.to_node(object, root_name)?;
        XmlFormat::write_to_path(&node, path)?;
        Ok(())
    }

    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Box<dyn Any + Send>, DocumentError> {
        let node = XmlFormat::read_from_path(path)?;
        Ok(self.from_node(&node)?)
    }

    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load_as<T: Any>(&self, path: impl AsRef<Path>) -> Result<T, DocumentError> {
        let node = XmlFormat::read_from_path(path)?;
        Ok(self.from_node_as(&node)?)
    }
}

impl DocumentDriver<'static> {
    /// A driver over the process-wide registry.
    pub fn global() -> Self {
        Self::new(global_registry())
    }
}
