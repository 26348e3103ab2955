use super::error::SerializationError;
use super::proxy::{DynProxy, SerializationProxy};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;
use tracing::{debug, warn};

static GLOBAL_REGISTRY: OnceLock<ProxyRegistry> = OnceLock::new();

/// Maps type tags and runtime types to serialization proxies.
///
/// The registry owns every proxy registered with it. Registering a second proxy under an
/// existing tag replaces the first (last registration wins).
#[derive(Default)]
pub struct ProxyRegistry {
    proxies: HashMap<String, Box<dyn DynProxy>>,
    tags_by_type: HashMap<TypeId, String>,
}

impl ProxyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry pre-populated with every proxy shipped with this crate.
    pub fn with_builtin_proxies() -> Self {
        let mut registry = Self::new();
        crate::forces::register_builtin_proxies(&mut registry);
        registry
    }

    /// Registers `proxy` under its type tag.
    ///
    /// # Return
    ///
    /// Returns the proxy previously registered under the same tag, if any.
    pub fn register<P>(&mut self, proxy: P) -> Option<Box<dyn DynProxy>>
    where
        P: SerializationProxy + 'static,
    {
        let tag = SerializationProxy::type_tag(&proxy).to_owned();
        let type_id = TypeId::of::<P::Object>();

        let previous = self.proxies.insert(tag.clone(), Box::new(proxy));
        if let Some(old) = &previous {
            warn!(
                tag = %tag,
                replaced = old.object_type_name(),
                "Replacing previously registered serialization proxy."
            );
            let old_type = old.object_type_id();
            if self.tags_by_type.get(&old_type) == Some(&tag) {
                self.tags_by_type.remove(&old_type);
                // Another tag may still serve the displaced type.
                let fallback = self
                    .proxies
                    .iter()
                    .filter(|(t, p)| **t != tag && p.object_type_id() == old_type)
                    .map(|(t, _)| t)
                    .min()
                    .cloned();
                if let Some(fallback) = fallback {
                    debug!(tag = %fallback, "Runtime type falls back to another registered tag.");
                    self.tags_by_type.insert(old_type, fallback);
                }
            }
        }
        if let Some(old_tag) = self.tags_by_type.insert(type_id, tag.clone()) {
            if old_tag != tag {
                warn!(
                    tag = %tag,
                    previous_tag = %old_tag,
                    "Runtime type now resolves to a different tag."
                );
            }
        }

        debug!(
            tag = %tag,
            object_type = std::any::type_name::<P::Object>(),
            "Registered serialization proxy."
        );
        previous
    }

    /// Looks up the proxy registered under `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::UnknownType`] if no proxy uses that tag.
    pub fn proxy(&self, tag: &str) -> Result<&dyn DynProxy, SerializationError> {
        self.proxies
            .get(tag)
            .map(|p| &**p)
            .ok_or_else(|| SerializationError::UnknownType(format!("tag '{}'", tag)))
    }

    /// Looks up the proxy for an object through its runtime type.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::UnknownType`] if the runtime type was never registered.
    pub fn proxy_for_object(&self, object: &dyn Any) -> Result<&dyn DynProxy, SerializationError> {
        let tag = self.tags_by_type.get(&object.type_id()).ok_or_else(|| {
            SerializationError::UnknownType("an object of an unregistered runtime type".into())
        })?;
        self.proxy(tag)
    }

    pub fn proxy_for_type<T: Any>(&self) -> Result<&dyn DynProxy, SerializationError> {
        let tag = self.tag_for_type::<T>().ok_or_else(|| {
            SerializationError::UnknownType(format!("type {}", std::any::type_name::<T>()))
        })?;
        self.proxy(tag)
    }

    pub fn tag_for_type<T: Any>(&self) -> Option<&str> {
        self.tags_by_type
            .get(&TypeId::of::<T>())
            .map(String::as_str)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.proxies.contains_key(tag)
    }

    /// Returns all registered tags in lexical order.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.proxies.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }
}

impl fmt::Debug for ProxyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}

/// Returns the process-wide registry, building it with the built-in proxies on first use.
///
/// The process-wide registry is read-only once initialized, so it can be shared across
/// threads without locking.
pub fn global_registry() -> &'static ProxyRegistry {
    GLOBAL_REGISTRY.get_or_init(ProxyRegistry::with_builtin_proxies)
}

/// Installs `registry` as the process-wide registry.
///
/// Must run before the first call to [`global_registry`].
///
/// # Errors
///
/// Gives the registry back if a process-wide registry is already in place.
pub fn install_global_registry(registry: ProxyRegistry) -> Result<(), ProxyRegistry> {
    GLOBAL_REGISTRY.set(registry)
}
