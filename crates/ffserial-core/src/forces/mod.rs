//! # Forces Module
//!
//! Plugin force objects and the serialization proxies that map them onto property trees.
//!
//! ## Key Components
//!
//! - [`torch`] - The `TorchForce` configuration object (model file, force group, flags,
//!   global parameters)
//! - [`torch_proxy`] - `TorchForceProxy`, the versioned adapter for `TorchForce`
//! - [`params`] - Loading global-parameter tables from CSV files
//!
//! ## Usage
//!
//! Every proxy defined here is registered by [`register_builtin_proxies`], which is what
//! the process-wide registry uses on first access.
//!
//! ```ignore
//! use ffserial::core::registry::ProxyRegistry;
//!
//! let mut registry = ProxyRegistry::new();
//! ffserial::forces::register_builtin_proxies(&mut registry);
//! assert!(registry.contains("TorchForce"));
//! ```

pub mod params;
pub mod torch;
pub mod torch_proxy;

use crate::core::registry::ProxyRegistry;

pub fn register_builtin_proxies(registry: &mut ProxyRegistry) {
    registry.register(torch_proxy::TorchForceProxy);
}
