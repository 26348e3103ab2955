//! # Core Module
//!
//! The building blocks of the serialization framework, independent of any concrete
//! plugin type.
//!
//! ## Architecture
//!
//! - **Property Trees** ([`node`]) - Named nodes holding typed scalar properties and ordered children
//! - **Proxy Contract** ([`proxy`]) - Per-type adapters between plugin objects and property trees
//! - **Type Registry** ([`registry`]) - Lookup of proxies by type tag or by runtime type
//! - **Document I/O** ([`io`]) - Rendering property trees to text and parsing them back
//! - **Errors** ([`error`]) - The failure taxonomy shared by every proxy
//!
//! ## Data Flow
//!
//! A caller hands an object to the driver, the registry resolves the proxy for the
//! object's runtime type, the proxy fills a [`node::PropertyNode`], and the document
//! format renders the tree. Loading runs the same steps in reverse, dispatching on the
//! `type` property of the root node.

pub mod error;
pub mod io;
pub mod node;
pub mod proxy;
pub mod registry;
