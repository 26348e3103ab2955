//! # ffserial Core Library
//!
//! A versioned, extensible serialization layer that converts molecular force-field
//! plugin objects to and from a generic hierarchical property tree, and renders that
//! tree as a text document.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** The in-memory [`PropertyNode`](core::node::PropertyNode)
//!   tree, the [`SerializationProxy`](core::proxy::SerializationProxy) contract, the
//!   [`ProxyRegistry`](core::registry::ProxyRegistry) that maps type tags to proxies, and
//!   the text document format.
//!
//! - **[`forces`]: The Plugins.** Concrete plugin objects together with the proxies that
//!   know how to map them onto property trees (e.g. `TorchForce`).
//!
//! - **[`workflows`]: The Public API.** The document driver that ties the registry, the
//!   proxies and the text format together: object in, document out, and back.

pub mod core;
pub mod forces;
pub mod workflows;
