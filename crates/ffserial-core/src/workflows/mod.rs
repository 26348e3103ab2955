//! # Workflows Module
//!
//! High-level entry points that turn plugin objects into documents and back.
//!
//! - **Document Driver** ([`document`]) - Tags the root node with the object's type,
//!   dispatches to the registered proxy, and reads or writes the result through
//!   [`XmlFormat`](crate::core::io::xml::XmlFormat).

pub mod document;
