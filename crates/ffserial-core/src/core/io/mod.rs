//! Provides text document formats for property trees.
//!
//! A document format turns a [`PropertyNode`](crate::core::node::PropertyNode) tree into
//! text and back. Formats share the [`traits::DocumentFormat`] interface so that the
//! document driver can stay agnostic of the concrete encoding.

pub mod traits;
pub mod xml;
