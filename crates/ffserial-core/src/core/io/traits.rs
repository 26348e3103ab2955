use crate::core::node::PropertyNode;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for encoding property trees as text documents.
///
/// Implementors render every node as an element whose attributes are the node's scalar
/// properties and whose nested elements are its children, in order. Parsing a rendered
/// document must yield a tree equal to the one that was written.
pub trait DocumentFormat {
    /// The error type for encoding and decoding.
    type Error: Error + From<io::Error>;

    /// Reads a property tree from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or the reader fails.
    fn read_from(reader: &mut impl BufRead) -> Result<PropertyNode, Self::Error>;

    /// Writes a property tree to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be represented or the writer fails.
    fn write_to(node: &PropertyNode, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Parses a property tree from an in-memory document.
    fn parse(text: &str) -> Result<PropertyNode, Self::Error> {
        Self::read_from(&mut text.as_bytes())
    }

    /// Renders a property tree to an in-memory document.
    fn render(node: &PropertyNode) -> Result<String, Self::Error> {
        let mut buffer = Vec::new();
        Self::write_to(node, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Reads a property tree from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<PropertyNode, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes a property tree to a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(node: &PropertyNode, path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(node, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
