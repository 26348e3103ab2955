use super::traits::DocumentFormat;
use crate::core::node::{PropertyNode, PropertyValue};
use phf::{Map, phf_map};
use std::borrow::Cow;
use std::io::{self, BufRead, Write};
use thiserror::Error;

const DECLARATION: &str = r#"<?xml version="1.0" ?>"#;
const MAX_REFERENCE_LEN: usize = 16;
const SNIPPET_LEN: usize = 24;
/// Deepest element nesting accepted by the parser; the root is at depth 1.
pub const MAX_DEPTH: usize = 256;

static NAMED_ENTITIES: Map<&'static str, char> = phf_map! {
    "amp" => '&',
    "lt" => '<',
    "gt" => '>',
    "quot" => '"',
    "apos" => '\'',
};

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: XmlParseErrorKind },
    #[error("Invalid {what} name '{name}'")]
    InvalidName { what: &'static str, name: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum XmlParseErrorKind {
    #[error("Unexpected end of document")]
    UnexpectedEof,
    #[error("Expected {expected}, found '{found}'")]
    Unexpected { expected: &'static str, found: char },
    #[error("Closing tag '</{found}>' does not match opening tag '<{open}>'")]
    MismatchedTag { open: String, found: String },
    #[error("Duplicate attribute '{0}'")]
    DuplicateAttribute(String),
    #[error("Unknown entity '&{0};'")]
    UnknownEntity(String),
    #[error("Invalid character reference '&{0};'")]
    InvalidCharRef(String),
    #[error("Unterminated {0}")]
    Unterminated(&'static str),
    #[error("Text content is not allowed (found '{0}')")]
    UnexpectedText(String),
    #[error("Document has more than one root element")]
    MultipleRoots,
    #[error("Document has no root element")]
    MissingRoot,
    #[error("Elements are nested more than {0} levels deep")]
    TooDeep(usize),
}

/// XML-style markup: one element per node, properties as attributes, children nested.
///
/// ```text
/// <?xml version="1.0" ?>
/// <Force type="TorchForce" version="1" file="model.pt">
///     <GlobalParameters>
///         <Parameter name="k" default="1.5"/>
///     </GlobalParameters>
/// </Force>
/// ```
///
/// Attribute values are untyped text in the document and are read back as
/// [`PropertyValue::String`]; the typed accessors on [`PropertyNode`] parse them on demand.
pub struct XmlFormat;

impl DocumentFormat for XmlFormat {
    type Error = XmlError;

    fn read_from(reader: &mut impl BufRead) -> Result<PropertyNode, Self::Error> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Parser::new(&text).document()
    }

    fn write_to(node: &PropertyNode, writer: &mut impl Write) -> Result<(), Self::Error> {
        writeln!(writer, "{}", DECLARATION)?;
        write_node(node, 0, writer)
    }
}

fn write_node(node: &PropertyNode, depth: usize, writer: &mut impl Write) -> Result<(), XmlError> {
    check_name(node.name(), "element")?;
    write_indent(depth, writer)?;
    write!(writer, "<{}", node.name())?;
    for (name, value) in node.properties() {
        check_name(name, "attribute")?;
        write!(writer, " {}=\"{}\"", name, escape(&value.as_text()))?;
    }

    if node.children().is_empty() {
        writeln!(writer, "/>")?;
        return Ok(());
    }

    writeln!(writer, ">")?;
    for child in node.children() {
        write_node(child, depth + 1, writer)?;
    }
    write_indent(depth, writer)?;
    writeln!(writer, "</{}>", node.name())?;
    Ok(())
}

fn write_indent(depth: usize, writer: &mut impl Write) -> io::Result<()> {
    for _ in 0..depth {
        writer.write_all(b"\t")?;
    }
    Ok(())
}

fn check_name(name: &str, what: &'static str) -> Result<(), XmlError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(XmlError::InvalidName {
            what,
            name: name.to_owned(),
        })
    }
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(is_name_start) && chars.all(is_name_char)
}

fn escape(text: &str) -> Cow<'_, str> {
    let needs_escape = |c: char| matches!(c, '&' | '<' | '>' | '"' | '\'') || c.is_control();
    if !text.chars().any(needs_escape) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c if c.is_control() => escaped.push_str(&format!("&#{};", c as u32)),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
        }
    }

    fn document(mut self) -> Result<PropertyNode, XmlError> {
        self.advance("\u{feff}");
        self.skip_misc()?;
        if self.peek().is_none() {
            return Err(self.error(XmlParseErrorKind::MissingRoot));
        }

        let root = self.element(1)?;
        self.skip_misc()?;
        match self.peek() {
            None => Ok(root),
            Some('<') => Err(self.error(XmlParseErrorKind::MultipleRoots)),
            Some(_) => Err(self.error(XmlParseErrorKind::UnexpectedText(self.snippet()))),
        }
    }

    fn element(&mut self, depth: usize) -> Result<PropertyNode, XmlError> {
        if depth > MAX_DEPTH {
            return Err(self.error(XmlParseErrorKind::TooDeep(MAX_DEPTH)));
        }
        self.expect('<', "'<'")?;
        let name = self.name()?;
        let mut node = PropertyNode::new(name);

        loop {
            let separated = self.skip_whitespace();
            match self.peek() {
                Some('/') => {
                    self.bump();
                    self.expect('>', "'>'")?;
                    return Ok(node);
                }
                Some('>') => {
                    self.bump();
                    break;
                }
                Some(c) if !separated => {
                    return Err(self.error(XmlParseErrorKind::Unexpected {
                        expected: "whitespace before attribute",
                        found: c,
                    }));
                }
                Some(_) => {
                    let attribute = self.name()?;
                    self.skip_whitespace();
                    self.expect('=', "'='")?;
                    self.skip_whitespace();
                    let value = self.attribute_value()?;
                    if node.has_property(attribute) {
                        return Err(self.error(XmlParseErrorKind::DuplicateAttribute(
                            attribute.to_owned(),
                        )));
                    }
                    node.set_property(attribute, PropertyValue::String(value));
                }
                None => return Err(self.error(XmlParseErrorKind::UnexpectedEof)),
            }
        }

        loop {
            self.skip_whitespace();
            if self.advance("<!--") {
                self.skip_until("-->", "comment")?;
            } else if self.advance("<?") {
                self.skip_until("?>", "processing instruction")?;
            } else if self.advance("</") {
                let closing = self.name()?;
                self.skip_whitespace();
                self.expect('>', "'>'")?;
                if closing != name {
                    return Err(self.error(XmlParseErrorKind::MismatchedTag {
                        open: name.to_owned(),
                        found: closing.to_owned(),
                    }));
                }
                return Ok(node);
            } else {
                match self.peek() {
                    Some('<') => {
                        let child = self.element(depth + 1)?;
                        node.push_child(child);
                    }
                    Some(_) => {
                        return Err(self.error(XmlParseErrorKind::UnexpectedText(self.snippet())));
                    }
                    None => return Err(self.error(XmlParseErrorKind::UnexpectedEof)),
                }
            }
        }
    }

    fn name(&mut self) -> Result<&'a str, XmlError> {
        let start = self.pos;
        match self.peek() {
            Some(c) if is_name_start(c) => {
                self.bump();
            }
            Some(c) => {
                return Err(self.error(XmlParseErrorKind::Unexpected {
                    expected: "a name",
                    found: c,
                }));
            }
            None => return Err(self.error(XmlParseErrorKind::UnexpectedEof)),
        }
        while self.peek().is_some_and(is_name_char) {
            self.bump();
        }
        let src = self.src;
        Ok(&src[start..self.pos])
    }

    fn attribute_value(&mut self) -> Result<String, XmlError> {
        let quote = match self.bump() {
            Some(q @ ('"' | '\'')) => q,
            Some(c) => {
                return Err(self.error(XmlParseErrorKind::Unexpected {
                    expected: "a quoted value",
                    found: c,
                }));
            }
            None => return Err(self.error(XmlParseErrorKind::UnexpectedEof)),
        };

        let mut value = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(value),
                Some('&') => value.push(self.reference()?),
                Some('<') => {
                    return Err(self.error(XmlParseErrorKind::Unexpected {
                        expected: "attribute text",
                        found: '<',
                    }));
                }
                Some(c) => value.push(c),
                None => return Err(self.error(XmlParseErrorKind::Unterminated("attribute value"))),
            }
        }
    }

    fn reference(&mut self) -> Result<char, XmlError> {
        let start = self.pos;
        loop {
            match self.bump() {
                Some(';') => break,
                Some(_) if self.pos - start <= MAX_REFERENCE_LEN => {}
                _ => return Err(self.error(XmlParseErrorKind::Unterminated("entity reference"))),
            }
        }
        let src = self.src;
        let body = &src[start..self.pos - 1];

        let code = if let Some(hex) = body.strip_prefix("#x") {
            Some(u32::from_str_radix(hex, 16))
        } else {
            body.strip_prefix('#').map(str::parse::<u32>)
        };
        match code {
            Some(code) => code
                .ok()
                .and_then(char::from_u32)
                .filter(|&c| c != '\0')
                .ok_or_else(|| self.error(XmlParseErrorKind::InvalidCharRef(body.to_owned()))),
            None => NAMED_ENTITIES
                .get(body)
                .copied()
                .ok_or_else(|| self.error(XmlParseErrorKind::UnknownEntity(body.to_owned()))),
        }
    }

    fn skip_misc(&mut self) -> Result<(), XmlError> {
        loop {
            self.skip_whitespace();
            if self.advance("<?") {
                self.skip_until("?>", "processing instruction")?;
            } else if self.advance("<!--") {
                self.skip_until("-->", "comment")?;
            } else {
                return Ok(());
            }
        }
    }

    fn skip_until(&mut self, terminator: &str, what: &'static str) -> Result<(), XmlError> {
        loop {
            if self.advance(terminator) {
                return Ok(());
            }
            if self.bump().is_none() {
                return Err(self.error(XmlParseErrorKind::Unterminated(what)));
            }
        }
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.pos > start
    }

    fn expect(&mut self, wanted: char, expected: &'static str) -> Result<(), XmlError> {
        match self.bump() {
            Some(c) if c == wanted => Ok(()),
            Some(c) => Err(self.error(XmlParseErrorKind::Unexpected { expected, found: c })),
            None => Err(self.error(XmlParseErrorKind::UnexpectedEof)),
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn advance(&mut self, literal: &str) -> bool {
        if self.src[self.pos..].starts_with(literal) {
            for _ in literal.chars() {
                self.bump();
            }
            true
        } else {
            false
        }
    }

    fn snippet(&self) -> String {
        self.src[self.pos..]
            .chars()
            .take_while(|&c| c != '<')
            .take(SNIPPET_LEN)
            .collect::<String>()
            .trim()
            .to_owned()
    }

    fn error(&self, kind: XmlParseErrorKind) -> XmlError {
        XmlError::Parse {
            line: self.line,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::node::PropertyKind;
    use tempfile::tempdir;

    fn sample_tree() -> PropertyNode {
        let mut root = PropertyNode::new("Force");
        root.set_property("type", "TorchForce")
            .set_property("version", 1)
            .set_property("file", "model.pt")
            .set_property("forceGroup", 3)
            .set_property("usesPeriodic", true)
            .set_property("outputsForces", false);
        let params = root.create_child_node("GlobalParameters");
        params
            .create_child_node("Parameter")
            .set_property("name", "k")
            .set_property("default", 1.5);
        params
            .create_child_node("Parameter")
            .set_property("name", "r0")
            .set_property("default", 2.0);
        root
    }

    fn parse_error_kind(text: &str) -> XmlParseErrorKind {
        match XmlFormat::parse(text) {
            Err(XmlError::Parse { kind, .. }) => kind,
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn write_renders_attributes_in_order_and_nests_children() {
        let text = XmlFormat::render(&sample_tree()).unwrap();
        let expected = "<?xml version=\"1.0\" ?>\n\
            <Force type=\"TorchForce\" version=\"1\" file=\"model.pt\" forceGroup=\"3\" usesPeriodic=\"true\" outputsForces=\"false\">\n\
            \t<GlobalParameters>\n\
            \t\t<Parameter name=\"k\" default=\"1.5\"/>\n\
            \t\t<Parameter name=\"r0\" default=\"2.0\"/>\n\
            \t</GlobalParameters>\n\
            </Force>\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn render_then_parse_yields_identical_tree() {
        let tree = sample_tree();
        let text = XmlFormat::render(&tree).unwrap();
        assert_eq!(XmlFormat::parse(&text).unwrap(), tree);
    }

    #[test]
    fn special_characters_survive_a_round_trip() {
        let mut root = PropertyNode::new("Force");
        root.set_property("file", "a&b <c> \"d\" 'e'\tf\ng");
        let text = XmlFormat::render(&root).unwrap();
        assert!(text.contains("a&amp;b &lt;c&gt; &quot;d&quot; &apos;e&apos;&#9;f&#10;g"));
        assert_eq!(XmlFormat::parse(&text).unwrap(), root);
    }

    #[test]
    fn numeric_looking_strings_keep_their_type_through_a_round_trip() {
        let mut root = PropertyNode::new("Force");
        root.set_property("file", "42")
            .set_property("label", "1.50")
            .set_property("mode", "true");
        root.create_child_node("GlobalParameters")
            .create_child_node("Parameter")
            .set_property("name", "1")
            .set_property("default", 1.5);

        let parsed = XmlFormat::parse(&XmlFormat::render(&root).unwrap()).unwrap();
        assert_eq!(parsed, root);
        assert_eq!(parsed.get("file"), Some(&PropertyValue::String("42".into())));
        assert_eq!(parsed.get("mode").map(PropertyValue::kind), Some(PropertyKind::String));
        let param = &parsed.children()[0].children()[0];
        assert_eq!(param.string_property("name").unwrap(), "1");
        assert_eq!(param.float_property("default").unwrap(), 1.5);
    }

    #[test]
    fn parsed_attributes_are_strings_read_through_typed_accessors() {
        let node = XmlFormat::parse(r#"<Force version="1" default="2" flag="false"/>"#).unwrap();
        assert_eq!(node.get("version").map(PropertyValue::kind), Some(PropertyKind::String));
        assert_eq!(node.int_property("version").unwrap(), 1);
        assert_eq!(node.float_property("default").unwrap(), 2.0);
        assert!(!node.bool_property("flag").unwrap());
    }

    #[test]
    fn nesting_up_to_the_limit_is_accepted() {
        let text = "<a>".repeat(MAX_DEPTH - 1) + "<a/>" + &"</a>".repeat(MAX_DEPTH - 1);
        let mut node = &XmlFormat::parse(&text).unwrap();
        let mut depth = 1;
        while let Some(child) = node.children().first() {
            node = child;
            depth += 1;
        }
        assert_eq!(depth, MAX_DEPTH);
    }

    #[test]
    fn excessive_nesting_is_an_error_not_a_stack_overflow() {
        let text = "<a>\n".repeat(200_000) + &"</a>".repeat(200_000);
        match XmlFormat::parse(&text) {
            Err(XmlError::Parse { line, kind }) => {
                assert_eq!(kind, XmlParseErrorKind::TooDeep(MAX_DEPTH));
                assert_eq!(line, MAX_DEPTH + 1);
            }
            other => panic!("expected a nesting error, got {:?}", other),
        }
    }

    #[test]
    fn parse_accepts_comments_declarations_and_single_quotes() {
        let text = "\u{feff}<?xml version='1.0'?>\n<!-- header -->\n\
            <Force file='x&#x41;&#66;' flag = \"true\" >\n\
            <!-- inner --><Child/>\n\
            </Force >\n<!-- trailer -->\n";
        let node = XmlFormat::parse(text).unwrap();
        assert_eq!(node.name(), "Force");
        assert_eq!(node.string_property("file").unwrap(), "xAB");
        assert!(node.bool_property("flag").unwrap());
        assert_eq!(node.children().len(), 1);
        assert_eq!(node.children()[0].name(), "Child");
    }

    #[test]
    fn parse_rejects_mismatched_closing_tag() {
        assert_eq!(
            parse_error_kind("<A><B></A></B>"),
            XmlParseErrorKind::MismatchedTag {
                open: "B".into(),
                found: "A".into()
            }
        );
    }

    #[test]
    fn parse_rejects_duplicate_attributes() {
        assert_eq!(
            parse_error_kind("<A x=\"1\" x=\"2\"/>"),
            XmlParseErrorKind::DuplicateAttribute("x".into())
        );
    }

    #[test]
    fn parse_rejects_unknown_entities_and_bad_char_refs() {
        assert_eq!(
            parse_error_kind("<A x=\"&nbsp;\"/>"),
            XmlParseErrorKind::UnknownEntity("nbsp".into())
        );
        assert_eq!(
            parse_error_kind("<A x=\"&#0;\"/>"),
            XmlParseErrorKind::InvalidCharRef("#0".into())
        );
        assert_eq!(
            parse_error_kind("<A x=\"&amp\"/>"),
            XmlParseErrorKind::Unterminated("entity reference")
        );
    }

    #[test]
    fn parse_rejects_text_content() {
        assert_eq!(
            parse_error_kind("<A>hello</A>"),
            XmlParseErrorKind::UnexpectedText("hello".into())
        );
    }

    #[test]
    fn parse_rejects_missing_and_multiple_roots() {
        assert_eq!(
            parse_error_kind("<?xml version=\"1.0\"?>\n"),
            XmlParseErrorKind::MissingRoot
        );
        assert_eq!(parse_error_kind("<A/><B/>"), XmlParseErrorKind::MultipleRoots);
    }

    #[test]
    fn parse_rejects_truncated_documents() {
        assert_eq!(parse_error_kind("<A><B/>"), XmlParseErrorKind::UnexpectedEof);
        assert_eq!(
            parse_error_kind("<A x=\"1"),
            XmlParseErrorKind::Unterminated("attribute value")
        );
        assert_eq!(
            parse_error_kind("<A><!-- never closed"),
            XmlParseErrorKind::Unterminated("comment")
        );
    }

    #[test]
    fn parse_rejects_attributes_without_separating_whitespace() {
        assert_eq!(
            parse_error_kind("<A x=\"1\"y=\"2\"/>"),
            XmlParseErrorKind::Unexpected {
                expected: "whitespace before attribute",
                found: 'y'
            }
        );
    }

    #[test]
    fn parse_errors_report_the_line_number() {
        let result = XmlFormat::parse("<A>\n  <B>\n  </C>\n</A>");
        assert!(matches!(result, Err(XmlError::Parse { line: 3, .. })));
    }

    #[test]
    fn write_rejects_invalid_names() {
        let mut root = PropertyNode::new("Force");
        root.set_property("bad name", 1);
        assert!(matches!(
            XmlFormat::render(&root),
            Err(XmlError::InvalidName { what: "attribute", .. })
        ));
        assert!(matches!(
            XmlFormat::render(&PropertyNode::new("1st")),
            Err(XmlError::InvalidName { what: "element", .. })
        ));
    }

    #[test]
    fn path_helpers_round_trip_through_the_filesystem() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("force.xml");
        let tree = sample_tree();
        XmlFormat::write_to_path(&tree, &path).unwrap();
        assert_eq!(XmlFormat::read_from_path(&path).unwrap(), tree);
    }

    #[test]
    fn read_from_missing_path_is_an_io_error() {
        let dir = tempdir().unwrap();
        let result = XmlFormat::read_from_path(dir.path().join("missing.xml"));
        assert!(matches!(result, Err(XmlError::Io(_))));
    }
}
