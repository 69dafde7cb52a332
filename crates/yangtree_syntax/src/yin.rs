//! Reader for the YIN (XML) syntax.
//!
//! Every YIN element is a statement. The argument is carried either in a
//! keyword-specific attribute (`<leaf name="x">`) or in a child element
//! (`<description><text>...</text></description>`).

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use yangtree_foundation::{Error, Result, Span};

use crate::statement::Statement;

/// The YIN namespace URI.
pub const YIN_NAMESPACE: &str = "urn:ietf:params:xml:ns:yang:yin:1";

/// How a statement's argument is encoded in YIN.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum YinArgument {
    /// The statement takes no argument.
    None,
    /// The argument is the named attribute.
    Attribute(&'static str),
    /// The argument is the text of the named child element.
    Element(&'static str),
}

/// Returns how the argument of `keyword` is encoded.
#[must_use]
pub fn yin_argument(keyword: &str) -> YinArgument {
    use YinArgument::{Attribute, Element, None};
    match keyword {
        "action" | "anydata" | "anyxml" | "argument" | "base" | "bit" | "case" | "choice"
        | "container" | "enum" | "extension" | "feature" | "grouping" | "identity"
        | "if-feature" | "leaf" | "leaf-list" | "list" | "module" | "notification" | "rpc"
        | "submodule" | "type" | "typedef" | "units" | "uses" => Attribute("name"),
        "augment" | "deviation" | "refine" => Attribute("target-node"),
        "belongs-to" | "import" | "include" => Attribute("module"),
        "config" | "default" | "deviate" | "error-app-tag" | "fraction-digits" | "key"
        | "length" | "mandatory" | "max-elements" | "min-elements" | "modifier"
        | "ordered-by" | "path" | "pattern" | "position" | "prefix" | "presence" | "range"
        | "require-instance" | "status" | "value" | "yang-version" | "yin-element" => {
            Attribute("value")
        }
        "must" | "when" => Attribute("condition"),
        "namespace" => Attribute("uri"),
        "revision" | "revision-date" => Attribute("date"),
        "unique" => Attribute("tag"),
        "contact" | "description" | "organization" | "reference" => Element("text"),
        "error-message" => Element("value"),
        _ => None,
    }
}

/// A raw XML element before statement conversion.
#[derive(Debug, Default)]
struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlElement>,
    text: String,
    line: u32,
}

/// Parses YIN source text into its top-level statement.
///
/// # Errors
/// Returns a parse error for malformed XML and a validation error for
/// statements whose argument is missing.
pub fn parse_yin(source: &str) -> Result<Statement> {
    let root = read_elements(source)?;
    let namespaces = namespace_prefixes(&root);
    to_statement(&root, &namespaces)
}

/// Reads the XML document into an element tree.
fn read_elements(source: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader.read_event();
        let line = line_at(source, reader.buffer_position());
        let event = event.map_err(|e| Error::parse(format!("invalid XML: {e}"), line, 1))?;

        match event {
            Event::Start(start) => stack.push(element_from(&start, line)?),
            Event::Empty(start) => {
                let element = element_from(&start, line)?;
                attach(&mut stack, &mut root, element, line)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::parse("unbalanced closing tag", line, 1))?;
                attach(&mut stack, &mut root, element, line)?;
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| Error::parse(format!("invalid text: {e}"), line, 1))?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(Error::parse(
            "unexpected end of document, unclosed element",
            line_at(source, reader.buffer_position()),
            1,
        ));
    }
    root.ok_or_else(|| Error::parse("empty YIN document", 1, 1))
}

/// Attaches a finished element to its parent, or makes it the root.
fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
    line: u32,
) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    } else if root.is_none() {
        *root = Some(element);
    } else {
        return Err(Error::parse("more than one root element", line, 1));
    }
    Ok(())
}

/// Builds an element (without children) from a start tag.
fn element_from(start: &BytesStart<'_>, line: u32) -> Result<XmlElement> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::parse(format!("invalid attribute: {e}"), line, 1))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| Error::parse(format!("invalid attribute value: {e}"), line, 1))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(XmlElement {
        name,
        attributes,
        line,
        ..XmlElement::default()
    })
}

/// Collects `xmlns:prefix` declarations of the root element.
///
/// Maps each XML prefix to the namespace URI it stands for; the default
/// namespace is stored under the empty prefix.
fn namespace_prefixes(root: &XmlElement) -> HashMap<String, String> {
    root.attributes
        .iter()
        .filter_map(|(key, value)| {
            if key == "xmlns" {
                Some((String::new(), value.clone()))
            } else {
                key.strip_prefix("xmlns:")
                    .map(|prefix| (prefix.to_string(), value.clone()))
            }
        })
        .collect()
}

/// Converts an element into a statement.
fn to_statement(element: &XmlElement, namespaces: &HashMap<String, String>) -> Result<Statement> {
    let (xml_prefix, local) = match element.name.split_once(':') {
        Some((prefix, local)) => (prefix, local),
        None => ("", element.name.as_str()),
    };
    let is_yin = namespaces
        .get(xml_prefix)
        .is_none_or(|uri| uri == YIN_NAMESPACE);

    let span = Span::at_line(element.line);

    if !is_yin {
        // Extension instance: keep the qualified name, argument from text.
        let argument = (!element.text.is_empty()).then(|| element.text.clone());
        let mut stmt = Statement::new(element.name.clone(), argument, span);
        for child in &element.children {
            stmt.children.push(to_statement(child, namespaces)?);
        }
        return Ok(stmt);
    }

    let mut argument = None;
    let mut arg_element = None;
    match yin_argument(local) {
        YinArgument::None => {}
        YinArgument::Attribute(attr) => {
            let value = element
                .attributes
                .iter()
                .find(|(key, _)| key == attr)
                .map(|(_, value)| value.clone())
                .ok_or_else(|| {
                    Error::validation(
                        format!("missing attribute \"{attr}\" of \"{local}\""),
                        element.line,
                    )
                })?;
            argument = Some(value);
        }
        YinArgument::Element(child_name) => {
            let child = element
                .children
                .iter()
                .find(|c| local_name(&c.name) == child_name)
                .ok_or_else(|| {
                    Error::validation(
                        format!("missing element \"{child_name}\" of \"{local}\""),
                        element.line,
                    )
                })?;
            argument = Some(child.text.clone());
            arg_element = Some(child_name);
        }
    }

    let mut stmt = Statement::new(local, argument, span);
    for child in &element.children {
        if arg_element.is_some_and(|name| local_name(&child.name) == name) {
            continue;
        }
        stmt.children.push(to_statement(child, namespaces)?);
    }
    Ok(stmt)
}

/// Strips an XML prefix from an element name.
fn local_name(name: &str) -> &str {
    name.split_once(':').map_or(name, |(_, local)| local)
}

/// Returns the 1-based line of a byte offset.
fn line_at(source: &str, position: impl TryInto<usize>) -> u32 {
    let offset = position.try_into().unwrap_or(usize::MAX).min(source.len());
    let newlines = source.as_bytes()[..offset]
        .iter()
        .filter(|b| **b == b'\n')
        .count();
    u32::try_from(newlines).map_or(u32::MAX, |n| n + 1)
}
