//! A minimal element tree for gamelist files.
//!
//! Gamelist files only use element nesting and text content, so attributes
//! are ignored when reading and never written. Text of leaf elements is kept
//! verbatim, surrounding whitespace included; text inside elements that have
//! children is indentation and is dropped.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::InterchangeError;

/// An XML element with its text content and child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_text(name: &str, text: &str) -> Self {
        Self {
            name: name.to_string(),
            text: text.to_string(),
            children: Vec::new(),
        }
    }

    /// The unnamed node holding a document's top-level elements.
    pub fn document() -> Self {
        Self::default()
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// First child with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Text of the first child with the given name.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.as_str())
    }
}

/// Read and parse an XML file into a document node.
pub fn load_document(path: &Path) -> Result<Element, InterchangeError> {
    if !path.is_file() {
        return Err(InterchangeError::SourceNotFound(path.to_path_buf()));
    }
    let file = fs::File::open(path)?;
    parse_document(BufReader::new(file))
}

/// Parse XML from a reader into a document node.
pub fn parse_document<R: BufRead>(reader: R) -> Result<Element, InterchangeError> {
    let mut xml = Reader::from_reader(reader);

    let mut buf = Vec::new();
    let mut document = Element::document();
    let mut stack: Vec<Element> = Vec::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                stack.push(Element::new(&name));
            }
            Event::Empty(ref e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                attach(&mut stack, &mut document, Element::new(&name));
            }
            Event::Text(ref e) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&e.unescape()?);
                }
            }
            Event::CData(ref e) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Event::End(_) => {
                if let Some(mut element) = stack.pop() {
                    if !element.children.is_empty() {
                        element.text.clear();
                    }
                    attach(&mut stack, &mut document, element);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(InterchangeError::Malformed(format!(
            "unexpected end of document inside <{}>",
            open.name
        )));
    }
    if document.children.is_empty() {
        return Err(InterchangeError::Malformed(
            "document has no root element".to_string(),
        ));
    }
    Ok(document)
}

fn attach(stack: &mut [Element], document: &mut Element, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.push(element),
        None => document.push(element),
    }
}

/// Serialize a document node with an XML declaration, indenting by
/// nesting depth.
pub fn to_xml_string(document: &Element) -> String {
    let mut xml = String::from("<?xml version=\"1.0\"?>\n");
    for element in &document.children {
        write_element(&mut xml, element, 0);
    }
    xml
}

fn write_element(xml: &mut String, element: &Element, depth: usize) {
    for _ in 0..depth {
        xml.push('\t');
    }
    xml.push('<');
    xml.push_str(&element.name);

    if element.children.is_empty() {
        if element.text.is_empty() {
            xml.push_str(" />\n");
        } else {
            xml.push('>');
            xml.push_str(&escape_xml(&element.text));
            xml.push_str("</");
            xml.push_str(&element.name);
            xml.push_str(">\n");
        }
        return;
    }

    xml.push_str(">\n");
    for child in &element.children {
        write_element(xml, child, depth + 1);
    }
    for _ in 0..depth {
        xml.push('\t');
    }
    xml.push_str("</");
    xml.push_str(&element.name);
    xml.push_str(">\n");
}

/// Write a document to `path`, replacing it atomically. Parent directories
/// are created as needed.
pub fn save_document(document: &Element, path: &Path) -> Result<(), InterchangeError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = path.with_extension("xml.tmp");
    fs::write(&tmp_path, to_xml_string(document))?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
#[path = "tests/document_tests.rs"]
mod tests;
