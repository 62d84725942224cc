use crate::error::DocumentError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::BTreeMap;

/// A parsed XML element. Every child tag may repeat, so children keep
/// document order and are looked up by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub attrs: BTreeMap<String, String>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    /// Parse a complete XML document and return its root element
    pub fn parse(xml: &str) -> Result<Element, DocumentError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(start)) => stack.push(Self::open(&start)?),
                Ok(Event::Empty(start)) => {
                    let element = Self::open(&start)?;
                    Self::close(element, &mut stack, &mut root);
                }
                Ok(Event::End(_)) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| DocumentError::Xml("unbalanced closing tag".to_string()))?;
                    Self::close(element, &mut stack, &mut root);
                }
                Ok(Event::Text(text)) => {
                    let text = text
                        .unescape()
                        .map_err(|e| DocumentError::Xml(e.to_string()))?;
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text);
                    }
                }
                Ok(Event::CData(data)) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(DocumentError::Xml(format!(
                        "error at position {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
            }
        }

        if !stack.is_empty() {
            return Err(DocumentError::Xml("unexpected end of document".to_string()));
        }

        root.ok_or_else(|| DocumentError::Xml("document has no root element".to_string()))
    }

    fn open(start: &BytesStart) -> Result<Element, DocumentError> {
        let mut attrs = BTreeMap::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| DocumentError::Xml(e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| DocumentError::Xml(e.to_string()))?
                .into_owned();
            attrs.insert(key, value);
        }

        Ok(Element {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            attrs,
            text: String::new(),
            children: Vec::new(),
        })
    }

    fn close(element: Element, stack: &mut [Element], root: &mut Option<Element>) {
        match stack.last_mut() {
            Some(parent) => parent.children.push(element),
            None => *root = Some(element),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Child that may appear zero or one times
    pub fn optional_child(&self, field: &'static str) -> Result<Option<&Element>, DocumentError> {
        let mut matches = self.children_named(field);
        let first = matches.next();
        let extra = matches.count();
        if extra > 0 {
            return Err(DocumentError::NotSingleton {
                field,
                count: extra + 1,
            });
        }
        Ok(first)
    }

    /// Child that must appear exactly once
    pub fn required_child(&self, field: &'static str) -> Result<&Element, DocumentError> {
        self.optional_child(field)?
            .ok_or(DocumentError::MissingField(field))
    }

    /// Text of an optional singleton child, empty when absent
    pub fn optional_text(&self, field: &'static str) -> Result<String, DocumentError> {
        Ok(self
            .optional_child(field)?
            .map(|child| child.text.clone())
            .unwrap_or_default())
    }

    /// Text of every child with the given name
    pub fn texts(&self, name: &str) -> Vec<String> {
        self.children_named(name)
            .map(|child| child.text.clone())
            .collect()
    }
}
