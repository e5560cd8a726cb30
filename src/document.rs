//! Document tree: the decoded form of preprocessed TEI markup.

use crate::error::{Error, Result};
use ego_tree::{NodeId, NodeRef, Tree};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

/// Borrowed handle to one node of a [`Document`].
pub type Node<'a> = NodeRef<'a, XmlNode>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    /// Synthetic root; its children are the top-level nodes of the file.
    Document,
    Element(Element),
    Text(String),
}

impl XmlNode {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            XmlNode::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.as_element().map(|e| e.name.as_str())
    }

    pub fn is_element_named(&self, name: &str) -> bool {
        self.name() == Some(name)
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.as_element()
            .and_then(|e| e.attributes.get(key))
            .map(String::as_str)
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            XmlNode::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Owned tree of a parsed document. Children keep document order.
#[derive(Debug, Clone)]
pub struct Document {
    tree: Tree<XmlNode>,
}

impl Document {
    /// Builds the tree from (preprocessed) markup. Mismatched or unclosed
    /// tags are rejected; nothing is repaired.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut tree = Tree::new(XmlNode::Document);
        let mut stack: Vec<NodeId> = vec![tree.root().id()];

        loop {
            match reader.read_event()? {
                Event::Start(ref e) => {
                    let id = append(&mut tree, &stack, XmlNode::Element(element_from(e)))?;
                    stack.push(id);
                }
                Event::Empty(ref e) => {
                    append(&mut tree, &stack, XmlNode::Element(element_from(e)))?;
                }
                Event::End(ref e) => {
                    if stack.len() <= 1 {
                        return Err(Error::Malformed(format!(
                            "closing tag </{}> has no matching start tag",
                            String::from_utf8_lossy(e.name().as_ref())
                        )));
                    }
                    stack.pop();
                }
                Event::Text(ref e) => {
                    let text = match e.unescape() {
                        Ok(text) => text.into_owned(),
                        // Undefined entities are kept verbatim.
                        Err(_) => String::from_utf8_lossy(e.as_ref()).into_owned(),
                    };
                    append(&mut tree, &stack, XmlNode::Text(text))?;
                }
                Event::CData(ref e) => {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    append(&mut tree, &stack, XmlNode::Text(text))?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if stack.len() > 1 {
            let open = stack
                .last()
                .and_then(|id| tree.get(*id))
                .and_then(|node| node.value().name().map(str::to_string))
                .unwrap_or_default();
            return Err(Error::Malformed(format!(
                "element <{open}> is not closed before end of input"
            )));
        }

        Ok(Self { tree })
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root()
    }

    pub fn node_count(&self) -> usize {
        self.tree.root().descendants().count()
    }
}

fn append(tree: &mut Tree<XmlNode>, stack: &[NodeId], value: XmlNode) -> Result<NodeId> {
    let outside = || Error::Malformed("content outside the document root".to_string());
    let parent = *stack.last().ok_or_else(outside)?;
    let mut parent = tree.get_mut(parent).ok_or_else(outside)?;
    Ok(parent.append(value).id())
}

fn normalize_tag_name(tag_name: &str) -> &str {
    match tag_name.find(':') {
        Some(idx) => &tag_name[idx + 1..],
        None => tag_name,
    }
}

fn element_from(e: &BytesStart) -> Element {
    let raw_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
    Element {
        name: normalize_tag_name(&raw_name).to_string(),
        attributes: extract_attrs(e),
    }
}

fn extract_attrs(e: &BytesStart) -> HashMap<String, String> {
    let mut attrs = HashMap::new();
    for attr in e.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let val = match attr.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).to_string(),
        };
        attrs.insert(key, val);
    }
    attrs
}
