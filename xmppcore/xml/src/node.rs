use crate::attrs::AttrParser;
use std::borrow::Cow;

/// A collection of element attributes stored as key-value pairs.
/// Uses a Vec internally so the document order of attributes is kept, and
/// linear search is cheap for the handful of attributes a stanza child carries.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attrs(pub Vec<(String, String)>);

impl Attrs {
    #[inline]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Get the value for a key, or None if not found.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    /// Insert a key-value pair. If the key already exists, update the value in place
    /// so the attribute keeps its original position.
    #[inline]
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(pos) = self.0.iter().position(|(k, _)| *k == key) {
            self.0[pos].1 = value;
        } else {
            self.0.push((key, value));
        }
    }

    /// Push a key-value pair without checking for duplicates.
    /// Use this when building from a known-unique source (e.g., the reader).
    #[inline]
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }
}

impl IntoIterator for Attrs {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, String)> for Attrs {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Content of an element.
///
/// `Markup` holds already-serialized inner markup that is written verbatim.
/// The reader produces it for mixed content (text interleaved with child
/// elements), which the `String`/`Nodes` variants cannot express.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeContent {
    String(String),
    Nodes(Vec<Node>),
    Markup(String),
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Node {
    pub tag: String,
    pub attrs: Attrs,
    pub content: Option<NodeContent>,
}

impl Node {
    pub fn new(tag: &str, attrs: Attrs, content: Option<NodeContent>) -> Self {
        Self {
            tag: tag.to_string(),
            attrs,
            content,
        }
    }

    pub fn children(&self) -> Option<&[Node]> {
        match &self.content {
            Some(NodeContent::Nodes(nodes)) => Some(nodes),
            _ => None,
        }
    }

    pub fn attrs(&self) -> AttrParser<'_> {
        AttrParser::new(self)
    }

    /// The namespace declared on this element through its `xmlns` attribute.
    /// Inherited namespaces are not resolved here; callers that walk a tree
    /// carry the parent's namespace themselves.
    pub fn namespace(&self) -> Option<&str> {
        self.attrs.get("xmlns")
    }

    /// Character data of the element. Child elements contribute their own
    /// character data in document order; raw markup contributes nothing.
    pub fn text(&self) -> Cow<'_, str> {
        match &self.content {
            Some(NodeContent::String(s)) => Cow::Borrowed(s.as_str()),
            Some(NodeContent::Nodes(nodes)) => {
                Cow::Owned(nodes.iter().map(|n| n.text()).collect::<String>())
            }
            Some(NodeContent::Markup(_)) | None => Cow::Borrowed(""),
        }
    }

    /// Child elements, including those of mixed content. Text between the
    /// elements is not part of the result.
    pub fn element_children(&self) -> Cow<'_, [Node]> {
        match &self.content {
            Some(NodeContent::Nodes(nodes)) => Cow::Borrowed(nodes.as_slice()),
            Some(NodeContent::Markup(markup)) => match crate::reader::parse_elements(markup) {
                Ok(nodes) => Cow::Owned(nodes),
                Err(err) => {
                    log::warn!("Failed to re-read mixed content of <{}>: {err}", self.tag);
                    Cow::Borrowed(&[])
                }
            },
            Some(NodeContent::String(_)) | None => Cow::Borrowed(&[]),
        }
    }

    pub fn get_optional_child_by_tag<'a>(&'a self, tags: &[&str]) -> Option<&'a Node> {
        let mut current_node = self;
        for &tag in tags {
            current_node = current_node.get_optional_child(tag)?;
        }
        Some(current_node)
    }

    pub fn get_children_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Node> {
        self.children()
            .into_iter()
            .flatten()
            .filter(move |c| c.tag == tag)
    }

    pub fn get_optional_child(&self, tag: &str) -> Option<&Node> {
        self.children()
            .and_then(|nodes| nodes.iter().find(|node| node.tag == tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::NodeBuilder;

    #[test]
    fn test_attrs_insert_keeps_position() {
        let mut attrs = Attrs::new();
        attrs.insert("id", "1");
        attrs.insert("type", "chat");
        attrs.insert("id", "2");
        assert_eq!(attrs.keys().collect::<Vec<_>>(), vec!["id", "type"]);
        assert_eq!(attrs.get("id"), Some("2"));
    }

    #[test]
    fn test_child_lookup_by_path() {
        let node = NodeBuilder::new("result")
            .attr("xmlns", "urn:xmpp:mam:0")
            .children([NodeBuilder::new("forwarded")
                .children([NodeBuilder::new("message").attr("id", "inner").build()])
                .build()])
            .build();

        let inner = node
            .get_optional_child_by_tag(&["forwarded", "message"])
            .unwrap();
        assert_eq!(inner.attrs.get("id"), Some("inner"));
        assert!(node.get_optional_child_by_tag(&["forwarded", "delay"]).is_none());
        assert_eq!(node.namespace(), Some("urn:xmpp:mam:0"));
    }

    #[test]
    fn test_element_children_of_mixed_content() {
        let node = NodeBuilder::new("message")
            .markup("stray<body>hi</body> more <foo xmlns=\"urn:x\"/>")
            .build();
        assert!(node.children().is_none());

        let children = node.element_children();
        assert_eq!(
            children.iter().map(|c| c.tag.as_str()).collect::<Vec<_>>(),
            vec!["body", "foo"]
        );
        assert_eq!(children[0].text(), "hi");

        let plain = NodeBuilder::new("body").string_content("text").build();
        assert!(plain.element_children().is_empty());
    }

    #[test]
    fn test_text_concatenates_descendants() {
        let node = NodeBuilder::new("p")
            .children([
                NodeBuilder::new("b").string_content("bold").build(),
                NodeBuilder::new("i").string_content(" italic").build(),
            ])
            .build();
        assert_eq!(node.text(), "bold italic");
        assert_eq!(NodeBuilder::new("empty").build().text(), "");
    }
}
