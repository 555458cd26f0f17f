use crate::error::{Result, XmlError};
use crate::node::{Attrs, Node, NodeContent};
use crate::writer::escape_text;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// One item of an element's content while it is still open.
enum Item {
    Node(Node),
    Text(String),
}

struct Frame {
    tag: String,
    attrs: Attrs,
    items: Vec<Item>,
}

impl Frame {
    fn push_text(&mut self, text: &str) {
        if let Some(Item::Text(last)) = self.items.last_mut() {
            last.push_str(text);
        } else {
            self.items.push(Item::Text(text.to_string()));
        }
    }

    /// Keeps only the child elements.
    fn into_element_node(self) -> Node {
        let nodes: Vec<Node> = self
            .items
            .into_iter()
            .filter_map(|i| match i {
                Item::Node(n) => Some(n),
                Item::Text(_) => None,
            })
            .collect();
        Node {
            tag: self.tag,
            attrs: self.attrs,
            content: (!nodes.is_empty()).then_some(NodeContent::Nodes(nodes)),
        }
    }

    /// Collapses the collected items into node content.
    ///
    /// - text only: `String` (whitespace kept as-is)
    /// - elements with whitespace-only text in between: `Nodes`
    /// - elements interleaved with real text: `Markup`, re-serialized
    fn into_node(self) -> Node {
        let has_nodes = self.items.iter().any(|i| matches!(i, Item::Node(_)));
        let has_text = self
            .items
            .iter()
            .any(|i| matches!(i, Item::Text(t) if !t.trim().is_empty()));

        let content = match (has_nodes, has_text) {
            (false, _) => {
                let text: String = self
                    .items
                    .into_iter()
                    .filter_map(|i| match i {
                        Item::Text(t) => Some(t),
                        Item::Node(_) => None,
                    })
                    .collect();
                (!text.is_empty()).then_some(NodeContent::String(text))
            }
            (true, false) => Some(NodeContent::Nodes(
                self.items
                    .into_iter()
                    .filter_map(|i| match i {
                        Item::Node(n) => Some(n),
                        Item::Text(_) => None,
                    })
                    .collect(),
            )),
            (true, true) => {
                let mut markup = String::new();
                for item in self.items {
                    match item {
                        Item::Node(n) => markup.push_str(&n.to_string()),
                        Item::Text(t) => markup.push_str(&escape_text(&t)),
                    }
                }
                Some(NodeContent::Markup(markup))
            }
        };

        Node {
            tag: self.tag,
            attrs: self.attrs,
            content,
        }
    }
}

fn utf8(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| XmlError::Syntax(format!("invalid UTF-8 in name: {e}")))
}

fn open_frame(start: &BytesStart<'_>) -> Result<Frame> {
    let tag = utf8(start.name().as_ref())?;
    let mut attrs = Attrs::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = utf8(attr.key.as_ref())?;
        let value = attr.unescape_value()?;
        attrs.push(key, value.into_owned());
    }
    Ok(Frame {
        tag,
        attrs,
        items: Vec::new(),
    })
}

/// Parses a single XML element (with its subtree) from text.
///
/// Declarations, comments, processing instructions and doctypes are skipped.
/// Exactly one root element is accepted; anything but whitespace after it
/// is an error.
pub fn parse_str(xml: &str) -> Result<Node> {
    parse_document(xml, false)
}

/// Element children of a mixed-content fragment, with the text between
/// them dropped. `markup` must be what the reader stored as `Markup`.
pub(crate) fn parse_elements(markup: &str) -> Result<Vec<Node>> {
    let root = parse_document(&format!("<fragment>{markup}</fragment>"), true)?;
    Ok(match root.content {
        Some(NodeContent::Nodes(nodes)) => nodes,
        _ => Vec::new(),
    })
}

fn parse_document(xml: &str, root_elements_only: bool) -> Result<Node> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        let event = reader.read_event()?;

        if root.is_some() {
            match event {
                Event::Eof => break,
                Event::Text(t) if t.unescape()?.trim().is_empty() => continue,
                Event::Comment(_) | Event::PI(_) => continue,
                Event::Start(e) | Event::Empty(e) => {
                    return Err(XmlError::LeftoverData(utf8(e.name().as_ref())?));
                }
                _ => return Err(XmlError::LeftoverData("#text".to_string())),
            }
        }

        match event {
            Event::Start(e) => stack.push(open_frame(&e)?),
            Event::Empty(e) => {
                let node = open_frame(&e)?.into_node();
                match stack.last_mut() {
                    Some(parent) => parent.items.push(Item::Node(node)),
                    None => root = Some(node),
                }
            }
            Event::End(_) => {
                // quick-xml checks that end names match their start tags
                let frame = stack
                    .pop()
                    .ok_or_else(|| XmlError::Syntax("unbalanced end tag".to_string()))?;
                let node = if stack.is_empty() && root_elements_only {
                    frame.into_element_node()
                } else {
                    frame.into_node()
                };
                match stack.last_mut() {
                    Some(parent) => parent.items.push(Item::Node(node)),
                    None => root = Some(node),
                }
            }
            Event::Text(t) => {
                if let Some(frame) = stack.last_mut() {
                    frame.push_text(&t.unescape()?);
                } else if !t.unescape()?.trim().is_empty() {
                    return Err(XmlError::Syntax("text outside of root element".to_string()));
                }
            }
            Event::CData(c) => {
                let text = utf8(&c.into_inner())?;
                match stack.last_mut() {
                    Some(frame) => frame.push_text(&text),
                    None => {
                        return Err(XmlError::Syntax("CDATA outside of root element".to_string()));
                    }
                }
            }
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => {
                return match stack.last() {
                    Some(frame) => Err(XmlError::UnexpectedEof(frame.tag.clone())),
                    None => Err(XmlError::EmptyDocument),
                };
            }
        }
    }

    root.ok_or(XmlError::EmptyDocument)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_stanza() {
        let node = parse_str(
            r#"<?xml version="1.0"?>
            <message to="juliet@example.com" type="chat">
              <body>Art thou not Romeo?</body>
              <active xmlns="http://jabber.org/protocol/chatstates"/>
            </message>"#,
        )
        .unwrap();

        assert_eq!(node.tag, "message");
        assert_eq!(node.attrs.get("type"), Some("chat"));
        let children = node.children().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].text(), "Art thou not Romeo?");
        assert_eq!(
            children[1].namespace(),
            Some("http://jabber.org/protocol/chatstates")
        );
    }

    #[test]
    fn test_entities_are_unescaped() {
        let node = parse_str(r#"<body a="x &amp; y">1 &lt; 2</body>"#).unwrap();
        assert_eq!(node.attrs.get("a"), Some("x & y"));
        assert_eq!(node.text(), "1 < 2");
    }

    #[test]
    fn test_parse_elements_drops_text() {
        let nodes = parse_elements("stray <b>big</b> text <i/>").unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].tag, "b");
        assert_eq!(nodes[0].text(), "big");
        assert_eq!(nodes[1].tag, "i");
        assert!(parse_elements("just text").unwrap().is_empty());
    }

    #[test]
    fn test_mixed_content_becomes_markup() {
        let node = parse_str("<p>Hello <b>big</b> world</p>").unwrap();
        assert_eq!(
            node.content,
            Some(NodeContent::Markup("Hello <b>big</b> world".to_string()))
        );
        assert_eq!(node.to_string(), "<p>Hello <b>big</b> world</p>");
    }

    #[test]
    fn test_cdata_is_text() {
        let node = parse_str("<body><![CDATA[<not a tag>]]></body>").unwrap();
        assert_eq!(node.text(), "<not a tag>");
    }

    #[test]
    fn test_rejects_leftover_and_empty_input() {
        assert!(matches!(
            parse_str("<a/><b/>"),
            Err(XmlError::LeftoverData(tag)) if tag == "b"
        ));
        assert_eq!(parse_str("   "), Err(XmlError::EmptyDocument));
        assert!(parse_str("<a><b></b>").is_err());
        assert!(parse_str("<a></b>").is_err());
    }
}
