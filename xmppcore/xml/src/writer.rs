use crate::node::{Attrs, Node, NodeContent};
use quick_xml::escape::{escape, partial_escape};
use std::borrow::Cow;
use std::fmt;

/// Escapes character data for use between tags. Quotes are left alone since
/// they are only significant inside attribute values.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    partial_escape(text)
}

fn write_attributes(f: &mut fmt::Formatter<'_>, attrs: &Attrs) -> fmt::Result {
    for (key, value) in attrs.iter() {
        write!(f, " {}=\"{}\"", key, escape(value))?;
    }
    Ok(())
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        write_attributes(f, &self.attrs)?;

        match &self.content {
            None => write!(f, "/>"),
            Some(NodeContent::String(s)) if s.is_empty() => write!(f, "/>"),
            Some(NodeContent::Markup(m)) if m.is_empty() => write!(f, "/>"),
            Some(NodeContent::Nodes(nodes)) if nodes.is_empty() => write!(f, "/>"),
            Some(NodeContent::String(s)) => write!(f, ">{}</{}>", escape_text(s), self.tag),
            Some(NodeContent::Markup(m)) => write!(f, ">{}</{}>", m, self.tag),
            Some(NodeContent::Nodes(nodes)) => {
                write!(f, ">")?;
                for node in nodes {
                    write!(f, "{node}")?;
                }
                write!(f, "</{}>", self.tag)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::NodeBuilder;

    #[test]
    fn test_empty_element_is_self_closing() {
        let node = NodeBuilder::new("request")
            .attr("xmlns", "urn:xmpp:receipts")
            .build();
        assert_eq!(node.to_string(), r#"<request xmlns="urn:xmpp:receipts"/>"#);
    }

    #[test]
    fn test_attribute_order_and_escaping() {
        let node = NodeBuilder::new("x")
            .attr("reason", "a \"quoted\" <reason> & more")
            .attr("jid", "room@muc.example.com")
            .build();
        assert_eq!(
            node.to_string(),
            r#"<x reason="a &quot;quoted&quot; &lt;reason&gt; &amp; more" jid="room@muc.example.com"/>"#
        );
    }

    #[test]
    fn test_text_and_markup_content() {
        let body = NodeBuilder::new("body").string_content("1 < 2 & \"so\"").build();
        assert_eq!(body.to_string(), "<body>1 &lt; 2 &amp; \"so\"</body>");

        let raw = NodeBuilder::new("body")
            .markup("<p>Hi <b>there</b></p>")
            .build();
        assert_eq!(raw.to_string(), "<body><p>Hi <b>there</b></p></body>");
    }

    #[test]
    fn test_nested_children() {
        let node = NodeBuilder::new("x")
            .attr("xmlns", "http://jabber.org/protocol/muc#user")
            .children([NodeBuilder::new("invite")
                .attr("to", "room@muc.example.com")
                .children([NodeBuilder::new("reason").string_content("join us").build()])
                .build()])
            .build();
        assert_eq!(
            node.to_string(),
            concat!(
                r#"<x xmlns="http://jabber.org/protocol/muc#user">"#,
                r#"<invite to="room@muc.example.com"><reason>join us</reason></invite></x>"#
            )
        );
    }
}
