use crate::ns;
use crate::protocol::ProtocolNode;
use crate::string_enum;
use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use xmppcore_xml::builder::NodeBuilder;
use xmppcore_xml::node::Node;

string_enum! {
    /// RFC 6120 §8.3.2 error types. Unknown values are read as `cancel`.
    #[derive(Default)]
    pub enum ErrorType {
        Auth = "auth",
        #[default]
        Cancel = "cancel",
        Continue = "continue",
        Modify = "modify",
        Wait = "wait",
    }
}

/// The `<error/>` payload of a stanza.
///
/// Wire format:
/// ```xml
/// <error type="cancel" by="example.com">
///   <item-not-found xmlns="urn:ietf:params:xml:ns:xmpp-stanzas"/>
///   <text xmlns="urn:ietf:params:xml:ns:xmpp-stanzas">No such user</text>
/// </error>
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StanzaError {
    pub error_type: ErrorType,
    /// Defined condition element name, e.g. `item-not-found`.
    pub condition: String,
    pub text: Option<String>,
    pub by: Option<String>,
    /// Legacy numeric code from pre-RFC servers.
    pub code: Option<u64>,
}

impl StanzaError {
    pub fn new(error_type: ErrorType, condition: impl Into<String>) -> Self {
        Self {
            error_type,
            condition: condition.into(),
            ..Default::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

impl ProtocolNode for StanzaError {
    fn tag(&self) -> &'static str {
        "error"
    }

    fn into_node(self) -> Node {
        let mut builder = NodeBuilder::new("error").attr("type", self.error_type.as_str());
        if let Some(by) = &self.by {
            builder = builder.attr("by", by.as_str());
        }
        if let Some(code) = self.code {
            builder = builder.attr("code", code.to_string());
        }

        let mut children = Vec::with_capacity(2);
        if !self.condition.is_empty() {
            children.push(
                NodeBuilder::new(self.condition)
                    .attr("xmlns", ns::STANZAS)
                    .build(),
            );
        }
        if let Some(text) = self.text {
            children.push(
                NodeBuilder::new("text")
                    .attr("xmlns", ns::STANZAS)
                    .string_content(text)
                    .build(),
            );
        }
        if !children.is_empty() {
            builder = builder.children(children);
        }
        builder.build()
    }

    fn try_from_node(node: &Node) -> Result<Self> {
        if node.tag != "error" {
            return Err(anyhow!("expected <error>, got <{}>", node.tag));
        }

        let mut attrs = node.attrs();
        let error_type = attrs
            .optional_string("type")
            .and_then(|t| ErrorType::try_from(t).ok())
            .unwrap_or_default();
        let by = attrs.optional_string("by").map(str::to_string);
        let code = attrs.optional_u64("code");
        if let Err(err) = attrs.finish() {
            log::warn!("Ignoring malformed error attributes: {err}");
        }

        let mut condition = String::new();
        let mut text = None;
        for child in node.children().into_iter().flatten() {
            if child.namespace() != Some(ns::STANZAS) {
                continue;
            }
            if child.tag == "text" {
                text = Some(child.text().into_owned());
            } else if condition.is_empty() {
                condition = child.tag.clone();
            }
        }

        Ok(Self {
            error_type,
            condition,
            text,
            by,
            code,
        })
    }
}
