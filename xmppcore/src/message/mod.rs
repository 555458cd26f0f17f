//! The `<message/>` stanza and the extensions it aggregates.
//!
//! Decoding is lenient and never fails: absent extensions take their empty
//! defaults, malformed values degrade locally, and children no extension
//! claims are kept verbatim in [`Message::unknown_extensions`] so they survive
//! a decode/encode round trip.

mod decode;
mod encode;
pub mod ext;


pub use ext::{
    ChatMarkers, ChatState, Correction, Hint, Hints, Marker, MarkerKind, MessageType,
    MucInvitation, Receipt, Stamp, StampKind,
};

use crate::error::CodecError;
use crate::protocol::ProtocolNode;
use crate::stanza::StanzaBase;
use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use xmppcore_xml::node::Node;

/// Nesting limit for forwarded, archived and carbon-copied messages.
pub const MAX_FORWARD_DEPTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Forward wrappers found deeper than this are not decoded; the wrapper is
    /// kept as an unknown extension instead.
    pub max_forward_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_forward_depth: MAX_FORWARD_DEPTH,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarbonDirection {
    #[default]
    Received,
    Sent,
}

impl CarbonDirection {
    pub fn element_name(&self) -> &'static str {
        match self {
            CarbonDirection::Received => "received",
            CarbonDirection::Sent => "sent",
        }
    }
}

/// XEP-0280 carbon copy: the copied message plus which wrapper carried it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Carbon {
    pub direction: CarbonDirection,
    pub message: Box<Message>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub base: StanzaBase,
    pub kind: MessageType,
    pub body: Option<String>,
    pub subject: Option<String>,
    pub thread: Option<String>,
    pub chat_state: Option<ChatState>,
    /// Inner markup of the XHTML-IM `body`, without the wrapping tags.
    pub xhtml: Option<String>,
    pub attention_requested: bool,
    pub receipt: Receipt,
    pub stamp: Stamp,
    pub muc_invitation: Option<MucInvitation>,
    pub hints: Hints,
    pub markers: ChatMarkers,
    pub correction: Option<Correction>,
    /// XEP-0297 forwarded message.
    pub forwarded: Option<Box<Message>>,
    /// XEP-0313 archive result.
    pub archived: Option<Box<Message>>,
    pub carbon: Option<Carbon>,
    pub unknown_extensions: Vec<Node>,
}

impl Default for Message {
    /// An outbound message: type `chat`, everything else empty.
    fn default() -> Self {
        Self {
            base: StanzaBase::default(),
            kind: MessageType::Chat,
            body: None,
            subject: None,
            thread: None,
            chat_state: None,
            xhtml: None,
            attention_requested: false,
            receipt: Receipt::default(),
            stamp: Stamp::default(),
            muc_invitation: None,
            hints: Hints::default(),
            markers: ChatMarkers::default(),
            correction: None,
            forwarded: None,
            archived: None,
            carbon: None,
            unknown_extensions: Vec::new(),
        }
    }
}

impl Message {
    pub fn new(from: impl Into<String>, to: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            base: StanzaBase::new(from, to),
            body: Some(body.into()),
            ..Default::default()
        }
    }

    pub fn with_thread(mut self, thread: impl Into<String>) -> Self {
        self.thread = Some(thread.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.base.id
    }

    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }

    /// Decodes a `<message/>` element with the default nesting limit.
    pub fn from_node(node: &Node) -> Self {
        Self::from_node_with(node, &DecodeOptions::default())
    }

    pub fn from_node_with(node: &Node, options: &DecodeOptions) -> Self {
        decode::decode_root(node, options)
    }

    /// Parses stanza text and decodes it.
    pub fn from_xml(xml: &str) -> std::result::Result<Self, CodecError> {
        Self::from_xml_with(xml, &DecodeOptions::default())
    }

    pub fn from_xml_with(
        xml: &str,
        options: &DecodeOptions,
    ) -> std::result::Result<Self, CodecError> {
        let node = xmppcore_xml::parse_str(xml)?;
        if node.tag != "message" {
            return Err(CodecError::WrongTag {
                expected: "message",
                found: node.tag,
            });
        }
        Ok(Self::from_node_with(&node, options))
    }

    pub fn to_node(&self) -> Node {
        encode::encode_root(self)
    }

    pub fn to_xml(&self) -> String {
        self.to_node().to_string()
    }

    pub fn is_receipt_requested(&self) -> bool {
        self.receipt.requested
    }

    /// Requests a delivery receipt. A receipt can only be matched against an
    /// id, so one is generated if the message has none yet.
    pub fn set_receipt_requested(&mut self, requested: bool) {
        self.receipt.requested = requested;
        if requested {
            self.base.assign_default_id_if_absent();
        }
    }

    /// Turns this message into a receipt for the message with `id`.
    pub fn set_receipt_id(&mut self, id: impl Into<String>) {
        self.receipt.received_id = Some(id.into());
    }

    pub fn has_hint(&self, hint: Hint) -> bool {
        self.hints.contains(hint)
    }

    pub fn add_hint(&mut self, hint: Hint) {
        self.hints.insert(hint);
    }

    pub fn remove_hint(&mut self, hint: Hint) {
        self.hints.remove(hint);
    }

    pub fn set_markable(&mut self, markable: bool) {
        self.markers.markable = markable;
    }

    pub fn set_marker(&mut self, kind: MarkerKind, id: impl Into<String>, thread: impl Into<String>) {
        self.markers.marker = Some(Marker {
            kind,
            id: id.into(),
            thread: thread.into(),
        });
    }

    pub fn is_correction(&self) -> bool {
        self.correction.is_some()
    }

    /// Marks this message as a correction of the message with `target_id`.
    pub fn set_correction(&mut self, target_id: impl Into<String>) {
        self.correction = Some(Correction {
            target_id: target_id.into(),
        });
    }

    pub fn forwarded(&self) -> Option<&Message> {
        self.forwarded.as_deref()
    }

    pub fn set_forwarded(&mut self, message: Message) {
        self.forwarded = Some(Box::new(message));
    }

    pub fn archived(&self) -> Option<&Message> {
        self.archived.as_deref()
    }

    pub fn set_archived(&mut self, message: Message) {
        self.archived = Some(Box::new(message));
    }

    pub fn carbon_copied(&self) -> Option<&Message> {
        self.carbon.as_ref().map(|c| c.message.as_ref())
    }

    pub fn set_carbon_copied(&mut self, direction: CarbonDirection, message: Message) {
        self.carbon = Some(Carbon {
            direction,
            message: Box::new(message),
        });
    }
}

impl ProtocolNode for Message {
    fn tag(&self) -> &'static str {
        "message"
    }

    fn into_node(self) -> Node {
        self.to_node()
    }

    fn try_from_node(node: &Node) -> Result<Self> {
        if node.tag != "message" {
            return Err(anyhow!("expected <message>, got <{}>", node.tag));
        }
        Ok(Self::from_node(node))
    }
}
