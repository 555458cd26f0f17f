//! XML namespaces of the extensions understood by the message codec.

pub const CLIENT: &str = "jabber:client";
pub const STANZAS: &str = "urn:ietf:params:xml:ns:xmpp-stanzas";

/// XEP-0085: Chat State Notifications
pub const CHAT_STATES: &str = "http://jabber.org/protocol/chatstates";
/// XEP-0071: XHTML-IM wrapper
pub const XHTML_IM: &str = "http://jabber.org/protocol/xhtml-im";
/// Namespace of the `body` inside the XHTML-IM wrapper
pub const XHTML: &str = "http://www.w3.org/1999/xhtml";
/// XEP-0184: Message Delivery Receipts
pub const MESSAGE_RECEIPTS: &str = "urn:xmpp:receipts";
/// XEP-0203: Delayed Delivery
pub const DELAYED_DELIVERY: &str = "urn:xmpp:delay";
/// XEP-0091: Legacy Delayed Delivery
pub const LEGACY_DELAYED_DELIVERY: &str = "jabber:x:delay";
/// XEP-0224: Attention
pub const ATTENTION: &str = "urn:xmpp:attention:0";
/// XEP-0249: Direct MUC Invitations
pub const CONFERENCE: &str = "jabber:x:conference";
/// XEP-0045: mediated invitations
pub const MUC_USER: &str = "http://jabber.org/protocol/muc#user";
/// XEP-0297: Stanza Forwarding
pub const STANZA_FORWARDING: &str = "urn:xmpp:forward:0";
/// XEP-0313: Message Archive Management
pub const SIMPLE_ARCHIVE: &str = "urn:xmpp:mam:0";
/// XEP-0280: Message Carbons
pub const MESSAGE_CARBONS: &str = "urn:xmpp:carbons:2";
/// XEP-0334: Message Processing Hints
pub const MESSAGE_PROCESSING_HINTS: &str = "urn:xmpp:hints";
/// XEP-0333: Chat Markers
pub const CHAT_MARKERS: &str = "urn:xmpp:chat-markers:0";
/// XEP-0308: Last Message Correction
pub const REPLACE_MESSAGE: &str = "urn:xmpp:message-correct:0";
