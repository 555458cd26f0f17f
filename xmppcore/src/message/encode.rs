use super::ext::{MucInvitation, StampKind};
use super::Message;
use crate::datetime::{format_datetime, format_legacy_datetime};
use crate::ns;
use crate::protocol::ElementEnum;
use xmppcore_xml::builder::NodeBuilder;
use xmppcore_xml::node::Node;

/// Where a message element sits in the tree being written.
#[derive(Clone, Copy)]
enum Placement {
    Root,
    /// Inside `<forwarded/>`; a standard stamp is then carried by the wrapper.
    Forwarded,
}

pub(super) fn encode_root(message: &Message) -> Node {
    let node = encode(message, Placement::Root);
    log::trace!(
        "Encoded <message/> with {} children",
        node.children().map_or(0, <[Node]>::len)
    );
    node
}

fn text_node(tag: &str, text: &str) -> Node {
    NodeBuilder::new(tag).string_content(text).build()
}

fn encode(message: &Message, placement: Placement) -> Node {
    let mut builder = NodeBuilder::new("message");
    if let Placement::Forwarded = placement {
        builder = builder.attr("xmlns", ns::CLIENT);
    }
    builder = message.base.write_attrs(builder).attr("type", message.kind.as_str());

    let mut children = Vec::new();

    if let Some(subject) = &message.subject {
        children.push(text_node("subject", subject));
    }
    match &message.body {
        Some(body) => children.push(text_node("body", body)),
        None if message.is_correction() => children.push(NodeBuilder::new("body").build()),
        None => {}
    }
    if let Some(thread) = &message.thread {
        children.push(text_node("thread", thread));
    }

    children.extend(message.base.error_node());
    children.extend(message.chat_state.map(ElementEnum::to_node));

    if let Some(xhtml) = message.xhtml.as_deref().filter(|x| !x.is_empty()) {
        let body = NodeBuilder::new("body")
            .attr("xmlns", ns::XHTML)
            .markup(xhtml)
            .build();
        children.push(
            NodeBuilder::new("html")
                .attr("xmlns", ns::XHTML_IM)
                .children([body])
                .build(),
        );
    }

    let stamp_on_wrapper =
        matches!(placement, Placement::Forwarded) && message.stamp.kind == StampKind::Standard;
    if !stamp_on_wrapper {
        children.extend(stamp_node(message));
    }

    if let Some(id) = message.receipt.received_id.as_deref().filter(|id| !id.is_empty()) {
        children.push(
            NodeBuilder::new("received")
                .attr("xmlns", ns::MESSAGE_RECEIPTS)
                .attr("id", id)
                .build(),
        );
    }
    if message.receipt.requested {
        children.push(NodeBuilder::new("request").attr("xmlns", ns::MESSAGE_RECEIPTS).build());
    }
    if message.attention_requested {
        children.push(NodeBuilder::new("attention").attr("xmlns", ns::ATTENTION).build());
    }

    if let Some(invitation) = message.muc_invitation.as_ref().filter(|i| !i.jid.is_empty()) {
        children.push(invitation_node(invitation));
    }

    children.extend(message.hints.iter().map(ElementEnum::to_node));

    if message.markers.markable {
        children.push(NodeBuilder::new("markable").attr("xmlns", ns::CHAT_MARKERS).build());
    }
    if let Some(marker) = &message.markers.marker {
        children.push(
            NodeBuilder::new(marker.kind.element_name())
                .attr("xmlns", ns::CHAT_MARKERS)
                .attr("id", marker.id.as_str())
                .attr_if_present("thread", &marker.thread)
                .build(),
        );
    }

    if let Some(correction) = &message.correction {
        children.push(
            NodeBuilder::new("replace")
                .attr("xmlns", ns::REPLACE_MESSAGE)
                .attr("id", correction.target_id.as_str())
                .build(),
        );
    }

    if let Some(archived) = &message.archived {
        children.push(
            NodeBuilder::new("result")
                .attr("xmlns", ns::SIMPLE_ARCHIVE)
                .children([forwarded_node(archived)])
                .build(),
        );
    }
    if let Some(carbon) = &message.carbon {
        children.push(
            NodeBuilder::new(carbon.direction.element_name())
                .attr("xmlns", ns::MESSAGE_CARBONS)
                .children([forwarded_node(&carbon.message)])
                .build(),
        );
    }
    if let Some(forwarded) = &message.forwarded {
        children.push(forwarded_node(forwarded));
    }

    children.extend(message.unknown_extensions.iter().cloned());

    if !children.is_empty() {
        builder = builder.children(children);
    }
    builder.build()
}

fn stamp_node(message: &Message) -> Option<Node> {
    let instant = message.stamp.instant?;
    let node = match message.stamp.kind {
        StampKind::Standard => NodeBuilder::new("delay")
            .attr("xmlns", ns::DELAYED_DELIVERY)
            .attr("stamp", format_datetime(&instant)),
        StampKind::Legacy => NodeBuilder::new("x")
            .attr("xmlns", ns::LEGACY_DELAYED_DELIVERY)
            .attr("stamp", format_legacy_datetime(&instant)),
    };
    Some(node.build())
}

fn invitation_node(invitation: &MucInvitation) -> Node {
    if invitation.direct {
        return NodeBuilder::new("x")
            .attr("xmlns", ns::CONFERENCE)
            .attr("jid", invitation.jid.as_str())
            .attr_if_present("password", &invitation.password)
            .attr_if_present("reason", &invitation.reason)
            .build();
    }

    let mut invite = NodeBuilder::new("invite").attr("to", invitation.jid.as_str());
    if !invitation.reason.is_empty() {
        invite = invite.children([text_node("reason", &invitation.reason)]);
    }
    let mut children = vec![invite.build()];
    if !invitation.password.is_empty() {
        children.push(text_node("password", &invitation.password));
    }
    NodeBuilder::new("x")
        .attr("xmlns", ns::MUC_USER)
        .children(children)
        .build()
}

/// `<forwarded xmlns="urn:xmpp:forward:0">[<delay/>]<message/></forwarded>`
fn forwarded_node(message: &Message) -> Node {
    let mut children = Vec::with_capacity(2);
    if message.stamp.kind == StampKind::Standard {
        children.extend(stamp_node(message));
    }
    children.push(encode(message, Placement::Forwarded));
    NodeBuilder::new("forwarded")
        .attr("xmlns", ns::STANZA_FORWARDING)
        .children(children)
        .build()
}
