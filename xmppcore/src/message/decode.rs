use super::ext::{
    ChatMarkers, ChatState, Correction, Hint, Marker, MarkerKind, MessageType, MucInvitation,
    Receipt, Stamp, StampKind,
};
use super::{Carbon, CarbonDirection, DecodeOptions, Message};
use crate::datetime::{parse_datetime, parse_legacy_datetime};
use crate::ns;
use crate::protocol::ElementEnum;
use crate::stanza::StanzaBase;
use xmppcore_xml::escape_text;
use xmppcore_xml::node::{Node, NodeContent};

/// Children a known extension owns, as `(name, namespace)`. `None` claims the
/// name in any namespace. Forward wrappers and `x` elements are claimed only
/// when they actually decode, so they are not listed here.
const CLAIMED: &[(&str, Option<&str>)] = &[
    ("body", None),
    ("subject", None),
    ("thread", None),
    ("error", None),
    ("html", None),
    ("request", None),
    ("delay", None),
    ("attention", None),
    ("markable", None),
    ("active", None),
    ("inactive", None),
    ("gone", None),
    ("composing", None),
    ("paused", None),
    ("received", Some(ns::MESSAGE_RECEIPTS)),
    ("no-permanent-storage", Some(ns::MESSAGE_PROCESSING_HINTS)),
    ("no-store", Some(ns::MESSAGE_PROCESSING_HINTS)),
    ("no-copy", Some(ns::MESSAGE_PROCESSING_HINTS)),
    ("allow-permanent-storage", Some(ns::MESSAGE_PROCESSING_HINTS)),
    ("received", Some(ns::CHAT_MARKERS)),
    ("displayed", Some(ns::CHAT_MARKERS)),
    ("acknowledged", Some(ns::CHAT_MARKERS)),
    ("replace", Some(ns::REPLACE_MESSAGE)),
];

fn is_claimed(tag: &str, namespace: &str) -> bool {
    CLAIMED
        .iter()
        .any(|(name, ns)| *name == tag && ns.is_none_or(|expected| expected == namespace))
}

/// Namespace in scope for `node` given the one in scope for its parent.
fn effective_ns<'a>(node: &'a Node, parent_ns: &'a str) -> &'a str {
    node.namespace().unwrap_or(parent_ns)
}

/// First child named `tag` whose namespace in scope is `namespace`.
fn child_in_ns<'a>(
    parent: &'a Node,
    parent_ns: &'a str,
    tag: &'a str,
    namespace: &str,
) -> Option<&'a Node> {
    parent
        .get_children_by_tag(tag)
        .find(|child| effective_ns(child, parent_ns) == namespace)
}

fn first_element<'a, E: ElementEnum>(parent: &'a Node, parent_ns: &'a str) -> Option<(E, &'a Node)> {
    E::ORDER.iter().find_map(|variant| {
        child_in_ns(parent, parent_ns, variant.element_name(), E::NAMESPACE).map(|n| (*variant, n))
    })
}

fn child_text(parent: &Node, tag: &str) -> Option<String> {
    parent.get_optional_child(tag).map(|c| c.text().into_owned())
}

pub(super) fn decode_root(node: &Node, options: &DecodeOptions) -> Message {
    let namespace = node.namespace().unwrap_or(ns::CLIENT);
    decode(node, namespace, 0, options)
}

fn decode(node: &Node, namespace: &str, depth: usize, options: &DecodeOptions) -> Message {
    let normalized;
    let node = match &node.content {
        Some(NodeContent::Markup(_)) => {
            log::debug!("Dropping stray text between the children of <{}/>", node.tag);
            normalized = Node::new(
                &node.tag,
                node.attrs.clone(),
                Some(NodeContent::Nodes(node.element_children().into_owned())),
            );
            &normalized
        }
        _ => node,
    };

    let base = StanzaBase::parse(node);
    let mut attrs = node.attrs();
    let kind = attrs
        .optional_string("type")
        .and_then(|t| MessageType::try_from(t).ok())
        .unwrap_or_default();

    let mut message = Message {
        kind,
        body: child_text(node, "body"),
        subject: child_text(node, "subject"),
        thread: child_text(node, "thread"),
        chat_state: first_element::<ChatState>(node, namespace).map(|(state, _)| state),
        xhtml: parse_xhtml(node, namespace),
        receipt: parse_receipt(node, namespace, &base.id),
        stamp: child_in_ns(node, namespace, "delay", ns::DELAYED_DELIVERY)
            .map(parse_standard_stamp)
            .unwrap_or_default(),
        attention_requested: child_in_ns(node, namespace, "attention", ns::ATTENTION).is_some(),
        hints: Hint::ORDER
            .iter()
            .copied()
            .filter(|h| child_in_ns(node, namespace, h.element_name(), Hint::NAMESPACE).is_some())
            .collect(),
        markers: ChatMarkers {
            markable: node.get_optional_child("markable").is_some(),
            marker: first_element::<MarkerKind>(node, namespace).map(|(kind, el)| {
                let mut attrs = el.attrs();
                Marker {
                    kind,
                    id: attrs.string_or_empty("id"),
                    thread: attrs.string_or_empty("thread"),
                }
            }),
        },
        correction: child_in_ns(node, namespace, "replace", ns::REPLACE_MESSAGE).map(|el| Correction {
            target_id: el.attrs().string_or_empty("id"),
        }),
        base,
        ..Default::default()
    };

    // Wrappers that yielded a nested message; everything else stays opaque.
    let mut consumed: Vec<&Node> = Vec::new();
    if depth < options.max_forward_depth {
        if let Some(result) = child_in_ns(node, namespace, "result", ns::SIMPLE_ARCHIVE)
            && let Some(inner) = parse_wrapped_forward(result, namespace, depth, options)
        {
            message.archived = Some(Box::new(inner));
            consumed.push(result);
        }

        // With both wrappers present `sent` wins; the other passes through.
        let mut carbon_wrapper = None;
        for direction in [CarbonDirection::Received, CarbonDirection::Sent] {
            if let Some(wrapper) = child_in_ns(node, namespace, direction.element_name(), ns::MESSAGE_CARBONS)
                && let Some(inner) = parse_wrapped_forward(wrapper, namespace, depth, options)
            {
                message.carbon = Some(Carbon {
                    direction,
                    message: Box::new(inner),
                });
                carbon_wrapper = Some(wrapper);
            }
        }
        consumed.extend(carbon_wrapper);

        if let Some(forwarded) = child_in_ns(node, namespace, "forwarded", ns::STANZA_FORWARDING) {
            let forwarded_ns = effective_ns(forwarded, namespace);
            message.forwarded = Some(Box::new(parse_forward(forwarded, forwarded_ns, depth, options)));
            consumed.push(forwarded);
        }
    }

    for child in node.children().into_iter().flatten() {
        let child_ns = effective_ns(child, namespace);
        if child.tag == "x" {
            if apply_x_element(&mut message, child, child_ns) {
                continue;
            }
        } else if consumed.iter().any(|c| std::ptr::eq(*c, child)) || is_claimed(&child.tag, child_ns) {
            continue;
        } else if is_forward_wrapper(&child.tag, child_ns) && depth >= options.max_forward_depth {
            log::warn!(
                "Forward nesting exceeds {} levels; keeping <{}/> undecoded",
                options.max_forward_depth,
                child.tag
            );
        }

        log::debug!("Keeping unknown extension <{} xmlns=\"{}\"/>", child.tag, child_ns);
        message.unknown_extensions.push(child.clone());
    }

    message
}

fn is_forward_wrapper(tag: &str, namespace: &str) -> bool {
    matches!(
        (tag, namespace),
        ("forwarded", ns::STANZA_FORWARDING)
            | ("result", ns::SIMPLE_ARCHIVE)
            | ("received" | "sent", ns::MESSAGE_CARBONS)
    )
}

/// Routes a top-level `x` element by namespace. Returns false if no known
/// extension owns it.
fn apply_x_element(message: &mut Message, x: &Node, namespace: &str) -> bool {
    match namespace {
        ns::LEGACY_DELAYED_DELIVERY => {
            if message.stamp.instant.is_none() {
                message.stamp = parse_legacy_stamp(x);
            }
            true
        }
        ns::CONFERENCE => {
            let mut attrs = x.attrs();
            message.muc_invitation = Some(MucInvitation {
                jid: attrs.string_or_empty("jid"),
                password: attrs.string_or_empty("password"),
                reason: attrs.string_or_empty("reason"),
                direct: true,
            });
            true
        }
        ns::MUC_USER => match x.get_optional_child("invite") {
            Some(invite) => {
                message.muc_invitation = Some(MucInvitation {
                    jid: invite.attrs().string_or_empty("to"),
                    password: child_text(x, "password").unwrap_or_default(),
                    reason: child_text(invite, "reason").unwrap_or_default(),
                    direct: false,
                });
                true
            }
            None => false,
        },
        _ => false,
    }
}

fn parse_receipt(node: &Node, namespace: &str, stanza_id: &str) -> Receipt {
    let received_id = child_in_ns(node, namespace, "received", ns::MESSAGE_RECEIPTS)
        .and_then(|el| match el.attrs().optional_string("id") {
            Some(id) if !id.is_empty() => Some(id.to_string()),
            _ if !stanza_id.is_empty() => Some(stanza_id.to_string()),
            _ => {
                log::debug!("Receipt without an id on a stanza without an id");
                None
            }
        });
    Receipt {
        requested: child_in_ns(node, namespace, "request", ns::MESSAGE_RECEIPTS).is_some(),
        received_id,
    }
}

fn parse_standard_stamp(delay: &Node) -> Stamp {
    let raw = delay.attrs().string_or_empty("stamp");
    let instant = parse_datetime(&raw);
    if instant.is_none() {
        log::warn!("Ignoring malformed delay stamp '{raw}'");
    }
    Stamp {
        instant,
        kind: StampKind::Standard,
    }
}

fn parse_legacy_stamp(x: &Node) -> Stamp {
    let raw = x.attrs().string_or_empty("stamp");
    let instant = parse_legacy_datetime(&raw);
    if instant.is_none() {
        log::warn!("Ignoring malformed legacy delay stamp '{raw}'");
    }
    Stamp {
        instant,
        kind: StampKind::Legacy,
    }
}

/// Inner markup of `<html xmlns=xhtml-im><body xmlns=xhtml>..</body></html>`.
fn parse_xhtml(node: &Node, namespace: &str) -> Option<String> {
    let html = child_in_ns(node, namespace, "html", ns::XHTML_IM)?;
    let body = child_in_ns(html, ns::XHTML_IM, "body", ns::XHTML)?;
    let inner = match &body.content {
        None => String::new(),
        Some(NodeContent::String(text)) => escape_text(text).into_owned(),
        Some(NodeContent::Markup(markup)) => markup.clone(),
        Some(NodeContent::Nodes(nodes)) => nodes.iter().map(Node::to_string).collect(),
    };
    let inner = inner.replace(&format!(" xmlns=\"{}\"", ns::XHTML), "");
    let inner = inner.trim();
    (!inner.is_empty()).then(|| inner.to_string())
}

/// Decodes the `forwarded` child of an archive result or carbon wrapper.
fn parse_wrapped_forward(
    wrapper: &Node,
    parent_ns: &str,
    depth: usize,
    options: &DecodeOptions,
) -> Option<Message> {
    let wrapper_ns = effective_ns(wrapper, parent_ns);
    let forwarded = child_in_ns(wrapper, wrapper_ns, "forwarded", ns::STANZA_FORWARDING)?;
    let forwarded_ns = effective_ns(forwarded, wrapper_ns);
    Some(parse_forward(forwarded, forwarded_ns, depth, options))
}

/// Decodes the message inside a XEP-0297 `forwarded` element. A `delay` on the
/// wrapper overrides the inner message's own stamp.
fn parse_forward(forwarded: &Node, forwarded_ns: &str, depth: usize, options: &DecodeOptions) -> Message {
    let mut inner = match forwarded.get_optional_child("message") {
        Some(message) => {
            log::debug!("Decoding forwarded message at depth {}", depth + 1);
            decode(message, effective_ns(message, forwarded_ns), depth + 1, options)
        }
        None => {
            log::debug!("<forwarded/> without a message child");
            Message {
                kind: MessageType::default(),
                ..Default::default()
            }
        }
    };

    if let Some(delay) = child_in_ns(forwarded, forwarded_ns, "delay", ns::DELAYED_DELIVERY) {
        inner.stamp = parse_standard_stamp(delay);
    }
    inner
}
