//! Payload types of the extensions a message can carry.

use crate::ns;
use crate::protocol::ElementEnum;
use crate::string_enum;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

string_enum! {
    /// Message `type` attribute.
    ///
    /// `Default` is `normal`, the fallback for a missing or unrecognised
    /// attribute on inbound stanzas. Outbound messages built with
    /// [`Message::default`](super::Message) start out as `chat` instead.
    #[derive(Default)]
    pub enum MessageType {
        Error = "error",
        #[default]
        Normal = "normal",
        Chat = "chat",
        GroupChat = "groupchat",
        Headline = "headline",
    }
}

string_enum! {
    /// XEP-0085 chat state. Absence of the element is modelled as `None` on
    /// the message, distinct from an explicit `Active`.
    pub enum ChatState {
        Active = "active",
        Inactive = "inactive",
        Gone = "gone",
        Composing = "composing",
        Paused = "paused",
    }
}

impl ElementEnum for ChatState {
    const NAMESPACE: &'static str = ns::CHAT_STATES;
    const ORDER: &'static [Self] = ChatState::ALL;

    fn element_name(&self) -> &'static str {
        self.as_str()
    }
}

string_enum! {
    /// XEP-0334 processing hint.
    pub enum Hint {
        NoPermanentStorage = "no-permanent-storage",
        NoStore = "no-store",
        NoCopy = "no-copy",
        AllowPermanentStorage = "allow-permanent-storage",
    }
}

impl ElementEnum for Hint {
    const NAMESPACE: &'static str = ns::MESSAGE_PROCESSING_HINTS;
    const ORDER: &'static [Self] = Hint::ALL;

    fn element_name(&self) -> &'static str {
        self.as_str()
    }
}

string_enum! {
    /// XEP-0333 chat marker kind.
    pub enum MarkerKind {
        Received = "received",
        Displayed = "displayed",
        Acknowledged = "acknowledged",
    }
}

impl ElementEnum for MarkerKind {
    const NAMESPACE: &'static str = ns::CHAT_MARKERS;
    const ORDER: &'static [Self] = MarkerKind::ALL;

    fn element_name(&self) -> &'static str {
        self.as_str()
    }
}

/// XEP-0184 delivery receipt state.
///
/// The two halves are independent: `requested` asks the peer for a receipt,
/// `received_id` makes this stanza a receipt for the message with that id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub requested: bool,
    pub received_id: Option<String>,
}

impl Receipt {
    pub fn is_receipt(&self) -> bool {
        self.received_id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StampKind {
    /// XEP-0091 `<x xmlns="jabber:x:delay"/>`, second granularity.
    Legacy,
    /// XEP-0203 `<delay xmlns="urn:xmpp:delay"/>`.
    #[default]
    Standard,
}

/// Delivery timestamp. `instant` is `None` both when no delay element was
/// present and when its `stamp` could not be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stamp {
    pub instant: Option<DateTime<Utc>>,
    pub kind: StampKind,
}

impl Stamp {
    pub fn standard(instant: DateTime<Utc>) -> Self {
        Self {
            instant: Some(instant),
            kind: StampKind::Standard,
        }
    }

    pub fn legacy(instant: DateTime<Utc>) -> Self {
        Self {
            instant: Some(instant),
            kind: StampKind::Legacy,
        }
    }
}

/// MUC invitation, either XEP-0249 direct (`<x xmlns="jabber:x:conference"
/// jid=".."/>`) or XEP-0045 mediated (`<x xmlns="..muc#user"><invite to=".."/>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MucInvitation {
    pub jid: String,
    pub password: String,
    pub reason: String,
    pub direct: bool,
}

impl Default for MucInvitation {
    fn default() -> Self {
        Self {
            jid: String::new(),
            password: String::new(),
            reason: String::new(),
            direct: true,
        }
    }
}

impl MucInvitation {
    pub fn direct(jid: impl Into<String>) -> Self {
        Self {
            jid: jid.into(),
            ..Default::default()
        }
    }

    pub fn mediated(jid: impl Into<String>) -> Self {
        Self {
            jid: jid.into(),
            direct: false,
            ..Default::default()
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }
}

/// Insertion-ordered set of processing hints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hints(Vec<Hint>);

impl Hints {
    pub fn contains(&self, hint: Hint) -> bool {
        self.0.contains(&hint)
    }

    /// Returns false if the hint was already present.
    pub fn insert(&mut self, hint: Hint) -> bool {
        if self.contains(hint) {
            return false;
        }
        self.0.push(hint);
        true
    }

    pub fn remove(&mut self, hint: Hint) -> bool {
        let before = self.0.len();
        self.0.retain(|h| *h != hint);
        self.0.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = Hint> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Hint> for Hints {
    fn from_iter<I: IntoIterator<Item = Hint>>(iter: I) -> Self {
        let mut hints = Hints::default();
        for hint in iter {
            hints.insert(hint);
        }
        hints
    }
}

/// A XEP-0333 marker pointing at an earlier message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub kind: MarkerKind,
    pub id: String,
    /// Empty when the marker carried no `thread`.
    pub thread: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMarkers {
    pub markable: bool,
    pub marker: Option<Marker>,
}

/// XEP-0308 correction of an earlier message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    pub target_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_tables_follow_priority_order() {
        assert_eq!(
            ChatState::ORDER
                .iter()
                .map(|s| s.element_name())
                .collect::<Vec<_>>(),
            vec!["active", "inactive", "gone", "composing", "paused"]
        );
        assert_eq!(
            MarkerKind::ORDER
                .iter()
                .map(|m| m.element_name())
                .collect::<Vec<_>>(),
            vec!["received", "displayed", "acknowledged"]
        );
        assert_eq!(Hint::ORDER.len(), 4);
    }

    #[test]
    fn test_element_enum_to_node() {
        let node = Hint::NoStore.to_node();
        assert_eq!(node.to_string(), r#"<no-store xmlns="urn:xmpp:hints"/>"#);
    }

    #[test]
    fn test_message_type_fallback() {
        assert_eq!(MessageType::default(), MessageType::Normal);
        assert_eq!(MessageType::try_from("groupchat").unwrap(), MessageType::GroupChat);
        assert!(MessageType::try_from("broadcast").is_err());
    }

    #[test]
    fn test_hints_reject_duplicates() {
        let mut hints = Hints::default();
        assert!(hints.insert(Hint::NoCopy));
        assert!(hints.insert(Hint::NoStore));
        assert!(!hints.insert(Hint::NoCopy));
        assert_eq!(hints.iter().collect::<Vec<_>>(), vec![Hint::NoCopy, Hint::NoStore]);

        assert!(hints.remove(Hint::NoCopy));
        assert!(!hints.remove(Hint::NoCopy));
        assert_eq!(hints.len(), 1);

        let collected: Hints = [Hint::NoStore, Hint::NoStore, Hint::NoCopy].into_iter().collect();
        assert_eq!(collected.len(), 2);
    }

    #[test]
    fn test_receipt_signals_are_independent() {
        let receipt = Receipt {
            requested: true,
            received_id: None,
        };
        assert!(!receipt.is_receipt());

        let ack = Receipt {
            requested: false,
            received_id: Some("msg-1".into()),
        };
        assert!(ack.is_receipt());
    }

    #[test]
    fn test_muc_invitation_defaults_to_direct() {
        assert!(MucInvitation::default().direct);
        let invite = MucInvitation::mediated("room@muc.example.com").with_reason("join");
        assert!(!invite.direct);
        assert_eq!(invite.reason, "join");
    }
}
