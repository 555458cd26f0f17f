use xmppcore::message::{CarbonDirection, ChatState, Hint, MarkerKind, StampKind};
use xmppcore::{DecodeOptions, Message, ProtocolNode};

/// XEP-0313 archive result carrying a forwarded, delayed chat message.
const MAM_RESULT: &str = r#"
<message id="aeb213" to="juliet@capulet.lit/chamber">
  <result xmlns="urn:xmpp:mam:0" queryid="f27" id="28482-98726-73623">
    <forwarded xmlns="urn:xmpp:forward:0">
      <delay xmlns="urn:xmpp:delay" stamp="2010-07-10T23:08:25Z"/>
      <message xmlns="jabber:client" from="witch@shakespeare.lit" to="macbeth@shakespeare.lit" type="chat">
        <body>Hail to thee</body>
        <markable xmlns="urn:xmpp:chat-markers:0"/>
      </message>
    </forwarded>
  </result>
</message>"#;

#[test]
fn test_decode_archive_result() {
    let msg = Message::from_xml(MAM_RESULT).expect("decode failed");
    assert_eq!(msg.id(), "aeb213");

    let archived = msg.archived().expect("archived message missing");
    assert_eq!(archived.base.from, "witch@shakespeare.lit");
    assert_eq!(archived.body(), "Hail to thee");
    assert!(archived.markers.markable);
    assert_eq!(archived.stamp.kind, StampKind::Standard);
    assert_eq!(
        archived.stamp.instant.map(|t| t.to_rfc3339()),
        Some("2010-07-10T23:08:25+00:00".to_string())
    );
    assert!(msg.unknown_extensions.is_empty());
}

#[test]
fn test_carbon_sent_wrapper_is_decoded() {
    let xml = r#"
        <message from="romeo@montague.example" to="romeo@montague.example/garden" type="chat">
          <sent xmlns="urn:xmpp:carbons:2">
            <forwarded xmlns="urn:xmpp:forward:0">
              <message xmlns="jabber:client" to="juliet@capulet.example/balcony" from="romeo@montague.example/home" type="chat">
                <body>Neither, fair saint, if either thee dislike.</body>
                <thread>0e3141cd80894871a68e6fe6b1ec56fa</thread>
                <composing xmlns="http://jabber.org/protocol/chatstates"/>
              </message>
            </forwarded>
          </sent>
          <no-copy xmlns="urn:xmpp:hints"/>
        </message>"#;

    let msg = Message::from_xml(xml).expect("decode failed");
    assert!(msg.has_hint(Hint::NoCopy));
    let carbon = msg.carbon.as_ref().expect("carbon missing");
    assert_eq!(carbon.direction, CarbonDirection::Sent);
    assert_eq!(carbon.message.thread.as_deref(), Some("0e3141cd80894871a68e6fe6b1ec56fa"));
    assert_eq!(carbon.message.chat_state, Some(ChatState::Composing));

    let again = Message::from_xml(&msg.to_xml()).expect("re-decode failed");
    assert_eq!(again, msg);
}

#[test]
fn test_foreign_payloads_round_trip_verbatim() {
    let xml = concat!(
        r#"<message id="p1" to="a@example.com" type="chat">"#,
        r#"<encrypted xmlns="eu.siacs.conversations.axolotl"><header sid="27183"><iv>BASE64</iv></header></encrypted>"#,
        "<body>This message is encrypted</body>",
        r#"<displayed xmlns="urn:xmpp:chat-markers:0" id="m0" thread="t"/>"#,
        r#"<store xmlns="urn:xmpp:hints"/>"#,
        r#"<x xmlns="jabber:x:oob"><url>https://example.com/a.png</url><desc>A &amp; B</desc></x>"#,
        "</message>"
    );

    let msg = Message::from_xml(xml).expect("decode failed");
    let marker = msg.markers.marker.as_ref().expect("marker missing");
    assert_eq!(marker.kind, MarkerKind::Displayed);
    assert_eq!(marker.thread, "t");

    let out = msg.to_xml();
    let unknown: Vec<String> = msg.unknown_extensions.iter().map(|n| n.to_string()).collect();
    assert_eq!(
        unknown,
        vec![
            r#"<encrypted xmlns="eu.siacs.conversations.axolotl"><header sid="27183"><iv>BASE64</iv></header></encrypted>"#,
            r#"<store xmlns="urn:xmpp:hints"/>"#,
            r#"<x xmlns="jabber:x:oob"><url>https://example.com/a.png</url><desc>A &amp; B</desc></x>"#,
        ]
    );
    for fragment in &unknown {
        assert!(out.contains(fragment.as_str()), "{fragment} missing from {out}");
    }
    assert_eq!(Message::from_xml(&out).expect("re-decode failed"), msg);
}

#[test]
fn test_record_serializes_to_json() {
    let mut msg = Message::from_xml(MAM_RESULT).expect("decode failed");
    msg.unknown_extensions
        .push(xmppcore::xml::parse_str(r#"<foo xmlns="urn:example"><bar/></foo>"#).expect("parse failed"));

    let json = serde_json::to_string(&msg).expect("serialize failed");
    let back: Message = serde_json::from_str(&json).expect("deserialize failed");
    assert_eq!(back, msg);

    let value: serde_json::Value = serde_json::from_str(&json).expect("not json");
    assert_eq!(value["kind"], "normal");
    assert_eq!(value["archived"]["kind"], "chat");
    assert_eq!(value["archived"]["stamp"]["kind"], "standard");
}

#[test]
fn test_protocol_node_impl() {
    let msg = Message::new("a@example.com", "b@example.com", "hi");
    assert_eq!(msg.tag(), "message");

    let node = msg.clone().into_node();
    let decoded = Message::try_from_node(&node).expect("decode failed");
    assert_eq!(decoded, msg);
}

#[test]
fn test_deeply_nested_forwarding_is_bounded() {
    let mut xml = String::from("<message><body>0</body>");
    for level in 1..=12 {
        xml.push_str(&format!(
            r#"<forwarded xmlns="urn:xmpp:forward:0"><message xmlns="jabber:client"><body>{level}</body>"#
        ));
    }
    for _ in 1..=12 {
        xml.push_str("</message></forwarded>");
    }
    xml.push_str("</message>");

    let options = DecodeOptions::default();
    let msg = Message::from_xml_with(&xml, &options).expect("decode failed");

    let mut depth = 0;
    let mut current = &msg;
    while let Some(next) = current.forwarded() {
        current = next;
        depth += 1;
    }
    assert_eq!(depth, options.max_forward_depth);
    assert_eq!(current.unknown_extensions.len(), 1);
    assert_eq!(current.unknown_extensions[0].tag, "forwarded");

    // The undecoded tail is still written back out.
    assert!(msg.to_xml().contains("<body>12</body>"));
}
