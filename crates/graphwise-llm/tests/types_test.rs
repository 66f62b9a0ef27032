use graphwise_llm::{Content, ContentPart, Message};

#[test]
fn test_content_text_creation() {
    let content = Content::text("Hello, world!");
    assert_eq!(content.as_text(), Some("Hello, world!"));
}

#[test]
fn test_content_from_string() {
    let content: Content = "Test".into();
    assert_eq!(content.as_text(), Some("Test"));
}

#[test]
fn test_content_parts_plain_text() {
    let content = Content::Parts(vec![
        ContentPart::Text { text: "a".to_string() },
        ContentPart::Text { text: "b".to_string() },
    ]);
    assert_eq!(content.as_text(), None);
    assert_eq!(content.to_plain_text(), "ab");
}

#[test]
fn test_message_roles() {
    assert_eq!(Message::system("You are helpful").role(), "system");
    assert_eq!(Message::human("Hello").role(), "user");
    assert_eq!(Message::ai("Hi there!").role(), "assistant");
}

#[test]
fn test_message_serialization_human() {
    let msg = Message::human("Hello");
    let json = serde_json::to_string(&msg).unwrap();
    assert_eq!(json, r#"{"role":"user","content":"Hello"}"#);
}

#[test]
fn test_message_serialization_ai() {
    let msg = Message::ai("{\"nodes\":[]}");
    let json = serde_json::to_value(&msg).unwrap();
    assert_eq!(json["role"], "assistant");
    assert_eq!(json["content"], "{\"nodes\":[]}");
}

#[test]
fn test_message_deserialization() {
    let json = r#"{"role":"user","content":"Test"}"#;
    let msg: Message = serde_json::from_str(json).unwrap();
    assert_eq!(msg.role(), "user");
    assert_eq!(msg.content().as_text(), Some("Test"));
}
