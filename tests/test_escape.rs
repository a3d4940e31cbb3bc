use xmlfrag::entity::{escape_text, quote_attribute};
use xmlfrag::{parse, Element, Node};

#[test]
fn test_quote_attribute_examples() {
    assert_eq!(quote_attribute(r#"he said "hi""#), r#"'he said "hi"'"#);
    assert_eq!(quote_attribute("it's"), r#""it's""#);
}

#[test]
fn test_escape_text_only_touches_markup() {
    assert_eq!(escape_text("<&>\"'"), "&lt;&amp;&gt;\"'");
}

#[test]
fn test_add_attribute_entities() {
    let element = Element::named("doc")
        .unwrap()
        .with_attribute("a", "Created & set")
        .unwrap();
    assert_eq!(
        Node::from(element).to_string(),
        r#"<doc a="Created &amp; set"/>"#
    );
}

#[test]
fn test_escape_in_text_roundtrip() {
    let doc = parse(r#"<a>&lt;</a>"#).unwrap();
    match &doc.children()[0] {
        Node::Text(text) => assert_eq!(text.get(), "<"),
        _ => unreachable!(),
    }
    assert_eq!(Node::from(doc).to_string(), r#"<a>&lt;</a>"#);
}

#[test]
fn test_attribute_with_both_quotes_roundtrip() {
    let value = r#"it's "quoted" & <odd>"#;
    let element = Element::named("a").unwrap().with_attribute("v", value).unwrap();
    let xml = Node::from(element).to_string();
    let parsed = parse(&xml).unwrap();
    assert_eq!(parsed.attribute("v"), Some(value));
}
