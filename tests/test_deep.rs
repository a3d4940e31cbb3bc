use xmlfrag::{parse_fragment, Group, Node};

const DEPTH: usize = 100_000;

fn nested_xml(depth: usize, text: &str) -> String {
    let mut xml = "<a>".repeat(depth);
    xml.push_str(text);
    xml.push_str(&"</a>".repeat(depth));
    xml
}

fn parse_nested(depth: usize, text: &str) -> Group {
    parse_fragment(&nested_xml(depth, text)).unwrap()
}

#[test]
fn test_parse_and_drop_deep_nesting() {
    let group = parse_nested(DEPTH, "x");
    assert_eq!(group.len(), 1);
    drop(group);
}

#[test]
fn test_compare_deep_nesting() {
    let a = parse_nested(DEPTH, "x");
    assert!(a == parse_nested(DEPTH, "x"));
    assert!(a != parse_nested(DEPTH, "y"));
    assert!(a[0] == a.clone()[0]);
}

#[test]
fn test_serialize_deep_nesting() {
    let group = parse_nested(DEPTH, "x");
    assert_eq!(group[0].to_string(), nested_xml(DEPTH, "x"));
    assert_eq!(group[0].text_content(), "x");
}

#[test]
fn test_canonicalize_deep_nesting() {
    let group = parse_nested(DEPTH, "x<![CDATA[y]]><![CDATA[z]]>");
    let canonical: Node = group[0].canonicalize();
    let mut depth = 1;
    let mut node = &canonical;
    while let Some(child @ Node::Element(_)) = node.children().first() {
        node = child;
        depth += 1;
    }
    assert_eq!(depth, DEPTH);
    assert_eq!(node.children().len(), 2);
    assert!(node.children()[1] == Node::cdata("yz").unwrap());
}
