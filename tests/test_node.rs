use rstest::rstest;
use xmlfrag::{
    Attributes, CData, Element, EntityRef, Error, Group, NamespaceBinding, Node, Text,
};

#[rstest]
#[case("a")]
#[case("doc")]
#[case("_private")]
#[case("x:y")]
#[case("h1.title-2")]
#[case("\u{00E9}l\u{00E9}ment")]
fn test_valid_element_names(#[case] name: &str) {
    let element = Element::named(name).unwrap();
    assert_eq!(element.name(), name);
}

#[rstest]
#[case("")]
#[case("1st")]
#[case("with space")]
#[case("-dash")]
#[case("a<b")]
#[case("a&b")]
fn test_invalid_element_names(#[case] name: &str) {
    match Element::named(name) {
        Err(Error::InvalidElementName(n)) => assert_eq!(n, name),
        other => panic!("expected InvalidElementName, got {:?}", other),
    }
}

#[test]
fn test_cdata_terminator_rejected_but_text_accepted() {
    for s in ["]]>", "a]]>b", "]]>]]>"] {
        assert!(matches!(
            Node::cdata(s),
            Err(Error::InvalidCDATATerminator(_))
        ));
        let text = Node::text(s).unwrap();
        assert!(!text.to_string().contains("]]>"));
    }
}

#[test]
fn test_illegal_characters() {
    assert!(matches!(Text::new("\u{0}"), Err(Error::InvalidCharacterData(_))));
    assert!(matches!(CData::new("\u{B}"), Err(Error::InvalidCharacterData(_))));
    assert!(matches!(
        EntityRef::new("\u{FFFE}"),
        Err(Error::InvalidCharacterData(_))
    ));
}

#[test]
fn test_supplementary_plane_rejected() {
    assert!(matches!(
        Node::text("\u{1F600}"),
        Err(Error::InvalidCharacterData(_))
    ));
}

#[test]
fn test_entity_ref_is_not_name_checked() {
    // only the character rule applies to entity names
    assert!(Node::entity_ref("1 2").is_ok());
}

#[test]
fn test_element_construction() {
    let mut attributes = Attributes::new();
    attributes.insert("id".to_string(), "x1".to_string());
    let scope = NamespaceBinding::Empty.append_prefixed("p", "urn:p").unwrap();
    let element = Element::new(
        Some("p"),
        "item",
        attributes,
        scope.clone(),
        Group::new(vec![Node::text("t").unwrap()]),
    )
    .unwrap();
    assert_eq!(element.prefix(), Some("p"));
    assert_eq!(element.name(), "item");
    assert_eq!(element.qname(), "p:item");
    assert_eq!(element.attribute("id"), Some("x1"));
    assert_eq!(element.scope(), &scope);
    assert_eq!(element.namespace_uri(), Some("urn:p"));
    assert_eq!(element.children().len(), 1);
}

#[test]
fn test_nodes_are_shareable_across_threads() {
    let node: Node = Element::named("a")
        .unwrap()
        .with_scope(NamespaceBinding::Empty.append("urn:a"))
        .unwrap()
        .with_children(Group::new(vec![Node::text("x").unwrap()]))
        .into();
    let shared = std::sync::Arc::new(node);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let node = shared.clone();
            std::thread::spawn(move || node.to_string())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), r#"<a xmlns="urn:a">x</a>"#);
    }
}

#[test]
fn test_with_children_shares_scope() {
    let scope = NamespaceBinding::Empty.append_prefixed("a", "urn:a").unwrap();
    let element = Element::named("e").unwrap().with_scope(scope).unwrap();
    let updated = element.with_children(Group::new(vec![Node::text("x").unwrap()]));
    assert_eq!(updated.scope(), element.scope());
    assert!(element.children().is_empty());
}
