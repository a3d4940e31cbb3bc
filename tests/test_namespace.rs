use xmlfrag::{Error, NamespaceBinding};

fn chain() -> NamespaceBinding {
    NamespaceBinding::Empty
        .append_prefixed("a", "urn:a")
        .unwrap()
        .append_prefixed("b", "urn:b")
        .unwrap()
}

#[test]
fn test_find_prefix() {
    let scope = chain();
    let a = scope.find_prefix("a").unwrap();
    assert_eq!(a.prefix(), Some("a"));
    assert_eq!(a.uri(), Some("urn:a"));
    assert!(scope.find_prefix("c").is_none());
}

#[test]
fn test_to_list_receiver_first() {
    let scope = chain();
    let prefixes: Vec<_> = scope.to_list().iter().map(|b| b.prefix()).collect();
    assert_eq!(prefixes, [Some("b"), Some("a")]);
}

#[test]
fn test_iter_matches_to_list() {
    let scope = chain().append("urn:default");
    let uris: Vec<_> = scope.iter().filter_map(|b| b.uri()).collect();
    assert_eq!(uris, ["urn:default", "urn:b", "urn:a"]);
    assert_eq!(scope.iter().count(), scope.to_list().len());
}

#[test]
fn test_loose_parent() {
    assert_eq!(NamespaceBinding::Empty.loose_parent(), NamespaceBinding::Empty);
    let parent = NamespaceBinding::Empty.append("urn:p");
    let binding = NamespaceBinding::prefixed("a", "urn:a", Some(parent)).unwrap();
    let loose = binding.loose_parent();
    assert_eq!(loose, NamespaceBinding::prefixed("a", "urn:a", None).unwrap());
    assert!(loose.parent().is_none());
    // the receiver keeps its parent
    assert!(binding.parent().is_some());
}

#[test]
fn test_empty() {
    let empty = NamespaceBinding::Empty;
    assert!(empty.is_empty());
    assert!(empty.uri().is_none());
    assert!(empty.parent().is_none());
    assert!(!empty.append("urn:x").is_empty());
}

#[test]
fn test_invalid_prefix() {
    assert!(matches!(
        NamespaceBinding::prefixed("a b", "urn:a", None),
        Err(Error::InvalidElementName(p)) if p == "a b"
    ));
}

#[test]
fn test_unprefixed_matches_only_empty_query() {
    let scope = NamespaceBinding::Empty.append("urn:default");
    assert!(scope.find_prefix("").is_some());
    assert!(scope.find_prefix("a").is_none());
}
