use xmlfrag::{parse, parse_fragment, Error};

#[test]
fn test_parse_invalid_close_tag() {
    let err = parse(r#"<doc></a></doc>"#).unwrap_err();
    assert!(matches!(err, Error::UnmatchedCloseTag(name) if name == "a"));
}

#[test]
fn test_parse_invalid_close_tag_prefix() {
    let err = parse(r#"<doc xmlns:a="http://example.com"></a:doc></doc>"#).unwrap_err();
    assert!(matches!(err, Error::UnmatchedCloseTag(name) if name == "a:doc"));
}

#[test]
fn test_unknown_prefix() {
    let err = parse(r#"<doc><a:p/></doc>"#).unwrap_err();
    assert!(matches!(err, Error::UnknownPrefix(prefix) if prefix == "a"));
}

#[test]
fn test_tokenizer_error() {
    let err = parse(r#"<doc a=1/>"#).unwrap_err();
    assert!(matches!(err, Error::Parser(_)));
}

#[test]
fn test_no_root_element() {
    assert!(matches!(parse_fragment("").map(|g| g.len()), Ok(0)));
    assert!(parse("").is_err());
}

#[test]
fn test_dtd_unsupported() {
    let err = parse(r#"<!DOCTYPE note SYSTEM "Note.dtd"><note></note>"#).unwrap_err();
    assert!(matches!(err, Error::DtdUnsupported));
}

#[test]
fn test_unclosed_entity() {
    let err = parse(r#"<doc a="&amp"/>"#);
    // the tokenizer may reject this before entity decoding does
    assert!(matches!(
        err,
        Err(Error::UnclosedEntity(_)) | Err(Error::Parser(_))
    ));
}

#[test]
fn test_error_display() {
    let err = parse(r#"<doc><a:p/></doc>"#).unwrap_err();
    assert_eq!(err.to_string(), "unknown prefix: a");
}

#[test]
fn test_duplicate_namespace_declaration() {
    let err = parse(r#"<e xmlns:p="urn:b" xmlns:p="urn:a"/>"#).unwrap_err();
    assert!(matches!(err, Error::DuplicateAttribute(name) if name == "xmlns:p"));
}
