//! Escaping of character data and attribute values, and decoding of
//! entities found by the parser.
use std::borrow::Cow;

use crate::error::Error;
use crate::validate::is_legal_char;

/// Escape text for use as element content.
///
/// `&`, `<` and `>` are replaced by their predefined entities; everything
/// else passes through unchanged.
///
/// ```rust
/// use xmlfrag::entity::escape_text;
///
/// assert_eq!(escape_text("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
/// ```
pub fn escape_text(content: &str) -> Cow<'_, str> {
    if !content.contains(['&', '<', '>']) {
        return Cow::Borrowed(content);
    }
    let mut result = String::with_capacity(content.len() + 8);
    for c in content.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Quote and escape an attribute value.
///
/// A value containing a double quote is wrapped in single quotes, with
/// `&`, `<` and `'` escaped. Any other value is wrapped in double quotes,
/// with `&`, `<` and `"` escaped.
///
/// ```rust
/// use xmlfrag::entity::quote_attribute;
///
/// assert_eq!(quote_attribute(r#"he said "hi""#), r#"'he said "hi"'"#);
/// assert_eq!(quote_attribute("it's"), r#""it's""#);
/// ```
pub fn quote_attribute(value: &str) -> String {
    let (quote, escaped_quote) = if value.contains('"') {
        ('\'', "&apos;")
    } else {
        ('"', "&quot;")
    };
    let mut result = String::with_capacity(value.len() + 2);
    result.push(quote);
    for c in value.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            c if c == quote => result.push_str(escaped_quote),
            _ => result.push(c),
        }
    }
    result.push(quote);
    result
}

/// A piece of decoded character data: either text or a reference to an
/// entity that is not predefined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TextPart<'a> {
    Text(Cow<'a, str>),
    EntityRef(String),
}

fn predefined_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "apos" => Some('\''),
        "gt" => Some('>'),
        "lt" => Some('<'),
        "quot" => Some('"'),
        _ => None,
    }
}

fn character_reference(entity: &str) -> Result<Option<char>, Error> {
    let Some(reference) = entity.strip_prefix('#') else {
        return Ok(None);
    };
    let code = if let Some(hex) = reference.strip_prefix('x') {
        u32::from_str_radix(hex, 16)
    } else {
        reference.parse::<u32>()
    };
    code.ok()
        .and_then(char::from_u32)
        .filter(|c| is_legal_char(*c))
        .map(Some)
        .ok_or_else(|| Error::InvalidEntity(entity.to_string()))
}

/// Split raw character data into text and entity references.
///
/// Predefined entities and character references are decoded into the
/// surrounding text; any other entity becomes a [`TextPart::EntityRef`].
pub(crate) fn parse_text_entities(content: &str) -> Result<Vec<TextPart<'_>>, Error> {
    if !content.contains('&') {
        return Ok(vec![TextPart::Text(Cow::Borrowed(content))]);
    }
    let mut parts = Vec::new();
    let mut text = String::new();
    let mut chars = content.chars();
    while let Some(c) = chars.next() {
        if c != '&' {
            text.push(c);
            continue;
        }
        let entity = take_entity(&mut chars)?;
        if let Some(c) = predefined_entity(&entity) {
            text.push(c);
        } else if let Some(c) = character_reference(&entity)? {
            text.push(c);
        } else {
            if !text.is_empty() {
                parts.push(TextPart::Text(Cow::Owned(std::mem::take(&mut text))));
            }
            parts.push(TextPart::EntityRef(entity));
        }
    }
    if !text.is_empty() {
        parts.push(TextPart::Text(Cow::Owned(text)));
    }
    Ok(parts)
}

/// Decode an attribute value. Only predefined entities and character
/// references are allowed.
pub(crate) fn parse_attribute_entities(content: &str) -> Result<Cow<'_, str>, Error> {
    if !content.contains('&') {
        return Ok(Cow::Borrowed(content));
    }
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(c) = chars.next() {
        if c != '&' {
            result.push(c);
            continue;
        }
        let entity = take_entity(&mut chars)?;
        match predefined_entity(&entity) {
            Some(c) => result.push(c),
            None => match character_reference(&entity)? {
                Some(c) => result.push(c),
                None => return Err(Error::InvalidEntity(entity)),
            },
        }
    }
    Ok(Cow::Owned(result))
}

fn take_entity(chars: &mut std::str::Chars<'_>) -> Result<String, Error> {
    let mut entity = String::new();
    for c in chars.by_ref() {
        if c == ';' {
            return Ok(entity);
        }
        entity.push(c);
    }
    Err(Error::UnclosedEntity(entity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("A & B"), "A &amp; B");
        assert_eq!(escape_text("]]>"), "]]&gt;");
        assert_eq!(escape_text(r#"'quotes' "stay""#), r#"'quotes' "stay""#);
    }

    #[test]
    fn test_escape_text_no_entities() {
        let text = "hello";
        let result = escape_text(text);
        // this is the same slice
        assert!(std::ptr::eq(text, result.as_ref()));
    }

    #[test]
    fn test_quote_attribute_plain() {
        assert_eq!(quote_attribute("plain"), r#""plain""#);
        assert_eq!(quote_attribute(""), r#""""#);
    }

    #[test]
    fn test_quote_attribute_escapes() {
        assert_eq!(quote_attribute("a<b&c>d"), r#""a&lt;b&amp;c>d""#);
    }

    #[test]
    fn test_quote_attribute_both_quotes() {
        assert_eq!(
            quote_attribute(r#"it's "quoted""#),
            r#"'it&apos;s "quoted"'"#
        );
    }

    #[test]
    fn test_parse_text() {
        assert_eq!(
            parse_text_entities("A &amp; B").unwrap(),
            vec![TextPart::Text("A & B".into())]
        );
    }

    #[test]
    fn test_parse_text_multiple() {
        assert_eq!(
            parse_text_entities("&amp;&apos;&gt;&lt;&quot;").unwrap(),
            vec![TextPart::Text("&'><\"".into())]
        );
    }

    #[test]
    fn test_parse_text_character_references() {
        assert_eq!(
            parse_text_entities("&#65;&#x42;&#x20AC;").unwrap(),
            vec![TextPart::Text("AB\u{20AC}".into())]
        );
    }

    #[test]
    fn test_parse_text_illegal_character_reference() {
        let err = parse_text_entities("&#0;");
        if let Err(Error::InvalidEntity(entity)) = err {
            assert_eq!(entity, "#0");
        } else {
            unreachable!();
        }
    }

    #[test]
    fn test_parse_text_entity_ref() {
        assert_eq!(
            parse_text_entities("a&nbsp;b&copy;").unwrap(),
            vec![
                TextPart::Text("a".into()),
                TextPart::EntityRef("nbsp".to_string()),
                TextPart::Text("b".into()),
                TextPart::EntityRef("copy".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_unfinished_entity() {
        let err = parse_text_entities("&amp");
        if let Err(Error::UnclosedEntity(entity)) = err {
            assert_eq!(entity, "amp");
        } else {
            unreachable!();
        }
    }

    #[test]
    fn test_parse_text_no_entities() {
        let text = "hello";
        let parts = parse_text_entities(text).unwrap();
        match &parts[..] {
            [TextPart::Text(Cow::Borrowed(s))] => assert!(std::ptr::eq(text, *s)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_parse_attribute() {
        assert_eq!(
            parse_attribute_entities("&quot;x&quot; &#x26;").unwrap(),
            "\"x\" &"
        );
    }

    #[test]
    fn test_parse_attribute_unknown_entity() {
        let err = parse_attribute_entities("&unknown;");
        if let Err(Error::InvalidEntity(entity)) = err {
            assert_eq!(entity, "unknown");
        } else {
            unreachable!();
        }
    }
}
