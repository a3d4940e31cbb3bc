//! Character and name legality checks.
//!
//! These are pure predicates; constructors consult them and fail with a
//! typed [`Error`](crate::Error) when they return `false`.
//!
//! Only the Basic Multilingual Plane is accepted: characters above
//! `U+FFFF` are treated as illegal, both in character data and in names.

/// Returns whether `c` is in the XML 1.0 `Char` production, restricted to
/// the Basic Multilingual Plane.
#[inline]
pub fn is_legal_char(c: char) -> bool {
    matches!(c,
        '\u{9}' | '\u{A}' | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}')
}

/// Returns whether every character of `s` is a legal XML character.
///
/// ```rust
/// use xmlfrag::validate::has_only_legal_chars;
///
/// assert!(has_only_legal_chars("hello\tworld"));
/// assert!(!has_only_legal_chars("bell\u{7}"));
/// ```
pub fn has_only_legal_chars(s: &str) -> bool {
    s.chars().all(is_legal_char)
}

#[inline]
fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}')
}

#[inline]
fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9'
            | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}')
}

/// Returns whether `s` matches the XML `Name` production.
///
/// The empty string is never a valid name.
///
/// ```rust
/// use xmlfrag::validate::is_valid_name;
///
/// assert!(is_valid_name("svg:rect"));
/// assert!(is_valid_name("_x-1.2"));
/// assert!(!is_valid_name("1x"));
/// assert!(!is_valid_name("a b"));
/// assert!(!is_valid_name(""));
/// ```
pub fn is_valid_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if is_name_start_char(first) => chars.all(is_name_char),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("a", true)]
    #[case("A", true)]
    #[case(":", true)]
    #[case("_", true)]
    #[case("foo:bar", true)]
    #[case("a-b.c", true)]
    #[case("a\u{B7}", true)]
    #[case("\u{C0}lan", true)]
    #[case("\u{4E2D}\u{6587}", true)]
    #[case("x\u{301}", true)]
    #[case("", false)]
    #[case("1a", false)]
    #[case("-a", false)]
    #[case(".a", false)]
    #[case("a b", false)]
    #[case("a>", false)]
    #[case("\u{D7}", false)]
    #[case("\u{301}x", false)]
    #[case("\u{10000}", false)]
    fn test_is_valid_name(#[case] name: &str, #[case] valid: bool) {
        assert_eq!(is_valid_name(name), valid);
    }

    #[rstest]
    #[case('\t', true)]
    #[case('\n', true)]
    #[case('\r', true)]
    #[case(' ', true)]
    #[case('\u{D7FF}', true)]
    #[case('\u{E000}', true)]
    #[case('\u{FFFD}', true)]
    #[case('\u{0}', false)]
    #[case('\u{8}', false)]
    #[case('\u{1F}', false)]
    #[case('\u{FFFE}', false)]
    #[case('\u{FFFF}', false)]
    #[case('\u{1F600}', false)]
    fn test_is_legal_char(#[case] c: char, #[case] legal: bool) {
        assert_eq!(is_legal_char(c), legal);
    }

    #[test]
    fn test_empty_string_has_only_legal_chars() {
        assert!(has_only_legal_chars(""));
    }
}
