use std::borrow::Cow;
use std::io::Cursor;

use encoding_rs::Encoding;
use xhtmlchardet::detect;

use crate::error::Error;

/// Decode XML bytes to a string.
///
/// The encoding comes from a byte order mark or the XML declaration, and
/// is UTF-8 when neither says otherwise. Malformed input is rejected
/// rather than decoded with replacement characters.
pub(crate) fn decode(data: &[u8]) -> Result<Cow<'_, str>, Error> {
    let charsets =
        detect(&mut Cursor::new(data), None).map_err(|_| Error::UnsupportedEncoding)?;
    let label = charsets.first().map_or("UTF-8", String::as_str);
    let encoding = Encoding::for_label(label.as_bytes()).ok_or(Error::UnsupportedEncoding)?;
    let (decoded, used, had_errors) = encoding.decode(data);
    if had_errors {
        return Err(Error::UnsupportedEncoding);
    }
    tracing::trace!(encoding = used.name(), "decoded input");
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_utf8_is_borrowed() {
        let data = "<?xml version=\"1.0\" encoding=\"UTF-8\"?><a>\u{e9}</a>".as_bytes();
        let decoded = decode(data).unwrap();
        assert!(matches!(decoded, Cow::Borrowed(_)));
        assert!(decoded.ends_with("<a>\u{e9}</a>"));
    }

    #[test]
    fn test_undeclared_defaults_to_utf8() {
        let decoded = decode(b"<a>x</a>").unwrap();
        assert!(matches!(decoded, Cow::Borrowed("<a>x</a>")));
    }

    #[test]
    fn test_latin1_is_transcoded() {
        let data = b"<?xml version=\"1.0\" encoding=\"iso-8859-1\"?><a>caf\xe9</a>";
        let decoded = decode(data).unwrap();
        assert!(matches!(decoded, Cow::Owned(_)));
        assert!(decoded.ends_with("<a>caf\u{e9}</a>"));
    }

    #[test]
    fn test_invalid_utf8() {
        let data = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?><a>\xff\xfe\xfd</a>";
        assert!(matches!(decode(data), Err(Error::UnsupportedEncoding)));
    }
}
