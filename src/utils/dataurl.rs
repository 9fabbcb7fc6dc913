//! RFC 2397 `data:` URLs in the ASCII (percent-encoded) form.
//!
//! Machine config consumers read file contents from `data:` URLs. Only the
//! `text/plain` media type without parameters is produced here.

const PREFIX: &str = "data:text/plain,";

const HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Percent-encode `data` into a `data:text/plain,` URL.
///
/// Unreserved characters and the reserved characters that are legal inside
/// the data part (`$&+,/:;=?@`) are kept; every other byte becomes `%XX`
/// with uppercase hex digits.
///
/// # Examples
///
/// ```rust
/// use kubeboot::utils::dataurl;
///
/// assert_eq!(dataurl::encode_text(b"a b\n"), "data:text/plain,a%20b%0A");
/// ```
pub fn encode_text(data: &[u8]) -> String {
    let mut out = String::with_capacity(PREFIX.len() + data.len() * 3);
    out.push_str(PREFIX);
    for &byte in data {
        if keeps_literal(byte) {
            out.push(char::from(byte));
        } else {
            out.push('%');
            out.push(char::from(HEX[usize::from(byte >> 4)]));
            out.push(char::from(HEX[usize::from(byte & 0x0f)]));
        }
    }
    out
}

const fn keeps_literal(byte: u8) -> bool {
    matches!(
        byte,
        b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'~'
            | b'$'
            | b'&'
            | b'+'
            | b','
            | b'/'
            | b':'
            | b';'
            | b'='
            | b'?'
            | b'@'
    )
}
