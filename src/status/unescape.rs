use std::borrow::Cow;

/// Replaces literal `\uXXXX` sequences with the character they name.
///
/// Some servers escape their MOTD twice, so these survive JSON decoding as
/// plain text. A high surrogate directly followed by an escaped low
/// surrogate becomes one character, and a surrogate without its pair becomes
/// U+FFFD. Anything that is not four hex digits is kept as written.
pub fn unescape_unicode(input: &str) -> Cow<'_, str> {
    if !input.contains("\\u") {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find("\\u") {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match decode_escape(tail) {
            Some((ch, used)) => {
                out.push(ch);
                rest = &tail[used..];
            }
            None => {
                out.push_str("\\u");
                rest = &tail[2..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Decodes the escape at the start of `s`, returning the char and bytes used.
fn decode_escape(s: &str) -> Option<(char, usize)> {
    let unit = hex4(s)?;
    if (0xD800..0xDC00).contains(&unit) {
        let low = s
            .get(6..)
            .filter(|next| next.starts_with("\\u"))
            .and_then(hex4)
            .filter(|low| (0xDC00..0xE000).contains(low));
        if let Some(low) = low {
            let combined = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
            if let Some(ch) = char::from_u32(combined) {
                return Some((ch, 12));
            }
        }
    }
    Some((char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER), 6))
}

fn hex4(s: &str) -> Option<u32> {
    let digits = s.get(2..6)?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}
