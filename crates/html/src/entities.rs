/// Decode the small, fixed set of character references fragments actually use.
///
/// Contract:
/// - Named: `&amp;`, `&lt;`, `&gt;`, `&quot;`, `&apos;`, `&nbsp;` (semicolon required).
/// - Numeric: `&#215;` and `&#xD7;`, semicolon-terminated, valid Unicode scalars only.
/// - Everything else (unknown names, missing semicolons, surrogates, overlong digit runs)
///   is copied through unchanged.
pub(crate) fn decode_entities(s: &str) -> String {
    let bytes = s.as_bytes();
    let Some(first) = memchr::memchr(b'&', bytes) else {
        return s.to_string();
    };

    let mut out = String::with_capacity(s.len());
    out.push_str(&s[..first]);
    let mut i = first;

    while i < bytes.len() {
        if bytes[i] != b'&' {
            let next = memchr::memchr(b'&', &bytes[i..]).map_or(bytes.len(), |rel| i + rel);
            out.push_str(&s[i..next]);
            i = next;
            continue;
        }
        match decode_reference(&s[i..]) {
            Some((ch, consumed)) => {
                out.push(ch);
                i += consumed;
            }
            None => {
                out.push('&');
                i += 1;
            }
        }
    }

    out
}

const NAMED: &[(&str, char)] = &[
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&apos;", '\''),
    ("&nbsp;", '\u{00A0}'),
];

// 0x10FFFF and 1114111 respectively.
const MAX_HEX_DIGITS: usize = 6;
const MAX_DEC_DIGITS: usize = 7;

/// Decodes one reference at the start of `rest` (which begins with `&`).
/// Returns the character and the number of bytes consumed.
fn decode_reference(rest: &str) -> Option<(char, usize)> {
    for (name, ch) in NAMED {
        if rest.starts_with(name) {
            return Some((*ch, name.len()));
        }
    }

    let body = rest.strip_prefix("&#")?;
    let (digits_start, radix, max_digits) = match body.as_bytes().first() {
        Some(b'x' | b'X') => (3, 16, MAX_HEX_DIGITS),
        _ => (2, 10, MAX_DEC_DIGITS),
    };
    let digits = &rest[digits_start..];
    let end = digits
        .bytes()
        .take(max_digits + 1)
        .position(|b| b == b';')?;
    if end == 0 {
        return None;
    }
    let raw = &digits[..end];
    if !raw.bytes().all(|b| (b as char).is_digit(radix)) {
        return None;
    }
    let ch = u32::from_str_radix(raw, radix).ok().and_then(char::from_u32)?;
    Some((ch, digits_start + end + 1))
}
