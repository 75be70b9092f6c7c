//! HTML character reference decoding and minimal escaping.

const NAMED: &[(&str, &str)] = &[
    ("amp", "&"),
    ("lt", "<"),
    ("gt", ">"),
    ("quot", "\""),
    ("apos", "'"),
    ("nbsp", "\u{a0}"),
    ("copy", "©"),
    ("reg", "®"),
    ("trade", "™"),
    ("hellip", "…"),
    ("mdash", "—"),
    ("ndash", "–"),
    ("lsquo", "‘"),
    ("rsquo", "’"),
    ("ldquo", "“"),
    ("rdquo", "”"),
    ("laquo", "«"),
    ("raquo", "»"),
    ("middot", "·"),
    ("bull", "•"),
    ("yen", "¥"),
    ("euro", "€"),
    ("times", "×"),
    ("divide", "÷"),
];

/// Longest named reference we recognize, including the trailing `;`
const MAX_REFERENCE_LEN: usize = 12;

/// Decode character references. Unknown or malformed references stay literal.
pub fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        match decode_reference(tail) {
            Some((decoded, consumed)) => {
                out.push_str(&decoded);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Decode one reference at the start of `tail` (which begins with `&`).
/// Returns the decoded text and the number of bytes consumed.
fn decode_reference(tail: &str) -> Option<(String, usize)> {
    let window_end = tail
        .char_indices()
        .take(MAX_REFERENCE_LEN)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(tail.len());
    let semi = tail[..window_end].find(';')?;
    let body = &tail[1..semi];

    if let Some(numeric) = body.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        let ch = char::from_u32(code).unwrap_or('\u{fffd}');
        return Some((ch.to_string(), semi + 1));
    }

    NAMED
        .iter()
        .find(|(name, _)| *name == body)
        .map(|(_, value)| (value.to_string(), semi + 1))
}

/// Escape text content: `&`, `<` and `>` only
pub fn escape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape a double-quoted attribute value: `&` and `"` only
pub fn escape_attribute(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
