/// Find positions of delimiter characters in `s`, skipping occurrences inside
/// single- or double-quoted regions. A backslash inside a quoted region
/// escapes the next character, so `\"` does not close the quote.
///
/// The callback receives the byte index of each unquoted delimiter found.
/// Return `true` from the callback to stop early.
pub(crate) fn for_each_unquoted(
    s: &str,
    delimiter: impl Fn(char) -> bool,
    mut cb: impl FnMut(usize) -> bool,
) {
    let mut quote: Option<char> = None;
    let mut escape = false;

    for (idx, ch) in s.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        match ch {
            '\\' if quote.is_some() => escape = true,
            '"' | '\'' if quote == Some(ch) => quote = None,
            '"' | '\'' if quote.is_none() => quote = Some(ch),
            _ if quote.is_some() => {}
            _ if delimiter(ch) => {
                if cb(idx) {
                    return;
                }
            }
            _ => {}
        }
    }
}

/// Split `s` on a delimiter character, respecting quoted regions.
pub(crate) fn split_unquoted(s: &str, delimiter: char) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;

    for_each_unquoted(
        s,
        |ch| ch == delimiter,
        |idx| {
            pieces.push(&s[start..idx]);
            start = idx + delimiter.len_utf8();
            false
        },
    );

    pieces.push(&s[start..]);
    pieces
}

/// Split `s` on whitespace while respecting quoted regions, so a quoted
/// argument containing spaces stays one token.
pub(crate) fn split_on_whitespace(s: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut start: Option<usize> = None;
    let mut quote: Option<char> = None;
    let mut escape = false;

    for (idx, ch) in s.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        match ch {
            '\\' if quote.is_some() => escape = true,
            '"' | '\'' if quote == Some(ch) => quote = None,
            '"' | '\'' if quote.is_none() => {
                quote = Some(ch);
                if start.is_none() {
                    start = Some(idx);
                }
            }
            _ if quote.is_some() => {}
            _ if ch.is_whitespace() => {
                if let Some(piece_start) = start.take() {
                    pieces.push(s[piece_start..idx].to_owned());
                }
            }
            _ => {
                if start.is_none() {
                    start = Some(idx);
                }
            }
        }
    }
    if let Some(piece_start) = start {
        pieces.push(s[piece_start..].to_owned());
    }
    pieces
}
