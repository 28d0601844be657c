//! Locating the structured payload inside free-form judge output

use std::borrow::Cow;

const CODE_FENCE: &str = "```";

/// Remove every Markdown code-fence marker.
pub fn strip_code_fences(text: &str) -> Cow<'_, str> {
    if text.contains(CODE_FENCE) {
        Cow::Owned(text.replace(CODE_FENCE, ""))
    } else {
        Cow::Borrowed(text)
    }
}

/// Span from the first `[` through the first `]` in the whole text.
///
/// The closing bracket is not matched against the opening one. If there is
/// no `]` at or after the first `[`, the span is empty. `None` means the
/// text has no `[` at all.
pub fn first_bracket_span(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    Some(match text.find(']') {
        Some(end) if end >= start => &text[start..=end],
        _ => "",
    })
}

/// Span from the first `{` through the first `}`; empty when either is
/// missing or they are out of order.
pub fn first_brace_span(text: &str) -> &str {
    match (text.find('{'), text.find('}')) {
        (Some(start), Some(end)) if end >= start => &text[start..=end],
        _ => "",
    }
}

/// Span from the first `open` through its matching `close`.
///
/// Brackets inside single- or double-quoted strings are ignored. When the
/// text ends before the bracket closes, the span runs to the end of the
/// text. `None` means `open` never occurs.
pub fn balanced_span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' => quote = Some(c),
            c if c == open => depth += 1,
            c if c == close => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + c.len_utf8();
                    return Some(&text[start..end]);
                }
            }
            _ => {}
        }
    }

    Some(&text[start..])
}
