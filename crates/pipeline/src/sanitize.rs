//! Multi-stage sanitization of raw model output.
//!
//! Model completions are untrusted text. Before a generated statement can
//! be executed it passes through a strict, ORDER-SENSITIVE pipeline:
//!
//! 1. strip reasoning spans delimited by `<think>`/`</think>` (content and
//!    tags removed),
//! 2. if a ```sql code fence exists, keep only its body; else if any fence
//!    exists, keep only the first fence's body,
//! 3. strip any remaining markup-style tags (`<...>`),
//! 4. trim a single layer of leading/trailing quote characters.
//!
//! The order is an invariant, not an implementation detail: fences can sit
//! inside reasoning spans, and tag stripping must not see fence markers.
//! Each sub-transform is a pure function, composed by [`sanitize_sql`].

/// Open delimiter of a reasoning span.
const REASONING_OPEN: &str = "<think>";

/// Close delimiter of a reasoning span.
const REASONING_CLOSE: &str = "</think>";

/// Remove reasoning spans, including the delimiters themselves.
///
/// An unclosed open tag is left alone; the later tag-strip stage removes
/// the bare delimiter while keeping the content.
pub fn strip_reasoning(text: &str) -> String {
    let mut result = text.to_string();

    while let Some(open) = result.find(REASONING_OPEN) {
        match result[open..].find(REASONING_CLOSE) {
            Some(rel_close) => {
                let close = open + rel_close + REASONING_CLOSE.len();
                result.replace_range(open..close, "");
            }
            None => break,
        }
    }

    result
}

/// Extract the body of a fenced code block, preferring a ```sql fence.
///
/// Text without any fence passes through unchanged.
pub fn extract_code_fence(text: &str) -> String {
    if let Some(start) = text.find("```sql") {
        let body = &text[start + "```sql".len()..];
        let body = match body.find("```") {
            Some(end) => &body[..end],
            None => body,
        };
        return body.trim().to_string();
    }

    if let Some(start) = text.find("```") {
        let body = &text[start + "```".len()..];
        let body = match body.find("```") {
            Some(end) => &body[..end],
            None => body,
        };
        return body.trim().to_string();
    }

    text.to_string()
}

/// Remove remaining markup-style tags.
///
/// A `<...>` span counts as a tag only when its content is non-empty and
/// contains no whitespace; SQL comparison operators like `a < b` survive.
pub fn strip_tags(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('<') {
        result.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];

        match after_open.find('>') {
            Some(close) => {
                let content = &after_open[..close];
                if !content.is_empty() && !content.contains(char::is_whitespace) {
                    // Tag: drop it
                    rest = &after_open[close + 1..];
                } else {
                    result.push('<');
                    rest = after_open;
                }
            }
            None => {
                result.push('<');
                rest = after_open;
            }
        }
    }

    result.push_str(rest);
    result
}

/// Trim a single layer of matching leading/trailing quote characters.
pub fn trim_quotes(text: &str) -> String {
    let trimmed = text.trim();
    let mut chars = trimmed.chars();

    if let (Some(first), Some(last)) = (chars.next(), chars.next_back()) {
        if first == last && matches!(first, '"' | '\'' | '`') {
            return trimmed[first.len_utf8()..trimmed.len() - last.len_utf8()].to_string();
        }
    }

    trimmed.to_string()
}

/// Run the full sanitize pipeline over raw model output.
pub fn sanitize_sql(raw: &str) -> String {
    let text = strip_reasoning(raw);
    let text = extract_code_fence(&text);
    let text = strip_tags(&text);
    trim_quotes(&text).trim().to_string()
}
