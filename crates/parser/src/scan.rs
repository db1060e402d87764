use once_cell::sync::Lazy;
use regex::Regex;

static STEP_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\(step.*\)$").expect("step pattern"));
static ASSUME_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(assume.*\)$").expect("assume pattern"));

/// Whether a certificate line is a `(step ...)` command.
#[must_use]
pub fn is_step_line(line: &str) -> bool {
    STEP_LINE.is_match(line)
}

/// Whether a certificate line is an `(assume ...)` command.
#[must_use]
pub fn is_assume_line(line: &str) -> bool {
    ASSUME_LINE.is_match(line)
}

/// Text between the balanced parentheses following the first occurrence of
/// `marker`.
///
/// Returns an empty string when the marker or the opening parenthesis is
/// missing. An unbalanced form yields everything up to the end of input, so
/// malformed certificates degrade instead of failing.
#[must_use]
pub fn enclosed_text<'a>(s: &'a str, marker: &str) -> &'a str {
    let Some(marker_at) = s.find(marker) else {
        return "";
    };
    let after = marker_at + marker.len();
    let Some(open_offset) = s[after..].find('(') else {
        return "";
    };
    let open = after + open_offset;

    let bytes = s.as_bytes();
    let mut depth = 1usize;
    let mut at = open + 1;
    while depth != 0 && at < bytes.len() {
        match bytes[at] {
            b'(' => depth += 1,
            b')' => depth -= 1,
            _ => {}
        }
        if depth != 0 {
            at += 1;
        }
    }
    &s[open + 1..at]
}

/// Strip backslash escapes in front of the DOT record delimiters
/// (`"`, `>`, `<`, `{`, `}`, `|`).
#[must_use]
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if matches!(next, '"' | '>' | '<' | '{' | '}' | '|') {
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// Space-join two possibly empty fragments.
#[must_use]
pub fn join_args(a: &str, b: &str) -> String {
    if a.is_empty() {
        return b.to_string();
    }
    if b.is_empty() {
        return a.to_string();
    }
    format!("{a} {b}")
}
