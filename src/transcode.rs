//! LaTeX escaping and color wrapping of scanned segments.

use crate::config::LINE_BREAK;
use crate::scanner::{NUL, Segment};

/// Replacement for a character that is significant to LaTeX, if any
fn replacement(c: char) -> Option<&'static str> {
    let s = match c {
        '$' => "\\$",
        '\\' => "$\\backslash$",
        '{' => "\\{",
        '}' => "\\}",
        '_' => "\\_",
        '%' => "\\%",
        '#' => "\\#",
        '&' => "\\&",
        '^' => "\\verb1^1",
        '~' => "\\verb1~1",
        // Arrow glyphs keep the listing's inverted direction
        '\u{18}' => "$\\downarrow$",
        '\u{19}' => "$\\uparrow$",
        ' ' => "~",
        _ => return None,
    };
    Some(s)
}

/// Escape a literal run in a single pass.
///
/// Output of a replacement is never scanned again, so the result must not be
/// fed back through this function. The run ends at the first NUL byte.
/// Bytes that are not valid UTF-8 are replaced with U+FFFD.
pub fn escape(text: &[u8]) -> String {
    let end = text.iter().position(|&b| b == NUL).unwrap_or(text.len());
    let decoded = String::from_utf8_lossy(&text[..end]);

    let mut out = String::with_capacity(decoded.len() + decoded.len() / 4);
    for c in decoded.chars() {
        match replacement(c) {
            Some(s) => out.push_str(s),
            None => out.push(c),
        }
    }
    out
}

/// Escape a section title. Spaces stay breakable.
pub fn escape_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.chars() {
        match replacement(c) {
            Some(s) if c != ' ' => out.push_str(s),
            _ => out.push(c),
        }
    }
    out
}

/// Render one segment: escaped text inside its color directive
pub fn render_segment(segment: &Segment, out: &mut String) {
    out.push_str(&segment.color.prefix());
    out.push_str(&escape(&segment.text));
    out.push_str(segment.color.suffix());
}

/// Render a full line, terminated by the line-break directive
pub fn render_line(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        render_segment(segment, &mut out);
    }
    out.push_str(LINE_BREAK);
    out
}
