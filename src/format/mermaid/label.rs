// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-MermaidCanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-canvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Cow;

/// Escapes the characters that would break quoted markup labels.
///
/// `"` becomes `#quot;`, `<` becomes `#lt;`, `>` becomes `#gt;`. Text that already contains
/// these entity spellings does not survive a round trip.
pub fn sanitize_label(label: &str) -> String {
    label
        .replace('"', "#quot;")
        .replace('<', "#lt;")
        .replace('>', "#gt;")
}

/// Inverse of [`sanitize_label`].
pub fn desanitize_label(text: &str) -> String {
    text.replace("#quot;", "\"")
        .replace("#lt;", "<")
        .replace("#gt;", ">")
}

/// Sanitizes a label and writes embedded newlines as `<br/>`.
pub(crate) fn encode_label(label: &str) -> String {
    sanitize_label(label).replace("\r\n", "\n").replace('\n', "<br/>")
}

/// Reads a label written by [`encode_label`]: `<br>`, `<br/>` and `<br />` become newlines.
pub(crate) fn decode_label(text: &str) -> String {
    desanitize_label(&line_breaks_to_newlines(text))
}

fn line_breaks_to_newlines(text: &str) -> Cow<'_, str> {
    if !text.contains('<') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('<') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match line_break_len(tail) {
            Some(len) => {
                out.push('\n');
                rest = &tail[len..];
            }
            None => {
                out.push('<');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn line_break_len(tail: &str) -> Option<usize> {
    let bytes = tail.as_bytes();
    if bytes.len() < 4 || !bytes[1..3].eq_ignore_ascii_case(b"br") {
        return None;
    }
    let mut idx = 3;
    while idx < bytes.len() && bytes[idx].is_ascii_whitespace() {
        idx += 1;
    }
    if idx < bytes.len() && bytes[idx] == b'/' {
        idx += 1;
    }
    (idx < bytes.len() && bytes[idx] == b'>').then_some(idx + 1)
}

#[cfg(test)]
mod tests {
    use super::{decode_label, desanitize_label, encode_label, sanitize_label};

    #[test]
    fn sanitize_replaces_quotes_and_angle_brackets() {
        assert_eq!(sanitize_label(r#"say "hi" <b>"#), "say #quot;hi#quot; #lt;b#gt;");
        assert_eq!(desanitize_label("say #quot;hi#quot; #lt;b#gt;"), r#"say "hi" <b>"#);
    }

    #[test]
    fn sanitize_is_lossy_for_literal_entities() {
        assert_eq!(desanitize_label(&sanitize_label("#quot;")), "\"");
    }

    #[test]
    fn line_breaks_survive_encoding() {
        assert_eq!(encode_label("one\ntwo"), "one<br/>two");
        assert_eq!(decode_label("one<br/>two<BR>three<br />four"), "one\ntwo\nthree\nfour");
        assert_eq!(decode_label("a < b"), "a < b");
        assert_eq!(decode_label("#lt;br/#gt;"), "<br/>");
    }
}
