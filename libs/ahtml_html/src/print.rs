//! HTML serialisation primitives, writing into a `String`.

use std::borrow::Cow;
use crate::meta::ElementMeta;

pub const DOCTYPE: &str = "<!DOCTYPE html>\n";

pub const NBSP: &str = "\u{00A0}";

fn needs_escape(b: u8) -> bool {
    matches!(b, b'&' | b'<' | b'>' | b'"' | b'\'')
}

/// Escape the five markup-significant characters. Borrows if there's
/// nothing to escape.
pub fn html_escape(s: &str) -> Cow<str> {
    if !s.bytes().any(needs_escape) {
        return Cow::Borrowed(s)
    }
    let mut buf = String::with_capacity(s.len() + 16);
    push_escaped(&mut buf, s);
    Cow::Owned(buf)
}

pub fn push_escaped(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c)
        }
    }
}

/// The value of an attribute as it is to be printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttValue<'s> {
    /// Boolean attribute that is set, printed as the bare name.
    Present,
    Text(&'s str),
}

pub fn push_attribute(out: &mut String, name: &str, value: AttValue) {
    out.push(' ');
    out.push_str(name); // XX no escape ever needed?
    if let AttValue::Text(v) = value {
        out.push_str("=\"");
        push_escaped(out, v);
        out.push('"');
    }
}

pub fn push_start_tag<'s>(
    out: &mut String,
    meta: &ElementMeta,
    atts: impl IntoIterator<Item = (&'s str, AttValue<'s>)>
) {
    out.push('<');
    out.push_str(&meta.tag_name);
    for (name, value) in atts {
        push_attribute(out, name, value);
    }
    out.push('>');
}

/// Does nothing for void elements.
pub fn push_end_tag(out: &mut String, meta: &ElementMeta) {
    if meta.has_closing_tag {
        out.push_str("</");
        out.push_str(&meta.tag_name);
        out.push('>');
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::MetaDb;

    #[test]
    fn t_file_encoding() {
        assert_eq!(NBSP.as_bytes(), &[0xC2, 0xA0]);
    }

    #[test]
    fn t_html_escape() {
        assert!(matches!(html_escape("plain text"), Cow::Borrowed(_)));
        assert_eq!(html_escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
                   "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;");
        assert_eq!(html_escape("Grüße"), "Grüße");
    }

    #[test]
    fn t_tags() {
        let db = MetaDb::builtin();
        let mut out = String::new();
        let input = db.element("input").unwrap();
        push_start_tag(&mut out, input, [("type", AttValue::Text("text")),
                                         ("checked", AttValue::Present),
                                         ("value", AttValue::Text("a\"b"))]);
        push_end_tag(&mut out, input);
        assert_eq!(out, r#"<input type="text" checked value="a&quot;b">"#);

        let mut out = String::new();
        let p = db.element("p").unwrap();
        push_start_tag(&mut out, p, []);
        out.push_str("hi");
        push_end_tag(&mut out, p);
        assert_eq!(out, "<p>hi</p>");
    }
}
