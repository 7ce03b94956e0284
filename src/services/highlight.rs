// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Safe rendering of backend highlight markup.
//!
//! The search backend marks matched substrings with `<em>` (some deployments use
//! `<mark>`). Those two tags are the only markup honored; everything else in the
//! fragment is treated as text and escaped again on output.

use crate::models::search::ResultItem;

/// A run of text that is either emphasized (a match) or not
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub highlighted: bool,
}

/// Highlight markup split into plain and matched runs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Highlighted {
    segments: Vec<Segment>,
}

const EMPHASIS_TAGS: [(&str, bool); 4] = [
    ("<em>", true),
    ("</em>", false),
    ("<mark>", true),
    ("</mark>", false),
];

const NAMED_ENTITIES: [(&str, char); 8] = [
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&apos;", '\''),
    ("&#39;", '\''),
    ("&nbsp;", '\u{a0}'),
    ("&hellip;", '\u{2026}'),
];

impl Highlighted {
    /// Text without any emphasis; used when the backend sent no highlight data
    pub fn plain(text: &str) -> Self {
        let mut highlighted = Self::default();
        highlighted.push(text, false);
        highlighted
    }

    /// Split backend markup into segments
    pub fn parse(markup: &str) -> Self {
        let mut highlighted = Self::default();
        let mut depth = 0usize;
        let mut buf = String::new();
        let mut rest = markup;

        while let Some(c) = rest.chars().next() {
            if c == '<' {
                if let Some((tag, opens)) = match_emphasis_tag(rest) {
                    highlighted.push(&buf, depth > 0);
                    buf.clear();
                    if opens {
                        depth += 1;
                    } else {
                        depth = depth.saturating_sub(1);
                    }
                    rest = &rest[tag.len()..];
                    continue;
                }
            } else if c == '&' {
                if let Some((consumed, decoded)) = decode_entity(rest) {
                    buf.push(decoded);
                    rest = &rest[consumed..];
                    continue;
                }
            }
            buf.push(c);
            rest = &rest[c.len_utf8()..];
        }
        highlighted.push(&buf, depth > 0);
        highlighted
    }

    fn push(&mut self, text: &str, highlighted: bool) {
        if text.is_empty() {
            return;
        }
        match self.segments.last_mut() {
            Some(last) if last.highlighted == highlighted => last.text.push_str(text),
            _ => self.segments.push(Segment {
                text: text.to_string(),
                highlighted,
            }),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn has_matches(&self) -> bool {
        self.segments.iter().any(|s| s.highlighted)
    }

    /// Text with all markup removed
    pub fn plain_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// HTML with every text run escaped and matches wrapped in `<mark>`
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            if segment.highlighted {
                out.push_str("<mark>");
                escape_into(&segment.text, &mut out);
                out.push_str("</mark>");
            } else {
                escape_into(&segment.text, &mut out);
            }
        }
        out
    }

    /// Wrap matches in caller-chosen delimiters, text left unescaped (terminals)
    pub fn render_with(&self, open: &str, close: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            if segment.highlighted {
                out.push_str(open);
                out.push_str(&segment.text);
                out.push_str(close);
            } else {
                out.push_str(&segment.text);
            }
        }
        out
    }
}

fn match_emphasis_tag(input: &str) -> Option<(&'static str, bool)> {
    EMPHASIS_TAGS.iter().copied().find(|(tag, _)| {
        input
            .get(..tag.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(tag))
    })
}

/// Decode an entity at the start of `input`, returning the bytes consumed
fn decode_entity(input: &str) -> Option<(usize, char)> {
    if let Some((entity, c)) = NAMED_ENTITIES
        .iter()
        .find(|(entity, _)| input.starts_with(entity))
    {
        return Some((entity.len(), *c));
    }

    let end = input.find(';')?;
    let body = input.get(2..end).filter(|_| input.starts_with("&#"))?;
    let code = match body.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => body.parse::<u32>().ok()?,
    };
    char::from_u32(code).map(|c| (end + 1, c))
}

fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

/// Highlighted views of a search hit
pub trait HighlightedFields {
    /// Title with matched substrings marked, or the plain title without highlight data
    fn highlighted_title(&self) -> Highlighted;

    /// Body snippet with matches marked, if the backend sent one
    fn highlighted_snippet(&self) -> Option<Highlighted>;
}

impl HighlightedFields for ResultItem {
    fn highlighted_title(&self) -> Highlighted {
        self.highlight
            .as_ref()
            .and_then(|h| h.title.as_deref())
            .map(Highlighted::parse)
            .unwrap_or_else(|| Highlighted::plain(&self.title))
    }

    fn highlighted_snippet(&self) -> Option<Highlighted> {
        self.highlight
            .as_ref()
            .and_then(|h| h.snippet.as_deref())
            .map(Highlighted::parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::search::{HighlightMarkup, ItemCounts};

    #[test]
    fn test_parse_marks_matches() {
        let highlighted = Highlighted::parse("Learning <em>React</em> hooks");

        assert_eq!(
            highlighted.segments(),
            &[
                Segment {
                    text: "Learning ".to_string(),
                    highlighted: false
                },
                Segment {
                    text: "React".to_string(),
                    highlighted: true
                },
                Segment {
                    text: " hooks".to_string(),
                    highlighted: false
                },
            ]
        );
        assert_eq!(
            highlighted.to_html(),
            "Learning <mark>React</mark> hooks"
        );
    }

    #[test]
    fn test_other_markup_is_escaped() {
        let highlighted =
            Highlighted::parse("<script>alert(1)</script> <EM>react</EM> <b>bold</b>");

        assert_eq!(
            highlighted.to_html(),
            "&lt;script&gt;alert(1)&lt;/script&gt; <mark>react</mark> &lt;b&gt;bold&lt;/b&gt;"
        );
    }

    #[test]
    fn test_pre_escaped_entities_are_not_double_escaped() {
        let highlighted = Highlighted::parse("Tom &amp; Jerry &lt;3 <em>cats</em>&#x27;");

        assert_eq!(highlighted.plain_text(), "Tom & Jerry <3 cats'");
        assert_eq!(
            highlighted.to_html(),
            "Tom &amp; Jerry &lt;3 <mark>cats</mark>&#39;"
        );
    }

    #[test]
    fn test_unknown_entity_kept_as_text() {
        let highlighted = Highlighted::parse("fish &chips; &#zz;");
        assert_eq!(highlighted.plain_text(), "fish &chips; &#zz;");
    }

    #[test]
    fn test_unbalanced_tags() {
        let highlighted = Highlighted::parse("a</em> <em>b <em>c</em> d");

        assert_eq!(highlighted.render_with("[", "]"), "a [b c d]");
    }

    #[test]
    fn test_plain_fallback() {
        let highlighted = Highlighted::plain("<em>not markup</em>");

        assert!(!highlighted.has_matches());
        assert_eq!(
            highlighted.to_html(),
            "&lt;em&gt;not markup&lt;/em&gt;"
        );
    }

    #[test]
    fn test_multibyte_text() {
        let highlighted = Highlighted::parse("café <em>crème</em> brûlée");
        assert_eq!(highlighted.render_with("*", "*"), "café *crème* brûlée");
    }

    fn hit(title: &str, highlight: Option<HighlightMarkup>) -> ResultItem {
        ResultItem {
            id: "p1".to_string(),
            title: title.to_string(),
            author: String::new(),
            category: None,
            tags: Vec::new(),
            created_at: None,
            counts: ItemCounts::default(),
            highlight,
        }
    }

    #[test]
    fn test_highlighted_title_falls_back_to_plain() {
        let item = hit("a < b", None);
        assert_eq!(item.highlighted_title().to_html(), "a &lt; b");
        assert!(item.highlighted_snippet().is_none());
    }

    #[test]
    fn test_highlighted_fields_use_markup() {
        let item = hit(
            "Learning React",
            Some(HighlightMarkup {
                title: Some("Learning <em>React</em>".to_string()),
                snippet: Some("<script>x</script> <em>react</em>".to_string()),
            }),
        );

        assert_eq!(
            item.highlighted_title().to_html(),
            "Learning <mark>React</mark>"
        );
        assert_eq!(
            item.highlighted_snippet().unwrap().to_html(),
            "&lt;script&gt;x&lt;/script&gt; <mark>react</mark>"
        );
    }
}
