//! Markdown subset renderer for the update log.
//!
//! Parsing is plain CommonMark via `pulldown-cmark`; the event stream is then cut down to
//! `#`–`###` headings, bullet lists, `**bold**` and paragraphs. Deeper headings and code
//! blocks become paragraphs, ordered lists become bullet lists, other inline markup keeps
//! only its text, and raw HTML is escaped as text.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};

/// Convert the supported Markdown subset to HTML.
#[must_use]
pub fn to_html(source: &str) -> String {
    let events = Parser::new_ext(source, Options::empty()).filter_map(restrict);
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

const fn heading_in_subset(level: HeadingLevel) -> bool {
    matches!(level, HeadingLevel::H1 | HeadingLevel::H2 | HeadingLevel::H3)
}

fn restrict(event: Event<'_>) -> Option<Event<'_>> {
    match event {
        Event::Start(Tag::Heading { level, .. }) if !heading_in_subset(level) => {
            Some(Event::Start(Tag::Paragraph))
        }
        Event::End(TagEnd::Heading(level)) if !heading_in_subset(level) => {
            Some(Event::End(TagEnd::Paragraph))
        }
        Event::Start(Tag::List(Some(_))) => Some(Event::Start(Tag::List(None))),
        Event::End(TagEnd::List(true)) => Some(Event::End(TagEnd::List(false))),
        Event::Start(Tag::CodeBlock(_)) => Some(Event::Start(Tag::Paragraph)),
        Event::End(TagEnd::CodeBlock) => Some(Event::End(TagEnd::Paragraph)),
        Event::Start(
            Tag::Heading { .. } | Tag::Paragraph | Tag::List(None) | Tag::Item | Tag::Strong,
        )
        | Event::End(
            TagEnd::Heading(_)
            | TagEnd::Paragraph
            | TagEnd::List(false)
            | TagEnd::Item
            | TagEnd::Strong,
        )
        | Event::SoftBreak
        | Event::HardBreak => Some(event),
        Event::Text(text) | Event::Code(text) | Event::Html(text) | Event::InlineHtml(text) => {
            Some(Event::Text(text))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::to_html;

    fn compact(source: &str) -> String {
        to_html(source).replace('\n', "")
    }

    #[test]
    fn headings_lists_and_paragraphs() {
        let source = "# 更新日志\n\n## v2.1\n- 新增 **云同步**\n- 修复筛选\n\n说明第一行\n第二行\n### 备注";
        assert_eq!(
            compact(source),
            "<h1>更新日志</h1><h2>v2.1</h2><ul><li>新增 <strong>云同步</strong></li>\
             <li>修复筛选</li></ul><p>说明第一行第二行</p><h3>备注</h3>"
        );
    }

    #[test]
    fn text_is_escaped_and_unmatched_bold_is_literal() {
        assert_eq!(compact("a <b> & **c"), "<p>a &lt;b&gt; &amp; **c</p>");

        let block = to_html("<script>alert(1)</script>");
        assert!(!block.contains("<script>"));
        assert!(block.contains("&lt;script&gt;"));
    }

    #[test]
    fn markup_outside_the_subset_keeps_only_text() {
        assert_eq!(compact("* one\n\ntext"), "<ul><li>one</li></ul><p>text</p>");
        assert_eq!(compact("#### deep"), "<p>deep</p>");
        assert_eq!(compact("1. first\n2. second"), "<ul><li>first</li><li>second</li></ul>");
        assert_eq!(
            compact("see *this* [link](https://example.com) and `code`"),
            "<p>see this link and code</p>"
        );
    }
}
