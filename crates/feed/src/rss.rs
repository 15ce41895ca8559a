// ABOUTME: RSS 2.0 writer built on quick-xml.
// ABOUTME: Emits an indented document, falling back to the compact bytes if indenting fails.

use std::io::Write;

use pagefeed_extract::Article;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::Writer;
use tracing::warn;

use crate::error::FeedError;
use crate::models::Channel;

/// Indentation width of the pretty-printed document.
const INDENT: usize = 2;

/// Renders `articles` under `channel` as an RSS 2.0 document.
///
/// Each article becomes an `<item>` whose `<guid isPermaLink="true">` is its
/// link. Refuses to render an empty feed.
pub fn render_rss(articles: &[Article], channel: &Channel) -> Result<String, FeedError> {
    if articles.is_empty() {
        return Err(FeedError::Empty);
    }

    let mut compact = Writer::new(Vec::new());
    write_rss(&mut compact, articles, channel)?;
    Ok(pretty_or_compact(compact.into_inner()))
}

/// Indents the compact document, or returns it unchanged when it cannot be reformatted.
fn pretty_or_compact(raw: Vec<u8>) -> String {
    match reindent(&raw) {
        Ok(pretty) => pretty,
        Err(err) => {
            warn!(error = %err, "pretty printing failed, writing unformatted feed");
            String::from_utf8_lossy(&raw).into_owned()
        }
    }
}

/// Re-reads a compact document and writes it back with indentation.
fn reindent(raw: &[u8]) -> Result<String, FeedError> {
    let mut reader = Reader::from_reader(raw);
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT);
    let mut depth = 0usize;
    let mut after_start = false;

    loop {
        let event = reader.read_event().map_err(FeedError::serialize)?;
        match event {
            Event::Eof => break,
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| FeedError::serialize("unbalanced end tag"))?;
                // keeps `<a></a>` on one line
                if after_start {
                    write(&mut writer, Event::Text(BytesText::new("")))?;
                }
            }
            _ => {}
        }
        after_start = matches!(event, Event::Start(_));

        match event {
            // Entity references are written back as escaped text so they stay inline.
            Event::GeneralRef(name) => {
                let text = format!("&{};", String::from_utf8_lossy(&name));
                write(&mut writer, Event::Text(BytesText::from_escaped(text)))?;
            }
            other => write(&mut writer, other)?,
        }
    }

    if depth != 0 {
        return Err(FeedError::serialize(format!("{} unclosed elements", depth)));
    }

    let mut xml = String::from_utf8(writer.into_inner()).map_err(FeedError::serialize)?;
    xml.push('\n');
    Ok(xml)
}

fn write_rss<W: Write>(
    writer: &mut Writer<W>,
    articles: &[Article],
    channel: &Channel,
) -> Result<(), FeedError> {
    write(writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    write(writer, Event::Start(rss))?;
    write(writer, Event::Start(BytesStart::new("channel")))?;

    write_text_element(writer, "title", &channel.title)?;
    write_text_element(writer, "link", &channel.link)?;
    write_text_element(writer, "description", &channel.description)?;
    write_text_element(writer, "lastBuildDate", &channel.last_build_date)?;

    for article in articles {
        write(writer, Event::Start(BytesStart::new("item")))?;
        write_text_element(writer, "title", &article.title)?;
        write_text_element(writer, "link", &article.link)?;
        write_text_element(writer, "description", &article.summary)?;
        write_text_element(writer, "pubDate", &article.pub_date)?;

        let mut guid = BytesStart::new("guid");
        guid.push_attribute(("isPermaLink", "true"));
        write(writer, Event::Start(guid))?;
        write(writer, Event::Text(BytesText::new(&article.link)))?;
        write(writer, Event::End(BytesEnd::new("guid")))?;

        write(writer, Event::End(BytesEnd::new("item")))?;
    }

    write(writer, Event::End(BytesEnd::new("channel")))?;
    write(writer, Event::End(BytesEnd::new("rss")))?;
    Ok(())
}

fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), FeedError> {
    write(writer, Event::Start(BytesStart::new(name)))?;
    write(writer, Event::Text(BytesText::new(text)))?;
    write(writer, Event::End(BytesEnd::new(name)))
}

fn write<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<(), FeedError> {
    writer.write_event(event).map_err(FeedError::serialize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> Channel {
        Channel {
            title: "Test & Co".to_string(),
            link: "https://example.com/list".to_string(),
            description: "A <test> feed".to_string(),
            last_build_date: "Mon, 15 Jan 2024 10:00:00 GMT".to_string(),
        }
    }

    fn article(title: &str, link: &str) -> Article {
        Article {
            title: title.to_string(),
            link: link.to_string(),
            summary: String::new(),
            pub_date: "Mon, 15 Jan 2024 10:00:00 GMT".to_string(),
        }
    }

    #[test]
    fn test_empty_feed_refused() {
        let err = render_rss(&[], &channel()).unwrap_err();
        assert!(matches!(err, FeedError::Empty));
    }

    #[test]
    fn test_document_shape() {
        let xml = render_rss(&[article("One", "https://example.com/1")], &channel()).unwrap();
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"<rss version="2.0">"#));
        assert!(xml.contains("\n  <channel>"));
        assert!(xml.contains("<lastBuildDate>Mon, 15 Jan 2024 10:00:00 GMT</lastBuildDate>"));
        assert!(xml.contains(r#"<guid isPermaLink="true">https://example.com/1</guid>"#));
        assert!(xml.contains("<description></description>"));
        assert!(xml.ends_with("</rss>\n"));
    }

    #[test]
    fn test_text_is_escaped() {
        let xml = render_rss(&[article("R&D <update>", "https://example.com/?a=1&b=2")], &channel())
            .unwrap();
        assert!(xml.contains("<title>Test &amp; Co</title>"));
        assert!(xml.contains("<description>A &lt;test&gt; feed</description>"));
        assert!(xml.contains("<title>R&amp;D &lt;update&gt;</title>"));
        assert!(xml.contains("<link>https://example.com/?a=1&amp;b=2</link>"));
    }

    #[test]
    fn test_compact_and_indented_agree_on_content() {
        let articles = [
            article("R&D <update>", "https://example.com/1"),
            article("Two", "https://example.com/2"),
        ];
        let mut compact = Writer::new(Vec::new());
        write_rss(&mut compact, &articles, &channel()).unwrap();
        let raw = String::from_utf8(compact.into_inner()).unwrap();
        let pretty = reindent(raw.as_bytes()).unwrap();

        let squash = |s: &str| s.lines().map(str::trim).collect::<String>();
        assert_eq!(squash(&raw), squash(&pretty));
        assert!(!raw.contains('\n'));
        assert!(pretty.contains("\n    <item>"));
    }

    #[test]
    fn test_malformed_document_falls_back_to_compact() {
        let mismatched = b"<rss><channel><title>x</title></rss>".to_vec();
        assert!(reindent(&mismatched).is_err());
        assert_eq!(
            pretty_or_compact(mismatched),
            "<rss><channel><title>x</title></rss>"
        );

        let truncated = b"<rss version=\"2.0\"><channel><title>x</title>".to_vec();
        assert!(reindent(&truncated).is_err());
        assert_eq!(
            pretty_or_compact(truncated),
            "<rss version=\"2.0\"><channel><title>x</title>"
        );
    }

    #[test]
    fn test_invalid_utf8_fallback_is_lossy() {
        let raw = b"<rss><channel>\xff".to_vec();
        assert_eq!(pretty_or_compact(raw), "<rss><channel>\u{fffd}");
    }
}
