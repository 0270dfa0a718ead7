use feed_rs::model::Link;
use feed_rs::parser;
use thiserror::Error;

use crate::feed::types::{Feed, FeedItem};

/// The response body was not a feed document `feed-rs` understands.
#[derive(Debug, Error)]
#[error("Malformed feed: {0}")]
pub struct ParseError(String);

/// Parses an RSS, Atom or JSON Feed document, preserving item order.
///
/// Items without a link are skipped: the link is the only identity an item
/// has, so such items could never be deduplicated.
pub fn parse_feed(bytes: &[u8]) -> Result<Feed, ParseError> {
    let feed = parser::parse(bytes).map_err(|e| ParseError(e.to_string()))?;

    let total = feed.entries.len();
    let items: Vec<FeedItem> = feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let link = item_link(&entry.links)?;
            let title = entry.title.map(|t| t.content).and_then(non_empty);
            let description = entry
                .summary
                .map(|s| s.content)
                .or_else(|| entry.content.and_then(|c| c.body))
                .and_then(non_empty);
            let category = entry
                .categories
                .into_iter()
                .map(|c| c.label.and_then(non_empty).unwrap_or(c.term))
                .find_map(non_empty);

            Some(FeedItem {
                link,
                title,
                description,
                category,
            })
        })
        .collect();

    let skipped = total - items.len();
    if skipped > 0 {
        tracing::warn!(skipped = skipped, "Feed items without a link skipped");
    }

    Ok(Feed::new(items))
}

/// The item's page: the first `alternate` (or untyped) link, else the first link.
///
/// Atom entries can also carry `enclosure`, `replies` or `self` links, which
/// must not become the posted URL.
fn item_link(links: &[Link]) -> Option<String> {
    let usable = || {
        links
            .iter()
            .map(|l| (l.rel.as_deref(), l.href.trim()))
            .filter(|(_, href)| !href.is_empty())
    };
    usable()
        .find(|(rel, _)| matches!(rel, None | Some("alternate")))
        .or_else(|| usable().next())
        .map(|(_, href)| href.to_string())
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == s.len() {
        Some(s)
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NEWS_RSS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<rss xmlns:media="http://search.yahoo.com/mrss/" version="2.0">
    <channel>
        <title>news | TEST</title>
        <description>newsdescription</description>
        <link>http://www.example.com</link>
        <language>en</language>
        <item>
            <title><![CDATA[Example news title1]]></title>
            <link>https://example.com/news/item1</link>
            <description><![CDATA[Example news description1 ]]></description>
            <media:thumbnail url='https://example.com/news/item1/picture1.jpg' height='75' width='75' />
            <guid isPermaLink="true">https://example.com/11111111</guid>
            <pubDate>Sun, 16 Aug 2020 13:30:00 +0300</pubDate>
            <category><![CDATA[Category1]]></category>
        </item>
        <item>
            <title><![CDATA[Example news title2]]></title>
            <link>https://example.com/news/item2</link>
            <description><![CDATA[Example news description2 ]]></description>
            <guid isPermaLink="true">https://example.com/222222222</guid>
            <category><![CDATA[Category2]]></category>
        </item>
        <item>
            <title><![CDATA[Example news title3]]></title>
            <link>https://example.com/news/item3</link>
            <description><![CDATA[Example news description3 ]]></description>
            <guid isPermaLink="true">https://example.com/333333333</guid>
            <category><![CDATA[Category3]]></category>
        </item>
    </channel>
</rss>"#;

    #[test]
    fn test_parse_preserves_order() {
        let feed = parse_feed(NEWS_RSS.as_bytes()).unwrap();
        assert_eq!(
            feed.links().collect::<Vec<_>>(),
            vec![
                "https://example.com/news/item1",
                "https://example.com/news/item2",
                "https://example.com/news/item3",
            ]
        );
    }

    #[test]
    fn test_parse_item_fields() {
        let feed = parse_feed(NEWS_RSS.as_bytes()).unwrap();
        let item = &feed.items()[1];
        assert_eq!(item.title.as_deref(), Some("Example news title2"));
        assert_eq!(item.description.as_deref(), Some("Example news description2"));
        assert_eq!(item.category.as_deref(), Some("Category2"));
    }

    #[test]
    fn test_parse_optional_fields_absent() {
        let rss = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
    <item><link>https://example.com/bare</link></item>
</channel></rss>"#;
        let feed = parse_feed(rss.as_bytes()).unwrap();
        assert_eq!(feed.items(), &[FeedItem::with_link("https://example.com/bare")]);
    }

    #[test]
    fn test_parse_skips_items_without_link() {
        let rss = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
    <item><title>No link</title></item>
    <item><title>Linked</title><link>https://example.com/a</link></item>
</channel></rss>"#;
        let feed = parse_feed(rss.as_bytes()).unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed.items()[0].link, "https://example.com/a");
    }

    #[test]
    fn test_parse_atom() {
        let atom = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom test</title>
  <id>urn:uuid:60a76c80-d399-11d9-b93C-0003939e0af6</id>
  <updated>2024-01-01T00:00:00Z</updated>
  <entry>
    <title>Atom entry</title>
    <link href="https://example.com/atom/1"/>
    <id>urn:uuid:1225c695-cfb8-4ebb-aaaa-80da344efa6a</id>
    <updated>2024-01-01T00:00:00Z</updated>
    <summary>Short summary</summary>
    <category term="tech"/>
  </entry>
</feed>"#;
        let feed = parse_feed(atom.as_bytes()).unwrap();
        assert_eq!(feed.len(), 1);
        let item = &feed.items()[0];
        assert_eq!(item.link, "https://example.com/atom/1");
        assert_eq!(item.description.as_deref(), Some("Short summary"));
        assert_eq!(item.category.as_deref(), Some("tech"));
    }

    #[test]
    fn test_parse_atom_prefers_alternate_link() {
        let atom = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom test</title>
  <id>urn:uuid:60a76c80-d399-11d9-b93C-0003939e0af6</id>
  <updated>2024-01-01T00:00:00Z</updated>
  <entry>
    <title>Podcast episode</title>
    <link rel="enclosure" type="audio/mpeg" href="https://cdn.example.com/ep1.mp3"/>
    <link rel="replies" href="https://example.com/ep1/comments"/>
    <link rel="alternate" href="https://example.com/ep1"/>
    <id>urn:uuid:1225c695-cfb8-4ebb-aaaa-80da344efa6b</id>
    <updated>2024-01-01T00:00:00Z</updated>
  </entry>
  <entry>
    <title>Only an enclosure</title>
    <link rel="enclosure" type="audio/mpeg" href="https://cdn.example.com/ep2.mp3"/>
    <id>urn:uuid:1225c695-cfb8-4ebb-aaaa-80da344efa6c</id>
    <updated>2024-01-01T00:00:00Z</updated>
  </entry>
</feed>"#;
        let feed = parse_feed(atom.as_bytes()).unwrap();
        assert_eq!(
            feed.links().collect::<Vec<_>>(),
            vec!["https://example.com/ep1", "https://cdn.example.com/ep2.mp3"]
        );
    }

    #[test]
    fn test_parse_empty_channel() {
        let rss = r#"<?xml version="1.0"?>
<rss version="2.0"><channel></channel></rss>"#;
        assert!(parse_feed(rss.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_malformed() {
        let err = parse_feed(b"<not valid xml").unwrap_err();
        assert!(err.to_string().starts_with("Malformed feed"));
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("  ".to_string()), None);
        assert_eq!(non_empty(" a ".to_string()), Some("a".to_string()));
        assert_eq!(non_empty("b".to_string()), Some("b".to_string()));
    }
}
