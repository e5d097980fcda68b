//! Typed access to parsed feed entries.
//!
//! RSS and Atom dialects expose the same information under different shapes.
//! `FeedEntry` hides `feed_rs`'s model behind one accessor per field, each
//! returning `None` when the feed did not supply a usable value.

use chrono::{DateTime, Utc};
use feed_rs::model::{Entry, Link};

use crate::dates::parse_timestamp;
use crate::error::CrawlerError;

const IMAGE_EXTENSIONS: [&str; 6] = [".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg"];

/// One item of a parsed RSS/Atom feed.
#[derive(Debug, Clone)]
pub struct FeedEntry {
    inner: Entry,
}

impl FeedEntry {
    #[must_use]
    pub fn new(inner: Entry) -> Self {
        Self { inner }
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.inner
            .title
            .as_ref()
            .map(|t| t.content.trim())
            .filter(|t| !t.is_empty())
    }

    /// The entry's primary link: a relation-less `<link>` (RSS item link, or
    /// an Atom link with no `rel`) that does not point at an image.
    #[must_use]
    pub fn link(&self) -> Option<&str> {
        self.inner
            .links
            .iter()
            .filter(|link| link.rel.is_none() && !is_image_link(link))
            .map(|link| link.href.trim())
            .find(|href| !href.is_empty())
    }

    /// Links declared with `rel="alternate"`, in document order.
    pub fn alternate_links(&self) -> impl Iterator<Item = &str> {
        self.inner
            .links
            .iter()
            .filter(|link| {
                link.rel
                    .as_deref()
                    .is_some_and(|rel| rel.eq_ignore_ascii_case("alternate"))
            })
            .map(|link| link.href.trim())
            .filter(|href| !href.is_empty())
    }

    /// Full content body (`<content>`, `<content:encoded>`).
    #[must_use]
    pub fn content_html(&self) -> Option<&str> {
        self.inner
            .content
            .as_ref()
            .and_then(|c| c.body.as_deref())
            .filter(|body| !body.trim().is_empty())
    }

    /// Summary (`<summary>`, RSS `<description>`).
    #[must_use]
    pub fn summary_html(&self) -> Option<&str> {
        self.inner
            .summary
            .as_ref()
            .map(|s| s.content.as_str())
            .filter(|s| !s.trim().is_empty())
    }

    /// Media RSS `<media:description>`.
    #[must_use]
    pub fn media_description(&self) -> Option<&str> {
        self.inner
            .media
            .iter()
            .filter_map(|m| m.description.as_ref())
            .map(|d| d.content.as_str())
            .find(|d| !d.trim().is_empty())
    }

    /// The entry's declared thumbnail: an image-typed `<enclosure>` or
    /// `<media:content>`.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.inner
            .media
            .iter()
            .flat_map(|m| m.content.iter())
            .filter(|content| match &content.content_type {
                Some(media_type) => media_type
                    .as_str()
                    .to_ascii_lowercase()
                    .starts_with("image/"),
                None => content
                    .url
                    .as_ref()
                    .is_some_and(|url| has_image_extension(url.path())),
            })
            .find_map(|content| content.url.as_ref().map(url::Url::as_str))
    }

    /// First `<media:thumbnail url="...">`.
    #[must_use]
    pub fn media_thumbnail(&self) -> Option<&str> {
        self.inner
            .media
            .iter()
            .flat_map(|m| m.thumbnails.iter())
            .map(|thumb| thumb.image.uri.trim())
            .find(|uri| !uri.is_empty())
    }

    /// First entry-level link whose declared MIME type is `image/*`.
    #[must_use]
    pub fn image_link(&self) -> Option<&str> {
        self.inner
            .links
            .iter()
            .filter(|link| is_image_link(link))
            .map(|link| link.href.trim())
            .find(|href| !href.is_empty())
    }

    #[must_use]
    pub fn published(&self) -> Option<DateTime<Utc>> {
        self.inner.published
    }

    #[must_use]
    pub fn updated(&self) -> Option<DateTime<Utc>> {
        self.inner.updated
    }
}

fn is_image_link(link: &Link) -> bool {
    link.media_type
        .as_deref()
        .is_some_and(|t| t.trim().to_ascii_lowercase().starts_with("image/"))
}

fn has_image_extension(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Parse an RSS or Atom document into entries, in document order.
///
/// Timestamps go through [`parse_timestamp`]; relative links are resolved
/// against `feed_url`.
///
/// # Errors
///
/// Returns [`CrawlerError::FeedParse`] if the document is not a feed.
pub fn parse_feed(bytes: &[u8], feed_url: &str) -> Result<Vec<FeedEntry>, CrawlerError> {
    let parser = feed_rs::parser::Builder::new()
        .base_uri(Some(feed_url))
        .timestamp_parser(parse_timestamp)
        .build();
    let feed = parser.parse(bytes).map_err(|e| CrawlerError::FeedParse {
        url: feed_url.to_string(),
        reason: e.to_string(),
    })?;
    Ok(feed.entries.into_iter().map(FeedEntry::new).collect())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    const FEED_URL: &str = "https://blog.example.com/feed";

    fn parse_one(xml: &str) -> FeedEntry {
        let mut entries = parse_feed(xml.as_bytes(), FEED_URL).unwrap();
        assert_eq!(entries.len(), 1);
        entries.remove(0)
    }

    #[test]
    fn rss_item_exposes_link_summary_and_content() {
        let entry = parse_one(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/">
  <channel>
    <title>Blog</title>
    <link>https://blog.example.com</link>
    <description>d</description>
    <item>
      <title>  First post  </title>
      <link>https://blog.example.com/posts/1</link>
      <description>&lt;p&gt;Short&lt;/p&gt;</description>
      <content:encoded><![CDATA[<p>Long <b>body</b></p>]]></content:encoded>
      <pubDate>Tue, 02 Jan 2024 09:30:00 +0900</pubDate>
    </item>
  </channel>
</rss>"#,
        );
        assert_eq!(entry.title(), Some("First post"));
        assert_eq!(entry.link(), Some("https://blog.example.com/posts/1"));
        assert_eq!(entry.summary_html(), Some("<p>Short</p>"));
        assert_eq!(entry.content_html(), Some("<p>Long <b>body</b></p>"));
        assert_eq!(
            entry.published(),
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 30, 0).unwrap())
        );
    }

    #[test]
    fn rss_image_enclosure_is_the_declared_thumbnail() {
        let entry = parse_one(
            r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <title>Blog</title>
    <link>https://blog.example.com</link>
    <description>d</description>
    <item>
      <title>With enclosure</title>
      <link>https://blog.example.com/posts/2</link>
      <enclosure url="https://cdn.example.com/cover.png" type="image/png" length="10"/>
    </item>
  </channel>
</rss>"#,
        );
        assert_eq!(entry.thumbnail(), Some("https://cdn.example.com/cover.png"));
    }

    #[test]
    fn non_image_enclosure_is_not_a_thumbnail() {
        let entry = parse_one(
            r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <title>Blog</title>
    <link>https://blog.example.com</link>
    <description>d</description>
    <item>
      <title>Podcast episode</title>
      <link>https://blog.example.com/posts/3</link>
      <enclosure url="https://cdn.example.com/episode.mp3" type="audio/mpeg" length="10"/>
    </item>
  </channel>
</rss>"#,
        );
        assert_eq!(entry.thumbnail(), None);
    }

    #[test]
    fn media_thumbnail_is_exposed() {
        let entry = parse_one(
            r#"<?xml version="1.0"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <title>Blog</title>
    <link>https://blog.example.com</link>
    <description>d</description>
    <item>
      <title>With media</title>
      <link>https://blog.example.com/posts/3</link>
      <media:thumbnail url="https://cdn.example.com/thumb.jpg"/>
    </item>
  </channel>
</rss>"#,
        );
        assert_eq!(
            entry.media_thumbnail(),
            Some("https://cdn.example.com/thumb.jpg")
        );
        assert_eq!(entry.thumbnail(), None);
    }

    #[test]
    fn atom_entry_separates_alternate_and_image_links() {
        let entry = parse_one(
            r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Blog</title>
  <id>urn:blog</id>
  <updated>2024-01-05T00:00:00Z</updated>
  <entry>
    <title>Atom post</title>
    <id>urn:post:1</id>
    <link rel="alternate" href="https://blog.example.com/atom/1"/>
    <link rel="enclosure" type="image/jpeg" href="https://cdn.example.com/atom.jpg"/>
    <updated>2024-01-05T00:00:00Z</updated>
    <summary>Plain summary</summary>
  </entry>
</feed>"#,
        );
        assert_eq!(
            entry.alternate_links().collect::<Vec<_>>(),
            vec!["https://blog.example.com/atom/1"]
        );
        assert_eq!(entry.image_link(), Some("https://cdn.example.com/atom.jpg"));
        assert_eq!(entry.published(), None);
        assert_eq!(
            entry.updated(),
            Some(Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn unknown_date_format_leaves_field_absent() {
        let entry = parse_one(
            r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <title>Blog</title>
    <link>https://blog.example.com</link>
    <description>d</description>
    <item>
      <title>Bad date</title>
      <link>https://blog.example.com/posts/4</link>
      <pubDate>sometime last week</pubDate>
    </item>
  </channel>
</rss>"#,
        );
        assert_eq!(entry.published(), None);
    }

    #[test]
    fn non_feed_document_is_a_parse_error() {
        let err = parse_feed(b"<html><body>nope</body></html>", FEED_URL).unwrap_err();
        assert!(matches!(err, CrawlerError::FeedParse { .. }));
    }
}
