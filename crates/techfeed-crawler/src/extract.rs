//! Field extraction fallback chains for link, body text, and date.

use chrono::{DateTime, Utc};

use crate::entry::FeedEntry;
use crate::html::strip_html;

/// A publication timestamp and whether it had to be invented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractedDate {
    pub value: DateTime<Utc>,
    /// `true` when neither `published` nor `updated` parsed and `value` is
    /// the extraction time.
    pub fallback: bool,
}

/// The entry's stable link: its primary link, else the first alternate link.
#[must_use]
pub fn extract_link(entry: &FeedEntry) -> Option<String> {
    entry
        .link()
        .or_else(|| entry.alternate_links().next())
        .map(str::to_string)
}

/// Plain body text from the first non-empty of content, summary, and
/// description, each HTML-stripped before the emptiness check.
#[must_use]
pub fn extract_content(entry: &FeedEntry) -> Option<String> {
    [
        entry.content_html(),
        entry.summary_html(),
        entry.media_description(),
    ]
    .into_iter()
    .flatten()
    .map(strip_html)
    .find(|text| !text.is_empty())
}

/// `published`, else `updated`, else the current time flagged as fallback.
///
/// Feed timestamps are parsed at feed-parse time; an unparseable value
/// arrives here as absent.
#[must_use]
pub fn extract_date(entry: &FeedEntry) -> ExtractedDate {
    if let Some(value) = entry.published().or_else(|| entry.updated()) {
        return ExtractedDate {
            value,
            fallback: false,
        };
    }
    ExtractedDate {
        value: Utc::now(),
        fallback: true,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::entry::parse_feed;

    fn rss_item(item_body: &str) -> FeedEntry {
        let xml = format!(
            r#"<?xml version="1.0"?>
<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/" xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <title>Blog</title>
    <link>https://blog.example.com</link>
    <description>d</description>
    <item>
      <title>Post</title>
      {item_body}
    </item>
  </channel>
</rss>"#
        );
        parse_feed(xml.as_bytes(), "https://blog.example.com/feed")
            .unwrap()
            .remove(0)
    }

    fn atom_entry(entry_body: &str) -> FeedEntry {
        let xml = format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Blog</title>
  <id>urn:blog</id>
  <updated>2024-01-05T00:00:00Z</updated>
  <entry>
    <title>Atom post</title>
    <id>urn:post:1</id>
    {entry_body}
  </entry>
</feed>"#
        );
        parse_feed(xml.as_bytes(), "https://blog.example.com/atom.xml")
            .unwrap()
            .remove(0)
    }

    #[test]
    fn link_prefers_primary_link() {
        let entry = rss_item("<link>https://blog.example.com/p/1</link>");
        assert_eq!(
            extract_link(&entry).as_deref(),
            Some("https://blog.example.com/p/1")
        );
    }

    #[test]
    fn link_falls_back_to_alternate_relation() {
        let entry = atom_entry(
            r#"<link rel="self" href="https://blog.example.com/api/1"/>
               <link rel="alternate" href="https://blog.example.com/atom/1"/>"#,
        );
        assert_eq!(
            extract_link(&entry).as_deref(),
            Some("https://blog.example.com/atom/1")
        );
    }

    #[test]
    fn entry_without_any_link_has_no_link() {
        let entry = rss_item("<description>text</description>");
        assert_eq!(extract_link(&entry), None);
    }

    #[test]
    fn content_prefers_full_content() {
        let entry = rss_item(
            r"<description>summary text</description>
              <content:encoded><![CDATA[<p>Hello <b>World</b></p>]]></content:encoded>",
        );
        assert_eq!(extract_content(&entry).as_deref(), Some("Hello World"));
    }

    #[test]
    fn content_skips_markup_only_candidates() {
        let entry = rss_item(
            r#"<description>&lt;p&gt;from summary&lt;/p&gt;</description>
               <content:encoded><![CDATA[<img src="/a.png"><script>x()</script>]]></content:encoded>"#,
        );
        assert_eq!(extract_content(&entry).as_deref(), Some("from summary"));
    }

    #[test]
    fn content_falls_back_to_media_description() {
        let entry = rss_item(
            r"<media:group><media:description>described</media:description></media:group>",
        );
        assert_eq!(extract_content(&entry).as_deref(), Some("described"));
    }

    #[test]
    fn content_absent_when_every_candidate_is_empty() {
        let entry = rss_item("<link>https://blog.example.com/p/1</link>");
        assert_eq!(extract_content(&entry), None);
    }

    #[test]
    fn date_prefers_published_over_updated() {
        let entry = atom_entry(
            "<published>2024-01-01T00:00:00Z</published><updated>2024-02-01T00:00:00Z</updated>",
        );
        let date = extract_date(&entry);
        assert_eq!(date.value, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert!(!date.fallback);
    }

    #[test]
    fn date_uses_updated_when_published_missing() {
        let entry = atom_entry("<updated>2024-02-01T00:00:00Z</updated>");
        let date = extract_date(&entry);
        assert_eq!(date.value, Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
        assert!(!date.fallback);
    }

    #[test]
    fn date_falls_back_to_now_and_flags_it() {
        let before = Utc::now();
        let entry = rss_item("<pubDate>not a date</pubDate>");
        let date = extract_date(&entry);
        assert!(date.fallback);
        assert!(date.value >= before);
        assert!(date.value <= Utc::now());
    }
}
