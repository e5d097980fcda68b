//! Regex-level HTML helpers: tag stripping, attribute lookup, and URL
//! resolution. Feed snippets and article heads are small enough that a full
//! DOM parse buys nothing here.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

static IMG_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<img\b[^>]*>").expect("valid regex"));
static LINK_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<link\b[^>]*>").expect("valid regex"));
static META_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("valid regex"));
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)[\s/]([A-Za-z_:][-\w:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("valid attr regex")
});
static SCRIPT_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>").expect("valid regex")
});
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));
// A `<` not followed by a name, `/`, `!` or `?` is text, not markup.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)</?[A-Za-z!?][^>]*>").expect("valid regex"));

/// Reduce an HTML fragment to plain text.
///
/// Script and style blocks and comments are dropped, every remaining tag
/// becomes a space, entities are decoded, and whitespace runs collapse to a
/// single space. `"<p>Hello <b>World</b></p>"` becomes `"Hello World"`.
#[must_use]
pub fn strip_html(html: &str) -> String {
    let without_blocks = SCRIPT_STYLE_RE.replace_all(html, " ");
    let without_comments = COMMENT_RE.replace_all(&without_blocks, " ");
    let without_tags = TAG_RE.replace_all(&without_comments, " ");
    let decoded = html_escape::decode_html_entities(&without_tags);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `src` of the first `<img>` tag that carries a non-empty one.
#[must_use]
pub fn first_img_src(html: &str) -> Option<String> {
    IMG_TAG_RE
        .find_iter(html)
        .find_map(|m| extract_attr(m.as_str(), "src").filter(|src| !src.is_empty()))
}

/// `content` of the first `<meta>` whose `property` or `name` equals `key`.
#[must_use]
pub fn find_meta_content(html: &str, key: &str) -> Option<String> {
    META_TAG_RE.find_iter(html).find_map(|m| {
        let tag = m.as_str();
        let matches_key = ["property", "name"].into_iter().any(|attr| {
            extract_attr(tag, attr).is_some_and(|value| value.eq_ignore_ascii_case(key))
        });
        if matches_key {
            extract_attr(tag, "content").filter(|content| !content.is_empty())
        } else {
            None
        }
    })
}

/// `href` of the first `<link>` whose `rel` list contains `rel`.
#[must_use]
pub fn find_link_href(html: &str, rel: &str) -> Option<String> {
    LINK_TAG_RE.find_iter(html).find_map(|m| {
        let tag = m.as_str();
        let rel_value = extract_attr(tag, "rel")?;
        if rel_value
            .split_ascii_whitespace()
            .any(|token| token.eq_ignore_ascii_case(rel))
        {
            extract_attr(tag, "href").filter(|href| !href.is_empty())
        } else {
            None
        }
    })
}

/// Value of `attr` inside a single start tag, trimmed.
#[must_use]
pub fn extract_attr(tag: &str, attr: &str) -> Option<String> {
    ATTR_RE.captures_iter(tag).find_map(|caps| {
        let name = caps.get(1)?.as_str();
        if !name.eq_ignore_ascii_case(attr) {
            return None;
        }
        caps.get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str().trim().to_string())
    })
}

/// Resolve an image or link reference to an absolute http(s) URL.
///
/// Absolute candidates are returned as-is; relative ones are joined against
/// `base`. Returns `None` for empty input, `data:` URIs, non-http schemes, or
/// a relative reference with no usable base.
#[must_use]
pub fn absolutize(base: Option<&str>, candidate: &str) -> Option<String> {
    let candidate = candidate.trim().replace("&amp;", "&");
    if candidate.is_empty() || candidate.get(..5).is_some_and(|p| p.eq_ignore_ascii_case("data:"))
    {
        return None;
    }

    let resolved = match Url::parse(&candidate) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = Url::parse(base?).ok()?;
            base.join(&candidate).ok()?
        }
        Err(_) => return None,
    };

    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_html_flattens_markup() {
        assert_eq!(strip_html("<p>Hello <b>World</b></p>"), "Hello World");
    }

    #[test]
    fn strip_html_drops_scripts_styles_and_comments() {
        let html = "<style>p{color:red}</style><p>Kept</p><script>alert('x')</script><!-- gone -->";
        assert_eq!(strip_html(html), "Kept");
    }

    #[test]
    fn strip_html_decodes_entities_and_collapses_whitespace() {
        assert_eq!(strip_html("Tom &amp; Jerry\n\n  &lt;3&gt;"), "Tom & Jerry <3>");
        assert_eq!(strip_html("  \n\t "), "");
    }

    #[test]
    fn strip_html_keeps_literal_angle_brackets_in_text() {
        assert_eq!(
            strip_html("<p>if a < b and c > d then</p>"),
            "if a < b and c > d then"
        );
        assert_eq!(strip_html("<!DOCTYPE html><br/>y"), "y");
    }

    #[test]
    fn first_img_src_skips_images_without_src() {
        let html = r#"<p><img alt="x"><img data-x="1" src="/a.png"><img src="/b.png"></p>"#;
        assert_eq!(first_img_src(html).as_deref(), Some("/a.png"));
        assert_eq!(first_img_src("<p>no images</p>"), None);
    }

    #[test]
    fn extract_attr_does_not_match_attribute_suffixes() {
        let tag = r#"<meta data-content="wrong" content="right">"#;
        assert_eq!(extract_attr(tag, "content").as_deref(), Some("right"));
    }

    #[test]
    fn extract_attr_accepts_single_and_unquoted_values() {
        assert_eq!(
            extract_attr("<img src='/x.png'>", "src").as_deref(),
            Some("/x.png")
        );
        assert_eq!(
            extract_attr("<img src=/y.png width=10>", "src").as_deref(),
            Some("/y.png")
        );
    }

    #[test]
    fn find_meta_content_matches_property_or_name() {
        let html = r#"
            <meta name="twitter:image" content="https://cdn.ex.com/tw.png">
            <meta property="og:image" content="https://cdn.ex.com/og.png">
        "#;
        assert_eq!(
            find_meta_content(html, "og:image").as_deref(),
            Some("https://cdn.ex.com/og.png")
        );
        assert_eq!(
            find_meta_content(html, "twitter:image").as_deref(),
            Some("https://cdn.ex.com/tw.png")
        );
        assert_eq!(find_meta_content(html, "og:title"), None);
    }

    #[test]
    fn find_link_href_matches_rel_token() {
        let html = r#"<link rel="stylesheet" href="/s.css"><link rel="image_src" href="/cover.jpg">"#;
        assert_eq!(find_link_href(html, "image_src").as_deref(), Some("/cover.jpg"));
        assert_eq!(find_link_href(html, "icon"), None);
    }

    #[test]
    fn absolutize_joins_relative_against_base() {
        assert_eq!(
            absolutize(Some("http://ex.com/posts/1"), "/a.png").as_deref(),
            Some("http://ex.com/a.png")
        );
        assert_eq!(
            absolutize(Some("https://ex.com/posts/1"), "//cdn.ex.com/a.png").as_deref(),
            Some("https://cdn.ex.com/a.png")
        );
        assert_eq!(
            absolutize(None, "https://cdn.ex.com/a.png?w=1&amp;h=2").as_deref(),
            Some("https://cdn.ex.com/a.png?w=1&h=2")
        );
    }

    #[test]
    fn absolutize_rejects_unusable_candidates() {
        assert_eq!(absolutize(None, "/a.png"), None);
        assert_eq!(absolutize(Some("https://ex.com"), ""), None);
        assert_eq!(absolutize(Some("https://ex.com"), "data:image/png;base64,AAAA"), None);
        assert_eq!(absolutize(Some("https://ex.com"), "javascript:void(0)"), None);
    }
}
