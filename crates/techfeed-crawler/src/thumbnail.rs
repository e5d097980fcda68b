//! Best-effort thumbnail discovery for a feed entry.

use tracing::debug;

use crate::client::FeedClient;
use crate::entry::FeedEntry;
use crate::html::{absolutize, find_link_href, find_meta_content, first_img_src};

/// Resolves a thumbnail URL through an ordered fallback chain. The first
/// strategy that yields an absolute http(s) URL wins:
///
/// 1. the entry's declared thumbnail (image enclosure / `media:content`)
/// 2. `media:thumbnail`
/// 3. an entry link typed `image/*`
/// 4. the first `<img>` in the entry content
/// 5. the first `<img>` in the entry summary
/// 6. the live page: `og:image`, `twitter:image`, `<link rel="image_src">`,
///    then the first `<img>`
///
/// Candidates are joined against the entry URL (steps 1-5) or the page URL
/// (step 6). Nothing here fails: a candidate that cannot be resolved falls
/// through, and a failed page fetch means no thumbnail.
#[derive(Debug, Clone)]
pub struct ThumbnailResolver {
    client: FeedClient,
}

impl ThumbnailResolver {
    #[must_use]
    pub fn new(client: FeedClient) -> Self {
        Self { client }
    }

    pub async fn resolve(&self, entry: &FeedEntry, page_url: Option<&str>) -> Option<String> {
        if let Some(url) = resolve_from_entry(entry, page_url) {
            return Some(url);
        }
        let page_url = page_url?;
        match self.client.fetch_page(page_url).await {
            Ok(html) => resolve_from_page_html(&html, page_url),
            Err(e) => {
                debug!(url = %page_url, error = %e, "thumbnail page fetch failed");
                None
            }
        }
    }
}

/// Steps 1-5: everything answerable from the feed document alone.
#[must_use]
pub fn resolve_from_entry(entry: &FeedEntry, page_url: Option<&str>) -> Option<String> {
    let structured = [entry.thumbnail(), entry.media_thumbnail(), entry.image_link()]
        .into_iter()
        .flatten()
        .map(str::to_string);
    let embedded = [entry.content_html(), entry.summary_html()]
        .into_iter()
        .flatten()
        .filter_map(first_img_src);

    structured
        .chain(embedded)
        .find_map(|candidate| absolutize(page_url, &candidate))
}

/// Step 6 applied to an already-fetched page.
#[must_use]
pub fn resolve_from_page_html(html: &str, page_url: &str) -> Option<String> {
    let candidates = [
        find_meta_content(html, "og:image"),
        find_meta_content(html, "twitter:image"),
        find_link_href(html, "image_src"),
        first_img_src(html),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(|candidate| absolutize(Some(page_url), &candidate))
}
