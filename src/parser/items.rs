use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::config::ContentType;

// Each listed upload is rendered inside one of these; fields are read relative to it.
static VIDEO_CLUSTER: LazyLock<Selector> = LazyLock::new(|| Selector::parse("ytd-rich-grid-media").unwrap());
static SHORT_CLUSTER: LazyLock<Selector> = LazyLock::new(|| Selector::parse("ytd-rich-grid-slim-media").unwrap());

static VIDEO_TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a#video-title-link").unwrap());
static SHORT_TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span#video-title").unwrap());
static SHORT_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.yt-simple-endpoint.focus-on-expand[href]").unwrap());
static META_ITEM: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span.inline-metadata-item").unwrap());
static DURATION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.ytd-thumbnail-overlay-time-status-renderer").unwrap());

/// Per-item columns the extractor can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Href,
    Views,
    Published,
    Duration,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Href => "link",
            Field::Views => "views",
            Field::Published => "published",
            Field::Duration => "duration",
        }
    }
}

/// Raw per-item fragments, one sequence per field, in listing order.
///
/// A `None` entry means the item's cluster had no such fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSequences {
    pub titles: Vec<Option<String>>,
    pub hrefs: Vec<Option<String>>,
    pub views: Vec<Option<String>>,
    pub published: Vec<Option<String>>,
    pub durations: Vec<Option<String>>,
}

impl FieldSequences {
    pub fn get(&self, field: Field) -> &[Option<String>] {
        match field {
            Field::Title => &self.titles,
            Field::Href => &self.hrefs,
            Field::Views => &self.views,
            Field::Published => &self.published,
            Field::Duration => &self.durations,
        }
    }

    /// Build from already-complete parallel lists (every fragment present).
    pub fn from_parallel(
        titles: Vec<&str>,
        hrefs: Vec<&str>,
        views: Vec<&str>,
        published: Vec<&str>,
        durations: Vec<&str>,
    ) -> Self {
        let wrap = |v: Vec<&str>| v.into_iter().map(|s| Some(s.to_string())).collect();
        FieldSequences {
            titles: wrap(titles),
            hrefs: wrap(hrefs),
            views: wrap(views),
            published: wrap(published),
            durations: wrap(durations),
        }
    }

    /// Number of items seen, taken from the title column.
    pub fn len(&self) -> usize {
        self.titles.len()
    }
}

/// Walk the item clusters of a listing page and collect their fields.
pub fn extract(doc: &Html, content: ContentType) -> FieldSequences {
    let mut fields = FieldSequences::default();
    match content {
        ContentType::Videos | ContentType::Streams => {
            for cluster in doc.select(&VIDEO_CLUSTER) {
                let anchor = cluster.select(&VIDEO_TITLE).next();
                let mut meta = cluster.select(&META_ITEM).map(text_of);

                fields.titles.push(anchor.map(text_of).filter(|t| !t.is_empty()));
                fields.hrefs.push(anchor.and_then(href_of));
                fields.views.push(meta.next().as_deref().and_then(first_token));
                fields.published.push(meta.next().filter(|t| !t.is_empty()));
                fields.durations.push(
                    cluster
                        .select(&DURATION)
                        .next()
                        .map(text_of)
                        .filter(|t| !t.is_empty()),
                );
            }
        }
        ContentType::Shorts => {
            for cluster in doc.select(&SHORT_CLUSTER) {
                fields.titles.push(
                    cluster
                        .select(&SHORT_TITLE)
                        .next()
                        .map(text_of)
                        .filter(|t| !t.is_empty()),
                );
                fields.hrefs.push(cluster.select(&SHORT_LINK).next().and_then(href_of));
                fields.views.push(
                    cluster
                        .select(&META_ITEM)
                        .next()
                        .map(text_of)
                        .as_deref()
                        .and_then(first_token),
                );
            }
        }
    }
    fields
}

pub(crate) fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn href_of(el: ElementRef<'_>) -> Option<String> {
    el.value()
        .attr("href")
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(str::to_string)
}

/// "15K views" → "15K"
fn first_token(s: &str) -> Option<String> {
    s.split_whitespace().next().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIDEOS: &str = r#"
        <ytd-rich-grid-media>
          <span class="style-scope ytd-thumbnail-overlay-time-status-renderer"> 12:34 </span>
          <a id="video-title-link" href="/watch?v=aaa111">First upload</a>
          <span class="inline-metadata-item style-scope ytd-video-meta-block">15K views</span>
          <span class="inline-metadata-item style-scope ytd-video-meta-block">2 days ago</span>
        </ytd-rich-grid-media>
        <ytd-rich-grid-media>
          <span class="style-scope ytd-thumbnail-overlay-time-status-renderer">3:05</span>
          <a id="video-title-link" href="/watch?v=bbb222">Second upload</a>
          <span class="inline-metadata-item style-scope ytd-video-meta-block">900 views</span>
          <span class="inline-metadata-item style-scope ytd-video-meta-block">1 month ago</span>
        </ytd-rich-grid-media>"#;

    #[test]
    fn videos_read_per_cluster() {
        let doc = Html::parse_document(VIDEOS);
        let f = extract(&doc, ContentType::Videos);
        assert_eq!(f.len(), 2);
        assert_eq!(f.titles[1].as_deref(), Some("Second upload"));
        assert_eq!(f.hrefs[0].as_deref(), Some("/watch?v=aaa111"));
        assert_eq!(f.views, vec![Some("15K".to_string()), Some("900".to_string())]);
        assert_eq!(f.published[1].as_deref(), Some("1 month ago"));
        assert_eq!(f.durations[0].as_deref(), Some("12:34"));
    }

    #[test]
    fn missing_fragment_stays_aligned() {
        // Second item has no duration overlay; the gap must not shift later items.
        let html = r#"
            <ytd-rich-grid-media><a id="video-title-link" href="/watch?v=a">A</a>
              <span class="inline-metadata-item">1K views</span><span class="inline-metadata-item">now</span>
              <span class="ytd-thumbnail-overlay-time-status-renderer">1:00</span></ytd-rich-grid-media>
            <ytd-rich-grid-media><a id="video-title-link" href="/watch?v=b">B</a>
              <span class="inline-metadata-item">2K views</span><span class="inline-metadata-item">now</span></ytd-rich-grid-media>
            <ytd-rich-grid-media><a id="video-title-link" href="/watch?v=c">C</a>
              <span class="inline-metadata-item">3K views</span><span class="inline-metadata-item">now</span>
              <span class="ytd-thumbnail-overlay-time-status-renderer">3:00</span></ytd-rich-grid-media>"#;
        let f = extract(&Html::parse_document(html), ContentType::Streams);
        assert_eq!(f.len(), 3);
        assert_eq!(f.durations, vec![Some("1:00".into()), None, Some("3:00".into())]);
    }

    #[test]
    fn shorts_have_no_published_or_duration() {
        let html = r#"
            <ytd-rich-grid-slim-media>
              <a class="yt-simple-endpoint focus-on-expand style-scope ytd-rich-grid-slim-media" href="/shorts/xyz789">
                <span id="video-title">Quick tip</span>
              </a>
              <span class="inline-metadata-item style-scope ytd-video-meta-block">1.2M views</span>
            </ytd-rich-grid-slim-media>"#;
        let f = extract(&Html::parse_document(html), ContentType::Shorts);
        assert_eq!(f.len(), 1);
        assert_eq!(f.titles[0].as_deref(), Some("Quick tip"));
        assert_eq!(f.hrefs[0].as_deref(), Some("/shorts/xyz789"));
        assert_eq!(f.views[0].as_deref(), Some("1.2M"));
        assert!(f.published.is_empty());
        assert!(f.durations.is_empty());
    }

    #[test]
    fn empty_page_has_no_items() {
        let f = extract(&Html::parse_document("<html><body></body></html>"), ContentType::Videos);
        assert_eq!(f.len(), 0);
    }
}
