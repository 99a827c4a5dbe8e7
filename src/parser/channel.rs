use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use super::items::text_of;
use crate::error::{Result, ScrapeError};
use crate::record::{AboutInfo, Channel};

static HANDLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("yt-formatted-string#channel-handle").unwrap());
static IDENTIFIER: LazyLock<Selector> = LazyLock::new(|| Selector::parse(r#"meta[itemprop="identifier"]"#).unwrap());
static SUBSCRIBERS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("yt-formatted-string#subscriber-count").unwrap());
static DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:description"]"#).unwrap());
static KEYWORDS: LazyLock<Selector> = LazyLock::new(|| Selector::parse(r#"meta[property="og:video:tag"]"#).unwrap());
static ABOUT: LazyLock<Selector> = LazyLock::new(|| Selector::parse("#additional-info-container").unwrap());

static JOINED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Joined\s+([A-Z][a-z]{2,8}\.?\s+\d{1,2},\s+\d{4})").unwrap());
static VIEWS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([\d,]+)\s+views?$").unwrap());
static COUNT_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d.,]+[KkMm]?\s+(views?|videos?|subscribers?)$").unwrap());

/// Read the channel-level attributes shown once in the page header.
///
/// Handle and identifier are required; the remaining attributes fall back to
/// empty values because channels may hide them.
pub fn extract(doc: &Html) -> Result<Channel> {
    let handle = doc
        .select(&HANDLE)
        .next()
        .map(text_of)
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ScrapeError::absent("channel handle"))?;

    let id = doc
        .select(&IDENTIFIER)
        .next()
        .and_then(|m| m.value().attr("content"))
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ScrapeError::absent("channel identifier"))?
        .to_string();

    // "1.2M subscribers" → "1.2M"
    let subscribers = doc
        .select(&SUBSCRIBERS)
        .next()
        .map(text_of)
        .and_then(|t| t.split_whitespace().next().map(str::to_string))
        .unwrap_or_default();

    let description = doc
        .select(&DESCRIPTION)
        .next()
        .and_then(|m| m.value().attr("content"))
        .map(clean_description)
        .unwrap_or_default();

    let keywords = doc
        .select(&KEYWORDS)
        .filter_map(|m| m.value().attr("content"))
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();

    let about = doc
        .select(&ABOUT)
        .next()
        .map(|el| parse_about(&el.text().collect::<Vec<_>>().join("\n")))
        .unwrap_or_default();

    Ok(Channel {
        handle,
        id,
        subscribers,
        description,
        keywords,
        about,
    })
}

/// Single-line description; commas become `;` so the text stays one cell in
/// loosely-quoted consumers.
fn clean_description(raw: &str) -> String {
    raw.trim().replace(['\r', '\n'], " ").replace(',', ";")
}

/// Pull joined date, location and lifetime views out of the about panel text.
fn parse_about(text: &str) -> AboutInfo {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let flat = lines.join("\n");

    let mut info = AboutInfo::default();

    if let Some(caps) = JOINED_RE.captures(&flat) {
        // "Mar 5, 2014" → "Mar 5 2014"; the cell stays comma-free.
        info.joined = caps[1]
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
        info.location = flat[end..]
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty() && !COUNT_LINE_RE.is_match(l) && !l.contains("youtube.com"))
            .unwrap_or_default()
            .to_string();
    }

    info.global_views = lines
        .iter()
        .find_map(|l| VIEWS_RE.captures(l).map(|c| c[1].to_string()))
        .unwrap_or_default();

    info
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = r#"
        <html><head>
          <meta itemprop="identifier" content="UCaYhcUwRBNscFNUKTjgPFiA">
          <meta property="og:description" content="Official channel,
 talks and tutorials">
          <meta property="og:video:tag" content="rust">
          <meta property="og:video:tag" content="programming">
        </head><body>
          <yt-formatted-string id="channel-handle"> @rustlang </yt-formatted-string>
          <yt-formatted-string id="subscriber-count">150K subscribers</yt-formatted-string>
          <div id="additional-info-container" class="about-section">
            <table>
              <tr><td>www.youtube.com/@rustlang</td></tr>
              <tr><td>150K subscribers</td></tr>
              <tr><td>1,024 videos</td></tr>
              <tr><td>9,876,543 views</td></tr>
              <tr><td>Joined <span>Mar 5, 2014</span></td></tr>
              <tr><td>United States</td></tr>
            </table>
          </div>
        </body></html>"#;

    #[test]
    fn channel_header() {
        let c = extract(&Html::parse_document(HEADER)).unwrap();
        assert_eq!(c.handle, "@rustlang");
        assert_eq!(c.id, "UCaYhcUwRBNscFNUKTjgPFiA");
        assert_eq!(c.subscribers, "150K");
        assert_eq!(c.description, "Official channel;  talks and tutorials");
        assert_eq!(c.keywords, vec!["rust", "programming"]);
    }

    #[test]
    fn about_panel() {
        let c = extract(&Html::parse_document(HEADER)).unwrap();
        assert_eq!(c.about.joined, "Mar 5 2014");
        assert_eq!(c.about.location, "United States");
        assert_eq!(c.about.global_views, "9,876,543");
    }

    #[test]
    fn missing_handle_is_absent() {
        let html = r#"<meta itemprop="identifier" content="UC1">"#;
        let err = extract(&Html::parse_document(html)).unwrap_err();
        assert!(matches!(err, ScrapeError::FieldAbsent { field: "channel handle", index: None }));
    }

    #[test]
    fn missing_identifier_is_absent() {
        let html = r#"<yt-formatted-string id="channel-handle">@x</yt-formatted-string>"#;
        let err = extract(&Html::parse_document(html)).unwrap_err();
        assert!(matches!(err, ScrapeError::FieldAbsent { field: "channel identifier", .. }));
    }

    #[test]
    fn optional_attributes_default_empty() {
        let html = r#"<meta itemprop="identifier" content="UC1">
            <yt-formatted-string id="channel-handle">@x</yt-formatted-string>"#;
        let c = extract(&Html::parse_document(html)).unwrap();
        assert!(c.subscribers.is_empty());
        assert!(c.keywords.is_empty());
        assert_eq!(c.about, AboutInfo::default());
    }

    #[test]
    fn about_without_location() {
        let info = parse_about("Joined Jan 1, 2020\n42 views");
        assert_eq!(info.joined, "Jan 1 2020");
        assert_eq!(info.location, "");
        assert_eq!(info.global_views, "42");
    }
}
