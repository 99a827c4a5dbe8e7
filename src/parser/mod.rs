pub mod channel;
pub mod items;

use scraper::Html;
use tracing::debug;

use crate::config::ContentType;
use crate::error::Result;
use crate::record::Channel;
pub use items::{Field, FieldSequences};

/// Everything read from one rendered listing page.
pub struct ExtractedPage {
    pub channel: Channel,
    pub fields: FieldSequences,
}

/// Two reads over one document: channel header, then item clusters.
pub fn parse_page(html: &str, content: ContentType) -> Result<ExtractedPage> {
    let doc = Html::parse_document(html);
    let channel = channel::extract(&doc)?;
    let fields = items::extract(&doc, content);
    debug!(channel = %channel.handle, items = fields.len(), "parsed listing page");
    Ok(ExtractedPage { channel, fields })
}

/// Number of listed items a document holds so far.
pub fn count_items(html: &str, content: ContentType) -> usize {
    items::extract(&Html::parse_document(html), content).len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_item_clusters() {
        let html = "<ytd-rich-grid-media></ytd-rich-grid-media><ytd-rich-grid-media></ytd-rich-grid-media>";
        assert_eq!(count_items(html, ContentType::Videos), 2);
        assert_eq!(count_items(html, ContentType::Shorts), 0);
        assert_eq!(count_items("<html></html>", ContentType::Streams), 0);
    }
}
