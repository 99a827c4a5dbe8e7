use tracing::debug;

use crate::error::{Result, ScrapeError};
use crate::normalize::normalize;
use crate::parser::{Field, FieldSequences};
use crate::record::{Channel, ChannelSummaryRecord, ContentRecord, ContentVariant, ShortRecord, VideoRecord};

const VIDEO_FIELDS: &[Field] = &[
    Field::Title,
    Field::Href,
    Field::Views,
    Field::Published,
    Field::Duration,
];
const SHORT_FIELDS: &[Field] = &[Field::Title, Field::Href, Field::Views];

/// Item columns a variant reads from the page.
pub fn required_fields(variant: ContentVariant) -> &'static [Field] {
    match variant {
        ContentVariant::Videos | ContentVariant::Streams => VIDEO_FIELDS,
        ContentVariant::Shorts => SHORT_FIELDS,
        ContentVariant::Summary => &[],
    }
}

/// Zip the per-field sequences into typed records, in listing order.
///
/// Every required sequence must have the same length; the first one that does
/// not fails the whole page before any record is built. A missing fragment at
/// any index below the cap fails it too, so a returned vec never holds a
/// partially-filled record. The summary variant ignores `fields` and yields
/// exactly one record built from `channel`.
pub fn assemble(
    fields: &FieldSequences,
    channel: &Channel,
    variant: ContentVariant,
    max_count: Option<usize>,
    site_origin: &str,
) -> Result<Vec<ContentRecord>> {
    if variant == ContentVariant::Summary {
        return Ok(vec![ContentRecord::Summary(summarize(channel))]);
    }

    let required = required_fields(variant);
    let total = check_parity(fields, required)?;
    let take = max_count.map_or(total, |cap| cap.min(total));

    let mut records = Vec::with_capacity(take);
    for i in 0..take {
        let get = |field: Field| -> Result<&str> {
            fields.get(field)[i]
                .as_deref()
                .ok_or_else(|| ScrapeError::absent_at(field.name(), i))
        };

        let title = get(Field::Title)?.to_string();
        let href = get(Field::Href)?;
        let views = normalize(get(Field::Views)?);
        let video_id = item_id(href).to_string();
        let link = absolute_link(site_origin, href);

        let record = match variant {
            ContentVariant::Shorts => ContentRecord::Short(ShortRecord {
                channel: channel.handle.clone(),
                identifier: channel.id.clone(),
                title,
                views,
                video_id,
                link,
            }),
            _ => {
                let row = VideoRecord {
                    channel: channel.handle.clone(),
                    identifier: channel.id.clone(),
                    title,
                    published: get(Field::Published)?.to_string(),
                    views,
                    video_id,
                    link,
                    duration: get(Field::Duration)?.to_string(),
                };
                if variant == ContentVariant::Streams {
                    ContentRecord::Stream(row)
                } else {
                    ContentRecord::Video(row)
                }
            }
        };
        records.push(record);
    }

    debug!(
        channel = %channel.handle,
        variant = %variant,
        total,
        kept = records.len(),
        "assembled records"
    );
    Ok(records)
}

/// One channel-level row; subscriber count is expanded like item views.
pub fn summarize(channel: &Channel) -> ChannelSummaryRecord {
    ChannelSummaryRecord {
        channel: channel.handle.clone(),
        identifier: channel.id.clone(),
        description: channel.description.clone(),
        keywords: channel.keywords.clone(),
        subscribers: normalize(&channel.subscribers),
        joined: channel.about.joined.clone(),
        location: channel.about.location.clone(),
        global_views: channel.about.global_views.clone(),
    }
}

/// Length shared by all required sequences, or the first one that disagrees.
fn check_parity(fields: &FieldSequences, required: &[Field]) -> Result<usize> {
    let Some((&first, rest)) = required.split_first() else {
        return Ok(0);
    };
    let expected = fields.get(first).len();
    for &field in rest {
        let found = fields.get(field).len();
        if found != expected {
            return Err(ScrapeError::ExtractionMismatch {
                field: field.name(),
                expected,
                found,
            });
        }
    }
    Ok(expected)
}

/// Trailing segment of an item href: `/watch?v=ID` → `ID`, `/shorts/ID` → `ID`.
pub fn item_id(href: &str) -> &str {
    let tail = href.rsplit('/').next().unwrap_or(href);
    let (path, query) = tail.split_once('?').unwrap_or((tail, ""));
    query
        .split('&')
        .find_map(|kv| kv.strip_prefix("v="))
        .unwrap_or(path)
}

pub fn absolute_link(origin: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{}{}", origin.trim_end_matches('/'), href)
    }
}
