use std::fmt;

/// A row type with a fixed, ordered column set.
pub trait Tabular {
    const COLUMNS: &'static [&'static str];

    /// Cell values in `COLUMNS` order.
    fn cells(&self) -> Vec<String>;
}

/// Which schema a run produces. Videos and streams share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentVariant {
    Videos,
    Streams,
    Shorts,
    Summary,
}

impl ContentVariant {
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            ContentVariant::Videos | ContentVariant::Streams => VideoRecord::COLUMNS,
            ContentVariant::Shorts => ShortRecord::COLUMNS,
            ContentVariant::Summary => ChannelSummaryRecord::COLUMNS,
        }
    }

    /// Name used in export file names and directories.
    pub fn slug(self) -> &'static str {
        match self {
            ContentVariant::Videos => "videos",
            ContentVariant::Streams => "streams",
            ContentVariant::Shorts => "shorts",
            ContentVariant::Summary => "summary",
        }
    }
}

impl fmt::Display for ContentVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// About-panel details, only shown on the channel summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AboutInfo {
    pub joined: String,
    pub location: String,
    pub global_views: String,
}

/// Channel-level attributes, read once per page and copied into every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Channel {
    pub handle: String,
    pub id: String,
    pub subscribers: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub about: AboutInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRecord {
    pub channel: String,
    pub identifier: String,
    pub title: String,
    pub published: String,
    pub views: String,
    pub video_id: String,
    pub link: String,
    pub duration: String,
}

/// Live streams are listed with the same fields as regular uploads.
pub type StreamRecord = VideoRecord;

impl Tabular for VideoRecord {
    const COLUMNS: &'static [&'static str] = &[
        "Channel",
        "Identifier",
        "Title",
        "Published",
        "Video_views",
        "Video_id",
        "Link",
        "Duration",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.channel.clone(),
            self.identifier.clone(),
            self.title.clone(),
            self.published.clone(),
            self.views.clone(),
            self.video_id.clone(),
            self.link.clone(),
            self.duration.clone(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortRecord {
    pub channel: String,
    pub identifier: String,
    pub title: String,
    pub views: String,
    pub video_id: String,
    pub link: String,
}

impl Tabular for ShortRecord {
    const COLUMNS: &'static [&'static str] =
        &["Channel", "Identifier", "Title", "Video_views", "Video_id", "Link"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.channel.clone(),
            self.identifier.clone(),
            self.title.clone(),
            self.views.clone(),
            self.video_id.clone(),
            self.link.clone(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSummaryRecord {
    pub channel: String,
    pub identifier: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub subscribers: String,
    pub joined: String,
    pub location: String,
    pub global_views: String,
}

impl Tabular for ChannelSummaryRecord {
    const COLUMNS: &'static [&'static str] = &[
        "Channel",
        "Identifier",
        "Description",
        "Keywords",
        "Subscribers",
        "Joined",
        "Location",
        "Global_views",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.channel.clone(),
            self.identifier.clone(),
            self.description.clone(),
            self.keywords.join(", "),
            self.subscribers.clone(),
            self.joined.clone(),
            self.location.clone(),
            self.global_views.clone(),
        ]
    }
}

/// One assembled row, tagged with the schema it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentRecord {
    Video(VideoRecord),
    Stream(StreamRecord),
    Short(ShortRecord),
    Summary(ChannelSummaryRecord),
}

impl ContentRecord {
    pub fn variant(&self) -> ContentVariant {
        match self {
            ContentRecord::Video(_) => ContentVariant::Videos,
            ContentRecord::Stream(_) => ContentVariant::Streams,
            ContentRecord::Short(_) => ContentVariant::Shorts,
            ContentRecord::Summary(_) => ContentVariant::Summary,
        }
    }

    pub fn cells(&self) -> Vec<String> {
        match self {
            ContentRecord::Video(r) | ContentRecord::Stream(r) => r.cells(),
            ContentRecord::Short(r) => r.cells(),
            ContentRecord::Summary(r) => r.cells(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video() -> VideoRecord {
        VideoRecord {
            channel: "@rustlang".into(),
            identifier: "UCaYhcUwRBNscFNUKTjgPFiA".into(),
            title: "RustConf".into(),
            published: "2 days ago".into(),
            views: "15,000".into(),
            video_id: "abc123".into(),
            link: "https://www.youtube.com/watch?v=abc123".into(),
            duration: "12:34".into(),
        }
    }

    #[test]
    fn column_counts_per_variant() {
        assert_eq!(ContentVariant::Videos.columns().len(), 8);
        assert_eq!(ContentVariant::Streams.columns().len(), 8);
        assert_eq!(ContentVariant::Shorts.columns().len(), 6);
        assert_eq!(ContentVariant::Summary.columns().len(), 8);
    }

    #[test]
    fn cells_match_columns() {
        let v = ContentRecord::Video(video());
        assert_eq!(v.cells().len(), v.variant().columns().len());
        assert_eq!(v.cells()[4], "15,000");

        let s = ContentRecord::Stream(video());
        assert_eq!(s.variant(), ContentVariant::Streams);
        assert_eq!(s.cells(), v.cells());
    }

    #[test]
    fn summary_joins_keywords() {
        let r = ChannelSummaryRecord {
            channel: "@rustlang".into(),
            identifier: "UC1".into(),
            description: "The Rust programming language".into(),
            keywords: vec!["rust".into(), "programming".into()],
            subscribers: "150,000".into(),
            joined: "Mar 5 2014".into(),
            location: "United States".into(),
            global_views: "9,000,000".into(),
        };
        let cells = r.cells();
        assert_eq!(cells.len(), ChannelSummaryRecord::COLUMNS.len());
        assert_eq!(cells[3], "rust, programming");
    }
}
