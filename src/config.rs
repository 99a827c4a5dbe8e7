use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::Result;
use crate::record::ContentVariant;

/// Canonical origin prefixed to every relative item link.
pub const SITE_ORIGIN: &str = "https://www.youtube.com";

/// Listing tab a run scrapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Videos,
    Streams,
    Shorts,
}

impl ContentType {
    /// Path segment of the channel tab.
    pub fn tab(self) -> &'static str {
        match self {
            ContentType::Videos => "videos",
            ContentType::Streams => "streams",
            ContentType::Shorts => "shorts",
        }
    }

    pub fn item_variant(self) -> ContentVariant {
        match self {
            ContentType::Videos => ContentVariant::Videos,
            ContentType::Streams => ContentVariant::Streams,
            ContentType::Shorts => ContentVariant::Shorts,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tab())
    }
}

/// Per-item rows, or one summary row per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    #[default]
    ItemDetail,
    ChannelSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Format {
    Csv,
    Txt,
    Xlsx,
    Json,
}

impl Format {
    pub const ALL: [Format; 4] = [Format::Csv, Format::Txt, Format::Xlsx, Format::Json];

    pub fn ext(self) -> &'static str {
        match self {
            Format::Csv => "csv",
            Format::Txt => "txt",
            Format::Xlsx => "xlsx",
            Format::Json => "json",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ext().to_uppercase())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Format::Csv),
            "txt" | "tsv" => Ok(Format::Txt),
            "xlsx" => Ok(Format::Xlsx),
            "json" => Ok(Format::Json),
            other => Err(format!("unknown format `{}`", other)),
        }
    }
}

/// Export formats chosen for the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatSelection {
    All,
    Only(Vec<Format>),
}

impl FormatSelection {
    /// Selected formats in canonical order, without duplicates.
    pub fn formats(&self) -> Vec<Format> {
        match self {
            FormatSelection::All => Format::ALL.to_vec(),
            FormatSelection::Only(list) => {
                let mut v = list.clone();
                v.sort();
                v.dedup();
                v
            }
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, FormatSelection::All)
    }
}

impl FromStr for FormatSelection {
    type Err = String;

    /// `all`, or a comma-separated list such as `csv,json`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(FormatSelection::All);
        }
        let list = s
            .split(',')
            .filter(|p| !p.trim().is_empty())
            .map(str::parse)
            .collect::<std::result::Result<Vec<Format>, _>>()?;
        if list.is_empty() {
            return Err("no export format given".into());
        }
        Ok(FormatSelection::Only(list))
    }
}

/// Choices fixed for the whole run and passed to every channel.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub content: ContentType,
    pub granularity: Granularity,
    pub max_count: Option<usize>,
    pub formats: FormatSelection,
    pub output_root: PathBuf,
    pub timestamp: String,
    pub site_origin: String,
}

impl RunConfig {
    pub fn new(
        content: ContentType,
        granularity: Granularity,
        max_count: Option<usize>,
        formats: FormatSelection,
        output_root: impl Into<PathBuf>,
    ) -> Self {
        // Channel summaries are only offered on the videos tab.
        let granularity = if content == ContentType::Videos {
            granularity
        } else {
            Granularity::ItemDetail
        };
        RunConfig {
            content,
            granularity,
            max_count,
            formats,
            output_root: output_root.into(),
            timestamp: run_timestamp(),
            site_origin: SITE_ORIGIN.to_string(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    pub fn with_site_origin(mut self, origin: impl Into<String>) -> Self {
        self.site_origin = origin.into();
        self
    }

    /// Schema of the per-channel export this run produces.
    pub fn variant(&self) -> ContentVariant {
        match self.granularity {
            Granularity::ChannelSummary => ContentVariant::Summary,
            Granularity::ItemDetail => self.content.item_variant(),
        }
    }
}

/// Local time stamp that namespaces one run's output files.
pub fn run_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Process settings: defaults, then `eagle_eye.toml`, then `EAGLE_EYE_*` env vars.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub output_dir: PathBuf,
    pub site_origin: String,
    pub snapshot_dir: Option<PathBuf>,
    pub user_agent: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            output_dir: PathBuf::from("downloads"),
            site_origin: SITE_ORIGIN.to_string(),
            snapshot_dir: None,
            user_agent: format!("eagle_eye/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_secs: 30,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        let d = Settings::default();
        let settings = ::config::Config::builder()
            .set_default("output_dir", d.output_dir.to_string_lossy().to_string())?
            .set_default("site_origin", d.site_origin)?
            .set_default("user_agent", d.user_agent)?
            .set_default("request_timeout_secs", d.request_timeout_secs as i64)?
            .add_source(::config::File::with_name("eagle_eye").required(false))
            .add_source(::config::Environment::with_prefix("EAGLE_EYE"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}
