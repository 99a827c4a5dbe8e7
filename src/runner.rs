use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::assemble::assemble;
use crate::config::{Format, Granularity, RunConfig};
use crate::error::Result;
use crate::export::{self, ExportTarget, Table, SUMMARY_DIR};
use crate::loader::{ChannelTarget, PageLoader};
use crate::merge::{self, MergeOutcome};
use crate::parser::{self, ExtractedPage};
use crate::record::{ContentRecord, ContentVariant};

/// What one channel produced.
#[derive(Debug, Clone)]
pub struct ChannelExport {
    pub handle: String,
    pub records: Vec<ContentRecord>,
    pub files: Vec<PathBuf>,
}

#[derive(Debug)]
pub enum ChannelOutcome {
    Exported { handle: String, records: usize, files: Vec<PathBuf> },
    Failed { error: String },
}

#[derive(Debug)]
pub struct ChannelReport {
    pub input: String,
    pub outcome: ChannelOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed { records: usize },
    NothingScraped,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub channels: Vec<ChannelReport>,
    pub total_records: usize,
    pub combined: Vec<PathBuf>,
    pub combined_error: Option<String>,
    pub merged: Option<MergeOutcome>,
    pub merge_error: Option<String>,
}

impl RunReport {
    pub fn outcome(&self) -> RunOutcome {
        if self.total_records == 0 {
            RunOutcome::NothingScraped
        } else {
            RunOutcome::Completed {
                records: self.total_records,
            }
        }
    }

    pub fn failed(&self) -> usize {
        self.channels
            .iter()
            .filter(|c| matches!(c.outcome, ChannelOutcome::Failed { .. }))
            .count()
    }
}

/// Drives one run over a list of channels with a fixed `RunConfig`.
pub struct Runner<L> {
    loader: L,
    run: RunConfig,
}

impl<L: PageLoader> Runner<L> {
    pub fn new(loader: L, run: RunConfig) -> Self {
        Runner { loader, run }
    }

    /// Channels are processed in input order. A channel that fails is reported
    /// and skipped; the rest of the run carries on.
    pub async fn run(&self, channels: &[String]) -> Result<RunReport> {
        export::ensure_dir(&self.run.output_root)?;

        let pb = ProgressBar::new(channels.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("=> "),
        );

        let mut report = RunReport::default();
        let mut combined = Vec::new();

        for input in channels {
            pb.set_message(input.clone());
            let outcome = match self.channel(input).await {
                Ok(done) => {
                    pb.println(format!(
                        "{}: {} {} saved to {} file(s)",
                        done.handle,
                        done.records.len(),
                        self.run.variant(),
                        done.files.len()
                    ));
                    report.total_records += done.records.len();
                    let outcome = ChannelOutcome::Exported {
                        handle: done.handle,
                        records: done.records.len(),
                        files: done.files,
                    };
                    combined.extend(done.records);
                    outcome
                }
                Err(e) => {
                    warn!(channel = %input, error = %e, "channel failed");
                    pb.println(format!("An error occurred while scraping {}: {}", input, e));
                    ChannelOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            };
            report.channels.push(ChannelReport {
                input: input.clone(),
                outcome,
            });
            pb.inc(1);
        }
        pb.finish_and_clear();

        // Channel files are already on disk; aggregate failures are reported, not raised.
        match self.run.granularity {
            Granularity::ItemDetail if self.run.formats.is_all() && !combined.is_empty() => {
                match self.export_combined(&combined) {
                    Ok(files) => report.combined = files,
                    Err(e) => {
                        warn!(error = %e, "combined export failed");
                        report.combined_error = Some(e.to_string());
                    }
                }
            }
            Granularity::ChannelSummary => {
                match merge::merge(&self.run.output_root.join(SUMMARY_DIR)) {
                    Ok(merged) => report.merged = merged,
                    Err(e) => {
                        warn!(error = %e, "summary merge failed");
                        report.merge_error = Some(e.to_string());
                    }
                }
            }
            Granularity::ItemDetail => {}
        }

        info!(
            channels = channels.len(),
            failed = report.failed(),
            records = report.total_records,
            "run finished"
        );
        Ok(report)
    }

    /// Load, extract, assemble and export a single channel.
    pub async fn channel(&self, input: &str) -> Result<ChannelExport> {
        let target = ChannelTarget::new(input);
        let html = self.loader.load(&target, self.run.content).await?;
        let page = parser::parse_page(&html, self.run.content)?;
        export_page(&page, &self.run)
    }

    fn export_combined(&self, records: &[ContentRecord]) -> Result<Vec<PathBuf>> {
        let variant = self.run.variant();
        let target = ExportTarget::Combined {
            root: &self.run.output_root,
            timestamp: &self.run.timestamp,
        };
        let files = export::write_table(
            &Table::from_records(variant, records),
            variant,
            &self.run.formats.formats(),
            target,
        )?;
        info!(rows = records.len(), "combined export written");
        Ok(files)
    }
}

/// Assemble and export one parsed page. Summary runs also leave a CSV
/// snapshot under `summary_channels/` for the merger.
pub fn export_page(page: &ExtractedPage, run: &RunConfig) -> Result<ChannelExport> {
    let variant = run.variant();
    let records = assemble(
        &page.fields,
        &page.channel,
        variant,
        run.max_count,
        &run.site_origin,
    )?;
    let handle = page.channel.handle.clone();
    info!(channel = %handle, found = page.fields.len(), kept = records.len(), "{} extracted", variant);

    let mut files = export::export(
        &records,
        variant,
        &run.formats.formats(),
        &handle,
        &run.timestamp,
        &run.output_root,
    )?;

    if variant == ContentVariant::Summary {
        let dir = run.output_root.join(SUMMARY_DIR);
        let stem = export::summary_stem(&handle);
        let target = ExportTarget::Fixed { dir: &dir, stem: &stem };
        files.extend(export::write_table(
            &Table::from_records(variant, &records),
            variant,
            &[Format::Csv],
            target,
        )?);
    }

    Ok(ChannelExport {
        handle,
        records,
        files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ContentType, FormatSelection};
    use crate::loader::SnapshotLoader;

    const PAGE: &str = r#"<html><head>
        <meta itemprop="identifier" content="UC123">
        <meta property="og:description" content="Hello">
        </head><body>
        <yt-formatted-string id="channel-handle">@demo</yt-formatted-string>
        <yt-formatted-string id="subscriber-count">1.2K subscribers</yt-formatted-string>
        <ytd-rich-grid-media>
          <a id="video-title-link" href="/watch?v=aaa"><span id="video-title">First</span></a>
          <span class="inline-metadata-item">15K views</span>
          <span class="inline-metadata-item">2 days ago</span>
          <span class="ytd-thumbnail-overlay-time-status-renderer">10:01</span>
        </ytd-rich-grid-media>
        <ytd-rich-grid-media>
          <a id="video-title-link" href="/watch?v=bbb"><span id="video-title">Second</span></a>
          <span class="inline-metadata-item">900 views</span>
          <span class="inline-metadata-item">1 week ago</span>
          <span class="ytd-thumbnail-overlay-time-status-renderer">3:05</span>
        </ytd-rich-grid-media>
        </body></html>"#;

    fn run_config(root: &std::path::Path, granularity: Granularity, formats: FormatSelection) -> RunConfig {
        RunConfig::new(ContentType::Videos, granularity, None, formats, root)
            .with_timestamp("20240101_000000")
    }

    #[test]
    fn export_page_writes_channel_files() {
        let tmp = tempfile::tempdir().unwrap();
        let run = run_config(tmp.path(), Granularity::ItemDetail, "csv".parse().unwrap());
        let page = parser::parse_page(PAGE, ContentType::Videos).unwrap();

        let done = export_page(&page, &run).unwrap();
        assert_eq!(done.handle, "@demo");
        assert_eq!(done.records.len(), 2);
        assert_eq!(
            done.files,
            vec![tmp.path().join("@demo/@demo_videos_20240101_000000.csv")]
        );
    }

    #[test]
    fn summary_page_leaves_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        let run = run_config(tmp.path(), Granularity::ChannelSummary, "json".parse().unwrap());
        let page = parser::parse_page(PAGE, ContentType::Videos).unwrap();

        let done = export_page(&page, &run).unwrap();
        assert_eq!(done.records.len(), 1);
        assert!(tmp.path().join("@demo/@demo_summary_20240101_000000.json").exists());
        assert!(tmp.path().join("summary_channels/@demo_summary.csv").exists());
    }

    #[tokio::test]
    async fn failed_channel_does_not_stop_run() {
        let pages = tempfile::tempdir().unwrap();
        std::fs::write(pages.path().join("@demo_videos.html"), PAGE).unwrap();
        let out = tempfile::tempdir().unwrap();

        let runner = Runner::new(
            SnapshotLoader::new(pages.path()),
            run_config(out.path(), Granularity::ItemDetail, FormatSelection::All),
        );
        let report = runner
            .run(&["@missing".to_string(), "@demo".to_string()])
            .await
            .unwrap();

        assert_eq!(report.failed(), 1);
        assert_eq!(report.outcome(), RunOutcome::Completed { records: 2 });
        assert_eq!(report.combined.len(), 4);
        assert!(out
            .path()
            .join("all_videos_channels/all_videos_eagle_eye_20240101_000000.csv")
            .exists());
    }

    #[tokio::test]
    async fn export_failure_stays_with_its_channel() {
        let pages = tempfile::tempdir().unwrap();
        std::fs::write(pages.path().join("@demo_videos.html"), PAGE).unwrap();
        std::fs::write(pages.path().join("@other_videos.html"), PAGE.replace("@demo", "@other")).unwrap();
        let out = tempfile::tempdir().unwrap();
        let blocked = out.path().join("@demo/@demo_videos_20240101_000000.csv");
        std::fs::create_dir_all(&blocked).unwrap();

        let runner = Runner::new(
            SnapshotLoader::new(pages.path()),
            run_config(out.path(), Granularity::ItemDetail, "csv,json".parse().unwrap()),
        );
        let report = runner
            .run(&["@demo".to_string(), "@other".to_string()])
            .await
            .unwrap();

        assert_eq!(report.failed(), 1);
        match &report.channels[0].outcome {
            ChannelOutcome::Failed { error } => assert!(error.contains("@demo_videos_20240101_000000.csv")),
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(!out.path().join("@demo/@demo_videos_20240101_000000.json").exists());
        assert!(out.path().join("@other/@other_videos_20240101_000000.csv").is_file());
        assert!(out.path().join("@other/@other_videos_20240101_000000.json").is_file());
        assert_eq!(report.outcome(), RunOutcome::Completed { records: 2 });
    }

    #[test]
    fn export_page_reports_export_io() {
        let tmp = tempfile::tempdir().unwrap();
        let run = run_config(tmp.path(), Granularity::ItemDetail, "csv".parse().unwrap());
        std::fs::create_dir_all(tmp.path().join("@demo/@demo_videos_20240101_000000.csv")).unwrap();
        let page = parser::parse_page(PAGE, ContentType::Videos).unwrap();

        let err = export_page(&page, &run).unwrap_err();
        assert!(matches!(err, crate::error::ScrapeError::ExportIo { .. }));
    }

    #[tokio::test]
    async fn broken_merge_keeps_the_report() {
        let pages = tempfile::tempdir().unwrap();
        std::fs::write(pages.path().join("@demo_videos.html"), PAGE).unwrap();
        let out = tempfile::tempdir().unwrap();
        let summaries = out.path().join("summary_channels");
        std::fs::create_dir_all(&summaries).unwrap();
        std::fs::write(summaries.join("old_summary.csv"), "Channel,Title\n@old,x\n").unwrap();

        let runner = Runner::new(
            SnapshotLoader::new(pages.path()),
            run_config(out.path(), Granularity::ChannelSummary, "csv".parse().unwrap()),
        );
        let report = runner.run(&["@demo".to_string()]).await.unwrap();

        assert_eq!(report.outcome(), RunOutcome::Completed { records: 1 });
        assert!(report.merged.is_none());
        assert!(report.merge_error.as_deref().unwrap().contains("old_summary.csv"));
        assert!(out.path().join("@demo/@demo_summary_20240101_000000.csv").is_file());
    }

    #[test]
    fn summary_snapshot_uses_safe_name() {
        let tmp = tempfile::tempdir().unwrap();
        let run = run_config(tmp.path(), Granularity::ChannelSummary, "csv".parse().unwrap());
        let page = parser::parse_page(&PAGE.replace("@demo", "@de:mo"), ContentType::Videos).unwrap();

        export_page(&page, &run).unwrap();
        assert!(tmp.path().join("@de_mo/@de_mo_summary_20240101_000000.csv").is_file());
        assert!(tmp.path().join("summary_channels/@de_mo_summary.csv").is_file());
    }

    #[tokio::test]
    async fn all_failures_report_nothing_scraped() {
        let pages = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let runner = Runner::new(
            SnapshotLoader::new(pages.path()),
            run_config(out.path(), Granularity::ItemDetail, FormatSelection::All),
        );
        let report = runner.run(&["@gone".to_string()]).await.unwrap();
        assert_eq!(report.outcome(), RunOutcome::NothingScraped);
        assert!(report.combined.is_empty());
    }
}
