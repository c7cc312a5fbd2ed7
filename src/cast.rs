// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::{CastError, ChannelError, StateError};
use crate::feed::{ChannelSource, fetch_channel, validate_url};
use crate::http::HttpClient;
use crate::media::{DownloadOutcome, DownloaderConfig, ProbeConfig, run_downloader};
use crate::process::CommandRunner;
use crate::progress::{ProgressEvent, SharedProgressReporter};
use crate::reconcile::{ReconcileOptions, reconcile};
use crate::render::{FeedOutput, FeedSettings, render_podcast, render_subscription, write_document};
use crate::report::write_report;

/// Which channel to cast and where the result is served from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastRequest {
    /// Channel URL, `https://www.youtube.com/channel/<id>`
    pub channel_url: String,
    /// Podcast name; names the documents and the audio subdirectory
    pub name: String,
    /// Public URL the output directory is served under
    pub base_url: String,
    /// Podcast artwork
    pub image_url: Option<String>,
}

/// Options for a cast run
#[derive(Debug, Clone)]
pub struct CastOptions {
    /// Directory receiving `{name}.rss`, `{name}.opml` and `audio/{name}/`
    pub output_dir: PathBuf,
    pub downloader: DownloaderConfig,
    pub probe: ProbeConfig,
    pub audio_extension: String,
    /// Reconcile and render what is already on disk without downloading
    pub skip_download: bool,
    /// Where to write the JSON reconciliation report, if anywhere
    pub report_path: Option<PathBuf>,
}

impl Default for CastOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            downloader: DownloaderConfig::default(),
            probe: ProbeConfig::default(),
            audio_extension: "m4a".to_string(),
            skip_download: false,
            report_path: None,
        }
    }
}

/// Result of a cast run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastResult {
    /// Entries listed in the podcast document
    pub playable: usize,
    /// Entries without local audio
    pub missing: usize,
    /// Video ids whose local audio was deleted
    pub removed: BTreeSet<String>,
    /// How the downloader run went, `None` when it was not started
    pub download: Option<DownloadOutcome>,
    pub podcast_path: PathBuf,
    pub subscription_path: PathBuf,
}

/// Turn a channel into a podcast in the output directory
///
/// This is the main entry point for the library. It:
/// 1. Validates the request
/// 2. Fetches and parses the channel's metadata feed
/// 3. Runs the downloader for the newest entries (unless skipped)
/// 4. Reconciles local audio with the feed, probing and pruning
/// 5. Writes the podcast and subscription documents
/// 6. Writes the reconciliation report when requested
///
/// Nothing is written to disk before the feed has been parsed.
pub async fn cast_channel<C: HttpClient, R: CommandRunner + ?Sized>(
    client: &C,
    runner: &R,
    request: &CastRequest,
    options: &CastOptions,
    reporter: SharedProgressReporter,
) -> Result<CastResult, CastError> {
    let source = ChannelSource::parse(&request.channel_url)?;
    validate_name(&request.name)?;
    let base_url = validate_url("base", &request.base_url)?;
    let image_url = request
        .image_url
        .as_deref()
        .map(|url| validate_url("artwork", url))
        .transpose()?;

    reporter.report(ProgressEvent::FetchingFeed {
        url: source.feed_url(),
    });

    let channel = fetch_channel(client, &source).await?;

    reporter.report(ProgressEvent::FeedParsed {
        channel_title: channel.title.clone(),
        total_entries: channel.entries.len(),
    });

    let audio_dir = audio_dir(&options.output_dir, &request.name);
    std::fs::create_dir_all(&audio_dir).map_err(|e| StateError::CreateDirectoryFailed {
        path: audio_dir.clone(),
        source: e,
    })?;

    let download = if !options.skip_download && !channel.entries.is_empty() {
        let outcome = run_downloader(
            runner,
            &options.downloader,
            source.url(),
            &audio_dir,
            &options.audio_extension,
            channel.entries.len(),
            &reporter,
        )
        .await;
        Some(outcome)
    } else {
        None
    };

    let reconcile_options = ReconcileOptions {
        audio_extension: options.audio_extension.clone(),
        probe: options.probe.clone(),
    };
    let reconciliation = reconcile(&channel, &audio_dir, &reconcile_options, runner, &reporter).await?;

    let output = FeedOutput::new(&channel, &reconciliation.entries);
    let settings = FeedSettings {
        name: request.name.clone(),
        base_url,
        image_url,
        audio_extension: options.audio_extension.clone(),
        build_date: output.build_date(),
    };

    let podcast = render_podcast(&output, &settings)?;
    let subscription = render_subscription(&channel, &settings)?;

    let podcast_path = options.output_dir.join(format!("{}.rss", request.name));
    write_document(&podcast_path, &podcast)?;
    reporter.report(ProgressEvent::DocumentWritten {
        path: podcast_path.clone(),
    });

    let subscription_path = options.output_dir.join(format!("{}.opml", request.name));
    write_document(&subscription_path, &subscription)?;
    reporter.report(ProgressEvent::DocumentWritten {
        path: subscription_path.clone(),
    });

    if let Some(report_path) = &options.report_path {
        write_report(&reconciliation, &channel, report_path)?;
        reporter.report(ProgressEvent::DocumentWritten {
            path: report_path.clone(),
        });
    }

    let result = CastResult {
        playable: reconciliation.playable_count(),
        missing: reconciliation.missing_count(),
        removed: reconciliation.removed,
        download,
        podcast_path,
        subscription_path,
    };

    reporter.report(ProgressEvent::CastCompleted {
        playable_count: result.playable,
        missing_count: result.missing,
        removed_count: result.removed.len(),
    });

    Ok(result)
}

/// Directory holding the audio files of a podcast
pub fn audio_dir(output_dir: &Path, name: &str) -> PathBuf {
    output_dir.join("audio").join(name)
}

// The name ends up in file names and URL paths
fn validate_name(name: &str) -> Result<(), ChannelError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\']);

    if invalid {
        return Err(ChannelError::InvalidName(name.to_string()));
    }
    Ok(())
}
