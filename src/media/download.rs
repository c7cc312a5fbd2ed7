// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;

use crate::process::{CommandRunner, ExitInfo};
use crate::progress::{ProgressEvent, SharedProgressReporter};

/// How to invoke the external downloader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloaderConfig {
    pub program: String,
    /// Format selector handed to the downloader (`140` is m4a audio)
    pub format: String,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            program: "yt-dlp".to_string(),
            format: "140".to_string(),
        }
    }
}

/// What happened when the downloader was started
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The downloader ran to completion; its status is informational only
    Finished(ExitInfo),
    /// The downloader could not be started at all
    Unavailable(String),
}

/// Arguments for downloading the newest `limit` videos of a channel into
/// `audio_dir`, one file per video id
pub fn downloader_args(
    config: &DownloaderConfig,
    channel_url: &str,
    audio_dir: &Path,
    audio_extension: &str,
    limit: usize,
) -> Vec<String> {
    let template = audio_dir.join(format!("%(id)s.{audio_extension}"));

    vec![
        "-i".to_string(),
        "--embed-thumbnail".to_string(),
        "--add-metadata".to_string(),
        "-f".to_string(),
        config.format.clone(),
        "-o".to_string(),
        template.to_string_lossy().into_owned(),
        "--playlist-end".to_string(),
        limit.to_string(),
        channel_url.to_string(),
    ]
}

/// Run the downloader with inherited output
///
/// Best effort: neither a failing exit status nor a missing binary stops the
/// run. Whatever ended up on disk is picked up by reconciliation.
pub async fn run_downloader<R: CommandRunner + ?Sized>(
    runner: &R,
    config: &DownloaderConfig,
    channel_url: &str,
    audio_dir: &Path,
    audio_extension: &str,
    limit: usize,
    reporter: &SharedProgressReporter,
) -> DownloadOutcome {
    reporter.report(ProgressEvent::DownloaderStarting {
        program: config.program.clone(),
        channel_url: channel_url.to_string(),
        limit,
    });

    let args = downloader_args(config, channel_url, audio_dir, audio_extension, limit);

    match runner.run(&config.program, &args).await {
        Ok(exit) => {
            reporter.report(ProgressEvent::DownloaderFinished {
                success: exit.success,
                code: exit.code,
            });
            DownloadOutcome::Finished(exit)
        }
        Err(e) => {
            reporter.report(ProgressEvent::DownloaderUnavailable {
                program: config.program.clone(),
                error: e.to_string(),
            });
            DownloadOutcome::Unavailable(e.to_string())
        }
    }
}
