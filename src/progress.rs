// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use std::sync::Arc;

/// Events emitted during a cast run for progress reporting
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Channel feed is being fetched from URL
    FetchingFeed { url: String },

    /// Channel feed has been parsed successfully
    FeedParsed {
        channel_title: String,
        total_entries: usize,
    },

    /// The external downloader is about to take over the terminal
    DownloaderStarting {
        program: String,
        channel_url: String,
        /// Number of newest videos requested
        limit: usize,
    },

    /// The external downloader exited (status is informational only)
    DownloaderFinished { success: bool, code: Option<i32> },

    /// The external downloader could not be started
    DownloaderUnavailable { program: String, error: String },

    /// An entry has a local audio file
    ArtifactFound {
        video_id: String,
        path: PathBuf,
        byte_length: u64,
    },

    /// An entry has no local audio file (download pending or failed)
    ArtifactMissing { video_id: String, path: PathBuf },

    /// The duration of an entry's audio file was determined
    DurationProbed {
        video_id: String,
        /// Formatted as `HH:MM:SS`
        duration: String,
    },

    /// A local file with no matching feed entry was deleted
    ArtifactPruned { video_id: String, path: PathBuf },

    /// An output document was written and flushed
    DocumentWritten { path: PathBuf },

    /// Cast run completed
    CastCompleted {
        playable_count: usize,
        missing_count: usize,
        removed_count: usize,
    },
}

/// Trait for reporting progress events during a cast run.
///
/// Implementations can use this to display progress, log messages,
/// or collect statistics.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress event
    fn report(&self, event: ProgressEvent);
}

/// A shared reference to a progress reporter
pub type SharedProgressReporter = Arc<dyn ProgressReporter>;

/// A no-op progress reporter that silently ignores all events.
/// Useful for tests or quiet mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _event: ProgressEvent) {
        // Intentionally empty
    }
}

impl NoopReporter {
    /// Create a new NoopReporter wrapped in an Arc
    pub fn shared() -> SharedProgressReporter {
        Arc::new(Self)
    }
}
