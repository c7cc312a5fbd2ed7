// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod podcast;
mod subscription;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::DateTime;

pub use podcast::{ITUNES_NAMESPACE, render_podcast};
pub use subscription::render_subscription;

use crate::error::RenderError;
use crate::feed::RemoteChannel;
use crate::reconcile::ReconciledEntry;

/// Settings shared by both output documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSettings {
    /// Podcast name; names the documents and the audio subdirectory
    pub name: String,
    /// Public URL the documents and audio files are served from
    pub base_url: String,
    /// Podcast artwork
    pub image_url: Option<String>,
    pub audio_extension: String,
    /// `lastBuildDate` of the podcast document, already formatted
    pub build_date: String,
}

impl FeedSettings {
    /// Public URL of an entry's audio file
    pub fn enclosure_url(&self, video_id: &str) -> String {
        format!(
            "{}/audio/{}/{}.{}",
            self.base_url, self.name, video_id, self.audio_extension
        )
    }

    /// Public URL of the podcast document
    pub fn podcast_url(&self) -> String {
        format!("{}/{}.rss", self.base_url, self.name)
    }

    fn require(&self) -> Result<(), RenderError> {
        if self.name.is_empty() {
            return Err(RenderError::MissingField {
                field: "name",
                subject: "feed settings".to_string(),
            });
        }
        if self.base_url.is_empty() {
            return Err(RenderError::MissingField {
                field: "base url",
                subject: self.name.clone(),
            });
        }
        Ok(())
    }
}

/// What the podcast document shows: channel fields plus the playable entries
#[derive(Debug, Clone)]
pub struct FeedOutput<'r, 'a> {
    pub channel: &'a RemoteChannel,
    /// Entries with a positive duration, in feed order
    pub items: Vec<&'r ReconciledEntry<'a>>,
}

impl<'r, 'a> FeedOutput<'r, 'a> {
    pub fn new(channel: &'a RemoteChannel, entries: &'r [ReconciledEntry<'a>]) -> Self {
        Self {
            channel,
            items: entries.iter().filter(|entry| entry.is_playable()).collect(),
        }
    }

    /// Date of the newest item, or the channel's publication date without items
    ///
    /// Derived from content only, so unchanged inputs render identical documents.
    pub fn build_date(&self) -> String {
        self.items
            .iter()
            .filter_map(|entry| {
                DateTime::parse_from_rfc3339(entry.entry.published.trim())
                    .ok()
                    .map(|published| (published, entry))
            })
            .max_by_key(|(published, _)| *published)
            .map(|(_, entry)| entry.pub_date.clone())
            .unwrap_or_else(|| self.channel.published.clone())
    }
}

/// Write a rendered document to disk, flushing before returning
pub fn write_document(path: &Path, contents: &str) -> Result<(), RenderError> {
    let write_failed = |e: std::io::Error| RenderError::WriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    let file = File::create(path).map_err(write_failed)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(contents.as_bytes()).map_err(write_failed)?;
    writer.flush().map_err(write_failed)?;

    Ok(())
}
