// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::feed::RemoteChannel;
use crate::reconcile::{ReconciledEntry, Reconciliation};

/// Serializable record of one reconciliation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub channel_id: String,
    pub title: String,
    pub generated_at: String,
    pub entries: Vec<ReportEntry>,
    /// Video ids whose local audio was deleted during the run
    pub removed: Vec<String>,
}

/// State of a single remote entry after reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub video_id: String,
    pub title: String,
    pub pub_date: String,
    /// Whether a local audio file was found
    pub present: bool,
    pub byte_length: u64,
    pub duration_seconds: u64,
    pub duration: String,
}

impl ReportEntry {
    fn from_entry(entry: &ReconciledEntry) -> Self {
        Self {
            video_id: entry.video_id().to_string(),
            title: entry.entry.title.clone(),
            pub_date: entry.pub_date.clone(),
            present: entry.artifact.is_some(),
            byte_length: entry.byte_length(),
            duration_seconds: entry.duration_seconds,
            duration: entry.duration(),
        }
    }
}

impl ReconcileReport {
    pub fn from_reconciliation(reconciliation: &Reconciliation, channel: &RemoteChannel) -> Self {
        Self {
            channel_id: channel.channel_id.clone(),
            title: channel.title.clone(),
            generated_at: Utc::now().to_rfc3339(),
            entries: reconciliation
                .entries
                .iter()
                .map(ReportEntry::from_entry)
                .collect(),
            removed: reconciliation.removed.iter().cloned().collect(),
        }
    }
}

/// Write the reconciliation report as pretty-printed JSON
pub fn write_report(
    reconciliation: &Reconciliation,
    channel: &RemoteChannel,
    path: &Path,
) -> Result<(), ReportError> {
    let report = ReconcileReport::from_reconciliation(reconciliation, channel);

    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(path, json).map_err(|e| ReportError::WriteFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read a report written by an earlier run
pub fn read_report(path: &Path) -> Result<ReconcileReport, ReportError> {
    let content = std::fs::read_to_string(path).map_err(|e| ReportError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json::from_str(&content).map_err(|e| ReportError::JsonParseFailed {
        path: path.to_path_buf(),
        source: e,
    })
}
