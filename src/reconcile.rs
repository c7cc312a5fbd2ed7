// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use crate::error::{CastError, FeedError, StateError};
use crate::feed::{RemoteChannel, RemoteEntry, normalize_date};
use crate::media::{ProbeConfig, format_duration, probe_duration};
use crate::process::CommandRunner;
use crate::progress::{ProgressEvent, SharedProgressReporter};
use crate::state::{ArtifactSnapshot, LocalArtifact, remove_artifact, scan_artifacts};

/// Options for reconciling a channel against the audio directory
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Extension of the audio files, without the dot
    pub audio_extension: String,
    pub probe: ProbeConfig,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            audio_extension: "m4a".to_string(),
            probe: ProbeConfig::default(),
        }
    }
}

/// A remote entry matched against the snapshot, before probing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEntry<'a> {
    pub entry: &'a RemoteEntry,
    /// Publication date in the output format
    pub pub_date: String,
    pub artifact: Option<LocalArtifact>,
}

/// Decisions derived from the remote feed and a snapshot, with no side effects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilePlan<'a> {
    /// One planned entry per remote entry, in feed order
    pub entries: Vec<PlannedEntry<'a>>,
    /// Local artifacts no remote entry refers to
    pub orphans: Vec<LocalArtifact>,
}

/// A remote entry enriched with what the local audio file says about it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledEntry<'a> {
    pub entry: &'a RemoteEntry,
    /// Publication date in the output format
    pub pub_date: String,
    pub artifact: Option<LocalArtifact>,
    /// Whole seconds, 0 when there is no local audio
    pub duration_seconds: u64,
}

impl ReconciledEntry<'_> {
    pub fn video_id(&self) -> &str {
        &self.entry.video_id
    }

    pub fn byte_length(&self) -> u64 {
        self.artifact.as_ref().map_or(0, |a| a.byte_length)
    }

    /// Duration formatted as `HH:MM:SS`
    pub fn duration(&self) -> String {
        format_duration(self.duration_seconds)
    }

    /// Whether the entry belongs in the podcast feed
    pub fn is_playable(&self) -> bool {
        self.duration_seconds > 0
    }
}

/// Outcome of a reconciliation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation<'a> {
    /// One entry per remote entry, in feed order, including unplayable ones
    pub entries: Vec<ReconciledEntry<'a>>,
    /// Video ids whose local files were deleted
    pub removed: BTreeSet<String>,
}

impl Reconciliation<'_> {
    pub fn playable_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_playable()).count()
    }

    pub fn missing_count(&self) -> usize {
        self.entries.iter().filter(|e| e.artifact.is_none()).count()
    }
}

/// Match every remote entry with the snapshot and find orphaned artifacts
///
/// Any malformed entry date fails the whole plan: both documents share a
/// single date policy, so a partial plan would be inconsistent.
pub fn plan_reconciliation<'a>(
    channel: &'a RemoteChannel,
    snapshot: &ArtifactSnapshot,
) -> Result<ReconcilePlan<'a>, FeedError> {
    let entries = channel
        .entries
        .iter()
        .map(|entry| {
            Ok(PlannedEntry {
                entry,
                pub_date: normalize_date(&entry.published)?,
                artifact: snapshot.get(&entry.video_id).cloned(),
            })
        })
        .collect::<Result<Vec<_>, FeedError>>()?;

    let remote_ids: HashSet<&str> = channel
        .entries
        .iter()
        .map(|entry| entry.video_id.as_str())
        .collect();

    let orphans = snapshot
        .artifacts
        .values()
        .filter(|artifact| !remote_ids.contains(artifact.video_id.as_str()))
        .cloned()
        .collect();

    Ok(ReconcilePlan { entries, orphans })
}

/// Reconcile a channel with the audio directory
///
/// This:
/// 1. Takes a snapshot of the audio directory
/// 2. Plans the reconciliation against the channel's entries
/// 3. Probes the duration of every present file, in feed order
/// 4. Deletes files that no entry refers to anymore
///
/// A missing file is an expected state and yields a zero duration. Probe and
/// deletion failures abort the run.
pub async fn reconcile<'a, R: CommandRunner + ?Sized>(
    channel: &'a RemoteChannel,
    audio_dir: &Path,
    options: &ReconcileOptions,
    runner: &R,
    reporter: &SharedProgressReporter,
) -> Result<Reconciliation<'a>, CastError> {
    let snapshot = scan_artifacts(audio_dir, &options.audio_extension)?;
    let plan = plan_reconciliation(channel, &snapshot)?;

    let mut entries = Vec::with_capacity(plan.entries.len());

    for planned in plan.entries {
        let video_id = planned.entry.video_id.clone();

        let Some(artifact) = planned.artifact else {
            reporter.report(ProgressEvent::ArtifactMissing {
                path: snapshot.path_for(&video_id, &options.audio_extension),
                video_id,
            });
            entries.push(ReconciledEntry {
                entry: planned.entry,
                pub_date: planned.pub_date,
                artifact: None,
                duration_seconds: 0,
            });
            continue;
        };

        reporter.report(ProgressEvent::ArtifactFound {
            video_id: video_id.clone(),
            path: artifact.path.clone(),
            byte_length: artifact.byte_length,
        });

        let duration_seconds = probe_duration(runner, &options.probe, &artifact.path).await?;

        reporter.report(ProgressEvent::DurationProbed {
            video_id,
            duration: format_duration(duration_seconds),
        });

        entries.push(ReconciledEntry {
            entry: planned.entry,
            pub_date: planned.pub_date,
            artifact: Some(artifact),
            duration_seconds,
        });
    }

    let removed = prune_orphans(plan.orphans, reporter)?;

    Ok(Reconciliation { entries, removed })
}

/// Delete orphaned artifacts, returning their video ids
///
/// Stops at the first failed deletion.
pub fn prune_orphans(
    orphans: Vec<LocalArtifact>,
    reporter: &SharedProgressReporter,
) -> Result<BTreeSet<String>, StateError> {
    let mut removed = BTreeSet::new();

    for artifact in orphans {
        remove_artifact(&artifact)?;
        reporter.report(ProgressEvent::ArtifactPruned {
            video_id: artifact.video_id.clone(),
            path: artifact.path,
        });
        removed.insert(artifact.video_id);
    }

    Ok(removed)
}
