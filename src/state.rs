// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::StateError;

/// An audio file present in the local audio directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalArtifact {
    /// File stem, which is the video id the downloader named it after
    pub video_id: String,
    pub path: PathBuf,
    pub byte_length: u64,
}

/// Immutable view of the audio directory taken once per run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSnapshot {
    pub audio_dir: PathBuf,
    pub artifacts: BTreeMap<String, LocalArtifact>,
}

impl ArtifactSnapshot {
    pub fn get(&self, video_id: &str) -> Option<&LocalArtifact> {
        self.artifacts.get(video_id)
    }

    /// Where the audio file for a video id lives (or would live)
    pub fn path_for(&self, video_id: &str, audio_extension: &str) -> PathBuf {
        self.audio_dir.join(format!("{video_id}.{audio_extension}"))
    }
}

/// Scan the audio directory for files with the given extension
///
/// A missing directory is created and yields an empty snapshot.
pub fn scan_artifacts(audio_dir: &Path, audio_extension: &str) -> Result<ArtifactSnapshot, StateError> {
    let mut artifacts = BTreeMap::new();

    if !audio_dir.exists() {
        std::fs::create_dir_all(audio_dir).map_err(|e| StateError::CreateDirectoryFailed {
            path: audio_dir.to_path_buf(),
            source: e,
        })?;

        return Ok(ArtifactSnapshot {
            audio_dir: audio_dir.to_path_buf(),
            artifacts,
        });
    }

    let entries = std::fs::read_dir(audio_dir).map_err(|e| StateError::ReadDirectoryFailed {
        path: audio_dir.to_path_buf(),
        source: e,
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| StateError::ReadDirectoryFailed {
            path: audio_dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();

        // Extension match is exact, `.M4A` or `.m4a.part` are not artifacts
        if path.extension().and_then(|ext| ext.to_str()) != Some(audio_extension) {
            continue;
        }

        let Some(video_id) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        if video_id.is_empty() {
            continue;
        }

        let metadata = std::fs::metadata(&path).map_err(|e| StateError::ReadDirectoryFailed {
            path: path.clone(),
            source: e,
        })?;
        if !metadata.is_file() {
            continue;
        }

        artifacts.insert(
            video_id.to_string(),
            LocalArtifact {
                video_id: video_id.to_string(),
                path: path.clone(),
                byte_length: metadata.len(),
            },
        );
    }

    Ok(ArtifactSnapshot {
        audio_dir: audio_dir.to_path_buf(),
        artifacts,
    })
}

/// Delete an artifact from storage
pub fn remove_artifact(artifact: &LocalArtifact) -> Result<(), StateError> {
    std::fs::remove_file(&artifact.path).map_err(|e| StateError::RemoveFailed {
        path: artifact.path.clone(),
        source: e,
    })
}
