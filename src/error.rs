// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while interpreting the channel URL given on the command line
#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("{0} does not contain a youtube channel url")]
    InvalidUrl(String),

    #[error("Invalid podcast name '{0}': must be a single non-empty path component")]
    InvalidName(String),

    #[error("Invalid {what} URL '{value}': {source}")]
    InvalidBaseUrl {
        what: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
}

/// Errors that can occur when fetching or parsing the channel metadata feed
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Failed to fetch feed from {url}: {source}")]
    FetchFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to parse channel feed: {0}")]
    ParseFailed(#[from] quick_xml::DeError),

    #[error("Failed to parse date '{date_str}': {source}")]
    InvalidDate {
        date_str: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Errors that can occur when scanning or pruning the audio directory
#[derive(Error, Debug)]
pub enum StateError {
    #[error("Failed to read directory {path}: {source}")]
    ReadDirectoryFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory {path}: {source}")]
    CreateDirectoryFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove {path}: {source}")]
    RemoveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while probing the duration of an audio file
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Failed to run {program}: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {} for {path}", exit_code_label(.code))]
    Failed {
        program: String,
        path: PathBuf,
        code: Option<i32>,
    },

    #[error("Unparsable duration '{output}' for {path}")]
    InvalidOutput { path: PathBuf, output: String },
}

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

/// Errors that can occur when rendering or writing the output documents
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Required field '{field}' is missing for {subject}")]
    MissingField {
        field: &'static str,
        subject: String,
    },

    #[error("Failed to serialize podcast feed: {0}")]
    Rss(#[from] rss::Error),

    #[error("Failed to serialize subscription list: {0}")]
    Opml(#[from] opml::Error),

    #[error("Rendered document is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("Failed to write document {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur when writing or reading the reconciliation report
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write report file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read report file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse report file {path}: {source}")]
    JsonParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Top-level errors for a cast run
#[derive(Error, Debug)]
pub enum CastError {
    #[error("Argument error: {0}")]
    Channel(#[from] ChannelError),

    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("State error: {0}")]
    State(#[from] StateError),

    #[error("Probe error: {0}")]
    Probe(#[from] ProbeError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}
