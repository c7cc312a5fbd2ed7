// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod download;
mod probe;

pub use download::{DownloadOutcome, DownloaderConfig, downloader_args, run_downloader};
pub use probe::{ProbeConfig, format_duration, parse_probe_output, probe_args, probe_duration};
