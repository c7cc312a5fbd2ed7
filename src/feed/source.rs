// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::error::ChannelError;

static CHANNEL_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://www\.youtube\.com/channel/([\w_-]+)").expect("valid channel url pattern")
});

/// A YouTube channel identified from the URL given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSource {
    id: String,
    url: String,
}

impl ChannelSource {
    /// Extract the channel id from a `https://www.youtube.com/channel/<id>` URL
    pub fn parse(url: &str) -> Result<Self, ChannelError> {
        let caps = CHANNEL_URL
            .captures(url)
            .ok_or_else(|| ChannelError::InvalidUrl(url.to_string()))?;

        Ok(Self {
            id: caps[1].to_string(),
            url: url.to_string(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The channel URL exactly as given; this is what the downloader receives
    pub fn url(&self) -> &str {
        &self.url
    }

    /// URL of the channel's Atom metadata feed
    pub fn feed_url(&self) -> String {
        format!(
            "https://www.youtube.com/feeds/videos.xml?channel_id={}",
            self.id
        )
    }
}

impl fmt::Display for ChannelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Check that a user supplied URL is absolute, returning it without trailing slashes
pub fn validate_url(what: &'static str, value: &str) -> Result<String, ChannelError> {
    Url::parse(value).map_err(|e| ChannelError::InvalidBaseUrl {
        what,
        value: value.to_string(),
        source: e,
    })?;

    Ok(value.trim_end_matches('/').to_string())
}
