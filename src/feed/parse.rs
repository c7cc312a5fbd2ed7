// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};
use serde::Deserialize;

use crate::error::FeedError;

/// Date format used by both output documents (RFC 822 with a numeric offset)
pub const FEED_DATE_FORMAT: &str = "%a, %-d %b %Y %H:%M:%S %z";

/// A parsed channel metadata feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteChannel {
    pub channel_id: String,
    pub title: String,
    pub author_name: String,
    /// Publication date, already in [`FEED_DATE_FORMAT`]
    pub published: String,
    pub link_url: String,
    /// Entries in the order the feed lists them
    pub entries: Vec<RemoteEntry>,
}

/// A single video advertised by the channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    pub video_id: String,
    pub title: String,
    /// Publication timestamp as found in the feed (ISO 8601)
    pub published: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
}

// Wire shape of the channel feed. Element names are matched without their
// namespace prefix, so `yt:videoId` is `videoId` and `media:group` is `group`.

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
    #[serde(rename = "channelId")]
    channel_id: String,
    title: String,
    #[serde(default)]
    author: Option<AtomAuthor>,
    published: String,
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@rel", default)]
    rel: Option<String>,
    #[serde(rename = "@href", default)]
    href: String,
}

#[derive(Debug, Deserialize)]
struct AtomAuthor {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    #[serde(rename = "videoId")]
    video_id: String,
    title: String,
    published: String,
    #[serde(default)]
    group: Option<MediaGroup>,
}

#[derive(Debug, Deserialize)]
struct MediaGroup {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    thumbnail: Option<MediaThumbnail>,
}

#[derive(Debug, Deserialize)]
struct MediaThumbnail {
    #[serde(rename = "@url")]
    url: String,
}

/// Parse channel feed XML bytes into a RemoteChannel
///
/// The channel publication date is normalized to [`FEED_DATE_FORMAT`];
/// entry dates are left untouched and normalized during reconciliation.
pub fn parse_channel(xml_bytes: &[u8]) -> Result<RemoteChannel, FeedError> {
    let feed: AtomFeed = quick_xml::de::from_reader(xml_bytes)?;

    let published = normalize_date(&feed.published)?;

    let link_url = feed
        .links
        .iter()
        .find(|link| link.rel.as_deref() == Some("alternate"))
        .or_else(|| feed.links.first())
        .map(|link| link.href.clone())
        .unwrap_or_default();

    let entries = feed
        .entries
        .into_iter()
        .map(|entry| {
            let (description, thumbnail_url) = match entry.group {
                Some(group) => (
                    group.description.unwrap_or_default(),
                    group.thumbnail.map(|t| t.url).filter(|url| !url.is_empty()),
                ),
                None => (String::new(), None),
            };

            RemoteEntry {
                video_id: entry.video_id,
                title: entry.title,
                published: entry.published,
                description,
                thumbnail_url,
            }
        })
        .collect();

    Ok(RemoteChannel {
        channel_id: feed.channel_id,
        title: feed.title,
        author_name: feed.author.map(|a| a.name).unwrap_or_default(),
        published,
        link_url,
        entries,
    })
}

/// Convert an ISO 8601 timestamp with offset into [`FEED_DATE_FORMAT`]
pub fn normalize_date(date_str: &str) -> Result<String, FeedError> {
    DateTime::parse_from_rfc3339(date_str.trim())
        .map(|dt| format_feed_date(&dt))
        .map_err(|e| FeedError::InvalidDate {
            date_str: date_str.to_string(),
            source: e,
        })
}

/// Format a timestamp the way both output documents expect it
pub fn format_feed_date<Tz>(dt: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    dt.format(FEED_DATE_FORMAT).to_string()
}
