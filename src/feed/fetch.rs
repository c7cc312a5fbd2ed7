// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use bytes::Bytes;

use crate::error::FeedError;
use crate::http::HttpClient;

use super::parse::{RemoteChannel, parse_channel};
use super::source::ChannelSource;

/// Fetch raw feed bytes from a URL (without parsing)
///
/// Anything other than `200 OK` is treated as a failed fetch.
pub async fn fetch_feed_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Bytes, FeedError> {
    let response = client
        .get(url)
        .await
        .map_err(|e| FeedError::FetchFailed {
            url: url.to_string(),
            source: e,
        })?;

    if response.status != 200 {
        return Err(FeedError::HttpStatus {
            url: url.to_string(),
            status: response.status,
        });
    }

    Ok(response.body)
}

/// Fetch and parse the metadata feed of a channel
pub async fn fetch_channel<C: HttpClient>(
    client: &C,
    source: &ChannelSource,
) -> Result<RemoteChannel, FeedError> {
    let bytes = fetch_feed_bytes(client, &source.feed_url()).await?;
    parse_channel(&bytes)
}
