// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod fetch;
mod parse;
mod source;

pub use fetch::{fetch_channel, fetch_feed_bytes};
pub use parse::{
    FEED_DATE_FORMAT, RemoteChannel, RemoteEntry, format_feed_date, normalize_date, parse_channel,
};
pub use source::{ChannelSource, validate_url};
