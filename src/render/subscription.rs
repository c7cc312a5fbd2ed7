// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use opml::{Head, OPML, Outline};

use crate::error::RenderError;
use crate::feed::RemoteChannel;

use super::FeedSettings;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Render the OPML 1.0 subscription document pointing at the podcast feed
pub fn render_subscription(channel: &RemoteChannel, settings: &FeedSettings) -> Result<String, RenderError> {
    settings.require()?;

    let mut opml = OPML {
        version: "1.0".to_string(),
        ..Default::default()
    };
    opml.head = Some(Head {
        title: Some(channel.title.clone()),
        ..Default::default()
    });
    opml.body.outlines.push(Outline {
        text: channel.title.clone(),
        r#type: Some("rss".to_string()),
        xml_url: Some(settings.podcast_url()),
        html_url: Some(channel.link_url.clone()),
        title: Some(channel.title.clone()),
        ..Default::default()
    });

    let body = opml.to_string()?;
    Ok(format!("{XML_DECLARATION}\n{body}"))
}
