// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeMap;

use rss::extension::itunes::{ITunesChannelExtension, ITunesItemExtension};
use rss::{Category, Channel, Enclosure, Guid, Item};

use crate::error::RenderError;
use crate::reconcile::ReconciledEntry;

use super::{FeedOutput, FeedSettings};

/// Namespace of the `itunes:` duration, image and author fields
pub const ITUNES_NAMESPACE: &str = "http://www.itunes.com/dtds/podcast-1.0.dtd";

const GENERATOR: &str = "tubecast";
const ENCLOSURE_MIME_TYPE: &str = "audio/mp4";

/// Render the RSS 2.0 podcast document
pub fn render_podcast(output: &FeedOutput, settings: &FeedSettings) -> Result<String, RenderError> {
    settings.require()?;

    let channel_data = output.channel;

    let items = output
        .items
        .iter()
        .map(|entry| podcast_item(entry, settings))
        .collect::<Result<Vec<_>, _>>()?;

    let mut itunes = ITunesChannelExtension::default();
    itunes.set_author(channel_data.author_name.clone());
    itunes.set_image(settings.image_url.clone());

    let mut category = Category::default();
    category.set_name("Unknown");

    let mut channel = Channel::default();
    channel.set_namespaces(BTreeMap::from([(
        "itunes".to_string(),
        ITUNES_NAMESPACE.to_string(),
    )]));
    channel.set_title(channel_data.title.clone());
    channel.set_description(channel_data.title.clone());
    channel.set_link(settings.base_url.clone());
    channel.set_categories(vec![category]);
    channel.set_generator(GENERATOR.to_string());
    channel.set_language("en-us".to_string());
    channel.set_last_build_date(settings.build_date.clone());
    channel.set_pub_date(channel_data.published.clone());
    channel.set_itunes_ext(itunes);
    channel.set_items(items);

    let bytes = channel.pretty_write_to(Vec::new(), b' ', 2)?;
    Ok(String::from_utf8(bytes)?)
}

fn podcast_item(entry: &ReconciledEntry, settings: &FeedSettings) -> Result<Item, RenderError> {
    let video_id = entry.video_id();
    if video_id.is_empty() {
        return Err(RenderError::MissingField {
            field: "video id",
            subject: entry.entry.title.clone(),
        });
    }

    let artifact = entry
        .artifact
        .as_ref()
        .ok_or_else(|| RenderError::MissingField {
            field: "enclosure length",
            subject: video_id.to_string(),
        })?;

    // Stable across runs: depends on the video id only
    let mut guid = Guid::default();
    guid.set_value(format!("https://www.youtube.com/v/{video_id}"));
    guid.set_permalink(false);

    let mut enclosure = Enclosure::default();
    enclosure.set_url(settings.enclosure_url(video_id));
    enclosure.set_length(artifact.byte_length.to_string());
    enclosure.set_mime_type(ENCLOSURE_MIME_TYPE);

    let mut itunes = ITunesItemExtension::default();
    itunes.set_duration(entry.duration());
    itunes.set_image(entry.entry.thumbnail_url.clone());

    let mut item = Item::default();
    item.set_guid(guid);
    item.set_title(entry.entry.title.clone());
    item.set_link(format!("https://www.youtube.com/watch?v={video_id}"));
    item.set_pub_date(entry.pub_date.clone());
    item.set_description(entry.entry.description.clone());
    item.set_enclosure(enclosure);
    item.set_itunes_ext(itunes);

    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{RemoteChannel, RemoteEntry};
    use crate::render::tests::settings;
    use crate::state::LocalArtifact;
    use std::path::PathBuf;

    fn channel() -> RemoteChannel {
        RemoteChannel {
            channel_id: "UC1".to_string(),
            title: "Test Channel".to_string(),
            author_name: "Test Author".to_string(),
            published: "Sun, 1 Mar 2015 09:00:00 +0000".to_string(),
            link_url: "https://www.youtube.com/channel/UC1".to_string(),
            entries: ["A", "B", "C"]
                .iter()
                .map(|id| RemoteEntry {
                    video_id: id.to_string(),
                    title: format!("Video {id}"),
                    published: "2024-01-15T10:30:00+00:00".to_string(),
                    description: format!("About <{id}> & more"),
                    thumbnail_url: Some(format!("https://i.ytimg.com/vi/{id}/hqdefault.jpg")),
                })
                .collect(),
        }
    }

    fn reconciled<'a>(channel: &'a RemoteChannel, durations: &[u64]) -> Vec<ReconciledEntry<'a>> {
        channel
            .entries
            .iter()
            .zip(durations)
            .map(|(entry, &duration_seconds)| ReconciledEntry {
                entry,
                pub_date: "Mon, 15 Jan 2024 10:30:00 +0000".to_string(),
                artifact: (duration_seconds > 0).then(|| LocalArtifact {
                    video_id: entry.video_id.clone(),
                    path: PathBuf::from(format!("audio/show/{}.m4a", entry.video_id)),
                    byte_length: 1000 + duration_seconds,
                }),
                duration_seconds,
            })
            .collect()
    }

    fn render(channel: &RemoteChannel, durations: &[u64], settings: &FeedSettings) -> rss::Channel {
        let entries = reconciled(channel, durations);
        let output = FeedOutput::new(channel, &entries);
        let xml = render_podcast(&output, settings).unwrap();
        rss::Channel::read_from(xml.as_bytes()).unwrap()
    }

    #[test]
    fn renders_channel_fields() {
        let channel = channel();
        let mut settings = settings();
        settings.image_url = Some("https://cast.example.com/cover.jpg".to_string());

        let feed = render(&channel, &[10, 20, 30], &settings);

        assert_eq!(feed.title(), "Test Channel");
        assert_eq!(feed.description(), "Test Channel");
        assert_eq!(feed.link(), "https://cast.example.com");
        assert_eq!(feed.generator(), Some("tubecast"));
        assert_eq!(feed.language(), Some("en-us"));
        assert_eq!(feed.pub_date(), Some("Sun, 1 Mar 2015 09:00:00 +0000"));
        assert_eq!(feed.last_build_date(), Some("Tue, 1 Oct 2024 12:00:00 +0000"));
        assert_eq!(feed.categories()[0].name(), "Unknown");

        let itunes = feed.itunes_ext().unwrap();
        assert_eq!(itunes.author(), Some("Test Author"));
        assert_eq!(itunes.image(), Some("https://cast.example.com/cover.jpg"));
    }

    #[test]
    fn omits_artwork_when_not_configured() {
        let channel = channel();
        let feed = render(&channel, &[10, 20, 30], &settings());

        assert_eq!(feed.itunes_ext().and_then(|ext| ext.image()), None);
    }

    #[test]
    fn renders_item_fields() {
        let channel = channel();
        let feed = render(&channel, &[3662, 0, 0], &settings());

        assert_eq!(feed.items().len(), 1);
        let item = &feed.items()[0];

        let guid = item.guid().unwrap();
        assert_eq!(guid.value(), "https://www.youtube.com/v/A");
        assert!(!guid.is_permalink());

        assert_eq!(item.title(), Some("Video A"));
        assert_eq!(item.link(), Some("https://www.youtube.com/watch?v=A"));
        assert_eq!(item.pub_date(), Some("Mon, 15 Jan 2024 10:30:00 +0000"));
        assert_eq!(item.description(), Some("About <A> & more"));

        let enclosure = item.enclosure().unwrap();
        assert_eq!(enclosure.url(), "https://cast.example.com/audio/show/A.m4a");
        assert_eq!(enclosure.length(), "4662");
        assert_eq!(enclosure.mime_type(), "audio/mp4");

        let itunes = item.itunes_ext().unwrap();
        assert_eq!(itunes.duration(), Some("01:01:02"));
        assert_eq!(itunes.image(), Some("https://i.ytimg.com/vi/A/hqdefault.jpg"));
    }

    #[test]
    fn excludes_zero_duration_entries_and_keeps_order() {
        let channel = channel();
        let feed = render(&channel, &[5, 0, 90000], &settings());

        let guids: Vec<_> = feed
            .items()
            .iter()
            .map(|item| item.guid().unwrap().value().to_string())
            .collect();
        assert_eq!(
            guids,
            ["https://www.youtube.com/v/A", "https://www.youtube.com/v/C"]
        );
        assert_eq!(
            feed.items()[1].itunes_ext().unwrap().duration(),
            Some("25:00:00")
        );
    }

    #[test]
    fn declares_itunes_namespace() {
        let channel = channel();
        let feed = render(&channel, &[1, 1, 1], &settings());

        assert_eq!(
            feed.namespaces().get("itunes").map(String::as_str),
            Some(ITUNES_NAMESPACE)
        );
    }

    #[test]
    fn playable_entry_without_artifact_is_a_template_error() {
        let channel = channel();
        let mut entries = reconciled(&channel, &[5, 0, 0]);
        entries[0].artifact = None;
        let output = FeedOutput::new(&channel, &entries);

        match render_podcast(&output, &settings()) {
            Err(RenderError::MissingField { field, subject }) => {
                assert_eq!(field, "enclosure length");
                assert_eq!(subject, "A");
            }
            other => panic!("Expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn empty_base_url_is_a_template_error() {
        let channel = channel();
        let entries = reconciled(&channel, &[5, 0, 0]);
        let output = FeedOutput::new(&channel, &entries);
        let mut settings = settings();
        settings.base_url.clear();

        assert!(matches!(
            render_podcast(&output, &settings),
            Err(RenderError::MissingField { field: "base url", .. })
        ));
    }
}
