// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fakes shared by the unit tests of several modules.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::process::{CapturedOutput, CommandRunner, ExitInfo};

/// Command runner that never spawns anything
///
/// `run` plays the downloader: it writes `downloads` through the `-o`
/// template. `capture` plays the prober: it answers with the canned stdout
/// registered for the probed file's stem, or exits 1 when none is registered.
#[derive(Default)]
pub(crate) struct FakeRunner {
    pub(crate) durations: HashMap<String, String>,
    pub(crate) downloads: Vec<(String, Vec<u8>)>,
    pub(crate) runs: Mutex<Vec<Vec<String>>>,
    pub(crate) probes: Mutex<Vec<String>>,
}

impl FakeRunner {
    pub(crate) fn with_durations(durations: &[(&str, &str)]) -> Self {
        Self {
            durations: durations
                .iter()
                .map(|(id, out)| (id.to_string(), out.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    pub(crate) fn probed_ids(&self) -> Vec<String> {
        self.probes.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, _program: &str, args: &[String]) -> std::io::Result<ExitInfo> {
        self.runs.lock().unwrap().push(args.to_vec());

        let template = args
            .iter()
            .position(|arg| arg == "-o")
            .and_then(|i| args.get(i + 1))
            .cloned()
            .unwrap_or_default();
        for (id, bytes) in &self.downloads {
            std::fs::write(template.replace("%(id)s", id), bytes)?;
        }

        Ok(ExitInfo {
            success: true,
            code: Some(0),
        })
    }

    async fn capture(&self, _program: &str, args: &[String]) -> std::io::Result<CapturedOutput> {
        let file = args.last().cloned().unwrap_or_default();
        let id = Path::new(&file)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.probes.lock().unwrap().push(id.clone());

        Ok(match self.durations.get(&id) {
            Some(stdout) => CapturedOutput {
                exit: ExitInfo {
                    success: true,
                    code: Some(0),
                },
                stdout: stdout.clone().into_bytes(),
            },
            None => CapturedOutput {
                exit: ExitInfo {
                    success: false,
                    code: Some(1),
                },
                stdout: Vec::new(),
            },
        })
    }
}

/// A channel feed document listing `(video_id, published)` entries in order
pub(crate) fn channel_feed_xml(entries: &[(&str, &str)]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns:yt="http://www.youtube.com/xml/schemas/2015" xmlns:media="http://search.yahoo.com/mrss/" xmlns="http://www.w3.org/2005/Atom">
 <link rel="self" href="http://www.youtube.com/feeds/videos.xml?channel_id=UCtest"/>
 <id>yt:channel:UCtest</id>
 <yt:channelId>UCtest</yt:channelId>
 <title>Test Channel</title>
 <link rel="alternate" href="https://www.youtube.com/channel/UCtest"/>
 <author>
  <name>Test Author</name>
 </author>
 <published>2015-03-01T09:00:00+00:00</published>
"#,
    );

    for (id, published) in entries {
        xml.push_str(&format!(
            r#" <entry>
  <yt:videoId>{id}</yt:videoId>
  <title>Video {id}</title>
  <published>{published}</published>
  <media:group>
   <media:thumbnail url="https://i.ytimg.com/vi/{id}/hqdefault.jpg" width="480" height="360"/>
   <media:description>About {id}</media:description>
  </media:group>
 </entry>
"#
        ));
    }

    xml.push_str("</feed>\n");
    xml
}
