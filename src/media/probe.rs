// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;

use crate::error::ProbeError;
use crate::process::CommandRunner;

/// How to invoke the external duration prober
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    pub program: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            program: "ffprobe".to_string(),
        }
    }
}

/// Arguments asking the prober for the first audio stream's duration only,
/// printed as bare seconds on stdout
pub fn probe_args(path: &Path) -> Vec<String> {
    [
        "-v",
        "quiet",
        "-of",
        "default=nokey=1:noprint_wrappers=1",
        "-select_streams",
        "a:0",
        "-show_entries",
        "stream=duration",
    ]
    .into_iter()
    .map(String::from)
    .chain(std::iter::once(path.to_string_lossy().into_owned()))
    .collect()
}

/// Probe an audio file and return its duration rounded to whole seconds
pub async fn probe_duration<R: CommandRunner + ?Sized>(
    runner: &R,
    config: &ProbeConfig,
    path: &Path,
) -> Result<u64, ProbeError> {
    let output = runner
        .capture(&config.program, &probe_args(path))
        .await
        .map_err(|e| ProbeError::SpawnFailed {
            program: config.program.clone(),
            source: e,
        })?;

    if !output.exit.success {
        return Err(ProbeError::Failed {
            program: config.program.clone(),
            path: path.to_path_buf(),
            code: output.exit.code,
        });
    }

    parse_probe_output(path, &output.stdout)
}

/// Parse the prober's stdout: fractional seconds on the first line
pub fn parse_probe_output(path: &Path, stdout: &[u8]) -> Result<u64, ProbeError> {
    let text = String::from_utf8_lossy(stdout);
    let first_line = text.lines().next().unwrap_or("").trim();

    first_line
        .parse::<f64>()
        .ok()
        .and_then(round_seconds)
        .ok_or_else(|| ProbeError::InvalidOutput {
            path: path.to_path_buf(),
            output: first_line.to_string(),
        })
}

/// Round to the nearest whole second, halves away from zero
fn round_seconds(seconds: f64) -> Option<u64> {
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    Some(seconds.round() as u64)
}

/// Format seconds as `HH:MM:SS`
///
/// Hours are not wrapped at 24, so a 25 hour stream renders as `25:00:00`.
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds / 60) % 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{CapturedOutput, ExitInfo};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct CannedProbe {
        exit: ExitInfo,
        stdout: &'static str,
        calls: Mutex<Vec<(String, Vec<String>)>>,
    }

    impl CannedProbe {
        fn new(success: bool, stdout: &'static str) -> Self {
            Self {
                exit: ExitInfo {
                    success,
                    code: Some(if success { 0 } else { 1 }),
                },
                stdout,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CommandRunner for CannedProbe {
        async fn run(&self, _program: &str, _args: &[String]) -> std::io::Result<ExitInfo> {
            unreachable!("the prober never runs with inherited output")
        }

        async fn capture(&self, program: &str, args: &[String]) -> std::io::Result<CapturedOutput> {
            self.calls
                .lock()
                .unwrap()
                .push((program.to_string(), args.to_vec()));
            Ok(CapturedOutput {
                exit: self.exit,
                stdout: self.stdout.as_bytes().to_vec(),
            })
        }
    }

    // === Formatting tests ===

    #[test]
    fn format_pads_components() {
        assert_eq!(format_duration(0), "00:00:00");
        assert_eq!(format_duration(59), "00:00:59");
        assert_eq!(format_duration(61), "00:01:01");
    }

    #[test]
    fn format_rounded_probe_value() {
        let seconds = round_seconds(3661.4).unwrap();
        assert_eq!(seconds, 3661);
        assert_eq!(format_duration(round_seconds(3661.5).unwrap()), "01:01:02");
    }

    #[test]
    fn format_does_not_wrap_at_a_day() {
        assert_eq!(format_duration(90000), "25:00:00");
        assert_eq!(format_duration(100 * 3600 + 5), "100:00:05");
    }

    // === Parsing tests ===

    #[test]
    fn parse_uses_first_line() {
        let path = Path::new("a.m4a");
        assert_eq!(parse_probe_output(path, b"212.810000\n").unwrap(), 213);
        assert_eq!(parse_probe_output(path, b"12.2\n99\n").unwrap(), 12);
    }

    #[test]
    fn parse_rejects_non_numeric_output() {
        let path = Path::new("a.m4a");
        for output in [&b"N/A\n"[..], b"", b"\n12.0", b"-4.0", b"NaN", b"inf"] {
            match parse_probe_output(path, output) {
                Err(ProbeError::InvalidOutput { path: p, .. }) => assert_eq!(p, path),
                other => panic!("Expected InvalidOutput for {output:?}, got {other:?}"),
            }
        }
    }

    // === Invocation tests ===

    #[tokio::test]
    async fn probe_passes_file_as_last_argument() {
        let runner = CannedProbe::new(true, "1.0\n");
        let config = ProbeConfig::default();

        probe_duration(&runner, &config, Path::new("audio/show/abc.m4a"))
            .await
            .unwrap();

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "ffprobe");
        assert_eq!(calls[0].1.last().map(String::as_str), Some("audio/show/abc.m4a"));
        assert!(calls[0].1.contains(&"stream=duration".to_string()));
    }

    #[tokio::test]
    async fn probe_fails_on_non_zero_exit() {
        let runner = CannedProbe::new(false, "3.0\n");

        let result = probe_duration(&runner, &ProbeConfig::default(), Path::new("x.m4a")).await;
        match result {
            Err(ProbeError::Failed { code, .. }) => assert_eq!(code, Some(1)),
            other => panic!("Expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn probe_rounds_output() {
        let runner = CannedProbe::new(true, "3661.4\n");

        let seconds = probe_duration(&runner, &ProbeConfig::default(), Path::new("x.m4a"))
            .await
            .unwrap();
        assert_eq!(seconds, 3661);
    }
}
