// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

/// Exit information of a finished child process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitInfo {
    pub success: bool,
    /// Exit code, `None` when the process was terminated by a signal
    pub code: Option<i32>,
}

impl From<std::process::ExitStatus> for ExitInfo {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            success: status.success(),
            code: status.code(),
        }
    }
}

/// Exit information plus everything the child wrote to stdout
#[derive(Debug, Clone)]
pub struct CapturedOutput {
    pub exit: ExitInfo,
    pub stdout: Vec<u8>,
}

/// Capability for running external programs
///
/// The downloader and the duration prober only ever go through this trait,
/// so tests can substitute canned results for real subprocesses.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a program with stdout/stderr inherited from the current process
    async fn run(&self, program: &str, args: &[String]) -> std::io::Result<ExitInfo>;

    /// Run a program, capturing stdout while stderr stays visible
    async fn capture(&self, program: &str, args: &[String]) -> std::io::Result<CapturedOutput>;
}

/// Runs real subprocesses through tokio
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[String]) -> std::io::Result<ExitInfo> {
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await?;

        Ok(status.into())
    }

    async fn capture(&self, program: &str, args: &[String]) -> std::io::Result<CapturedOutput> {
        // Spawn explicitly: `output()` would also swallow stderr
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;
        let output = child.wait_with_output().await?;

        Ok(CapturedOutput {
            exit: output.status.into(),
            stdout: output.stdout,
        })
    }
}
