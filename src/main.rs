use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use console::Emoji;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use tubecast::{
    CastOptions, CastRequest, DownloaderConfig, NoopReporter, ProbeConfig, ProcessRunner,
    ProgressEvent, ProgressReporter, ReqwestClient, SharedProgressReporter, cast_channel,
};

// Emoji with fallback for terminals without Unicode support
static TV: Emoji<'_, '_> = Emoji("📺 ", "");
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "[~] ");
static HEADPHONES: Emoji<'_, '_> = Emoji("🎧 ", "[i] ");
static DOWNLOAD: Emoji<'_, '_> = Emoji("📥 ", "[v] ");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "[+] ");
static MISSING: Emoji<'_, '_> = Emoji("⏳ ", "[?] ");
static FAILURE: Emoji<'_, '_> = Emoji("❌ ", "[!] ");
static TRASH: Emoji<'_, '_> = Emoji("🗑️  ", "[-] ");
static PARTY: Emoji<'_, '_> = Emoji("🎉 ", "[*] ");
static DOCUMENT: Emoji<'_, '_> = Emoji("📄 ", "");

/// Turn a YouTube channel into a self-hosted audio podcast
#[derive(Parser, Debug)]
#[command(name = "tubecast")]
#[command(about = "Turn a YouTube channel into a self-hosted audio podcast")]
#[command(version)]
struct Args {
    /// Channel URL, https://www.youtube.com/channel/<id>
    channel_url: String,

    /// Podcast name, used for the documents and the audio directory
    name: String,

    /// Public URL the output directory is served under
    base_url: String,

    /// Podcast artwork URL
    artwork_url: Option<String>,

    /// Directory receiving the documents and the audio files
    #[arg(short, long, env = "TUBECAST_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Downloader executable
    #[arg(long, env = "TUBECAST_DOWNLOADER", default_value = "yt-dlp")]
    downloader: String,

    /// Duration prober executable
    #[arg(long, env = "TUBECAST_PROBER", default_value = "ffprobe")]
    prober: String,

    /// Format selector passed to the downloader
    #[arg(short, long, default_value = "140")]
    format: String,

    /// Only reconcile and render what is already downloaded
    #[arg(long)]
    skip_download: bool,

    /// Write a JSON reconciliation report to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Quiet mode - suppress progress output
    #[arg(short, long)]
    quiet: bool,
}

/// Progress reporter using indicatif for terminal output
///
/// The spinner is hidden while the downloader runs, since it writes to the
/// same terminal.
struct ConsoleReporter {
    main_bar: ProgressBar,
}

impl ConsoleReporter {
    fn new() -> Self {
        let main_bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {wide_msg}") {
            main_bar.set_style(style);
        }
        main_bar.enable_steady_tick(std::time::Duration::from_millis(100));

        Self { main_bar }
    }
}

impl ProgressReporter for ConsoleReporter {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::FetchingFeed { url } => {
                self.main_bar
                    .set_message(format!("{SEARCH}Fetching feed: {}", url.cyan()));
            }

            ProgressEvent::FeedParsed {
                channel_title,
                total_entries,
            } => {
                self.main_bar.println(format!(
                    "{HEADPHONES}{} • {} entries",
                    channel_title.bold().green(),
                    total_entries.to_string().cyan()
                ));
            }

            ProgressEvent::DownloaderStarting {
                program,
                channel_url,
                limit,
            } => {
                self.main_bar.println(format!(
                    "{DOWNLOAD}Running {} for the newest {} videos of {}",
                    program.bold(),
                    limit.to_string().cyan(),
                    channel_url.cyan()
                ));
                self.main_bar.set_draw_target(ProgressDrawTarget::hidden());
            }

            ProgressEvent::DownloaderFinished { success, code } => {
                self.main_bar.set_draw_target(ProgressDrawTarget::stderr());
                if !success {
                    let code = code.map_or_else(|| "signal".to_string(), |c| c.to_string());
                    self.main_bar.println(format!(
                        "{FAILURE}{}",
                        format!("Downloader exited with {code}, continuing").yellow()
                    ));
                }
            }

            ProgressEvent::DownloaderUnavailable { program, error } => {
                self.main_bar.set_draw_target(ProgressDrawTarget::stderr());
                self.main_bar.println(format!(
                    "{FAILURE}{} {} - {}",
                    "Could not start".red(),
                    program.red().bold(),
                    error.dimmed()
                ));
            }

            ProgressEvent::ArtifactFound { video_id, .. } => {
                self.main_bar.set_message(format!("Probing {}", video_id.cyan()));
            }

            ProgressEvent::ArtifactMissing { video_id, path } => {
                self.main_bar.println(format!(
                    "  {MISSING}{} {}",
                    video_id.yellow(),
                    format!("not found at {}", path.display()).dimmed()
                ));
            }

            ProgressEvent::DurationProbed { video_id, duration } => {
                self.main_bar
                    .println(format!("  {SUCCESS}{} {}", video_id.green(), duration.dimmed()));
            }

            ProgressEvent::ArtifactPruned { video_id, path } => {
                self.main_bar.println(format!(
                    "  {TRASH}{} {}",
                    video_id.red(),
                    format!("removed {}", path.display()).dimmed()
                ));
            }

            ProgressEvent::DocumentWritten { path } => {
                self.main_bar
                    .println(format!("{DOCUMENT}Wrote {}", path.display().to_string().cyan()));
            }

            ProgressEvent::CastCompleted {
                playable_count,
                missing_count,
                removed_count,
            } => {
                self.main_bar.finish_and_clear();
                println!(
                    "\n{PARTY}{} {} in feed, {} missing, {} removed\n",
                    "Cast complete:".bold().green(),
                    playable_count.to_string().green().bold(),
                    missing_count.to_string().yellow(),
                    removed_count.to_string().red()
                );
            }
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    if !args.quiet {
        println!(
            "\n{}{} {}\n",
            TV,
            "tubecast".bold().magenta(),
            "- YouTube channel to podcast".dimmed()
        );
    }

    let http = reqwest::Client::builder()
        .user_agent(concat!("tubecast/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;
    let client = ReqwestClient::with_client(http);

    let request = CastRequest {
        channel_url: args.channel_url,
        name: args.name,
        base_url: args.base_url,
        image_url: args.artwork_url,
    };

    let options = CastOptions {
        output_dir: args.output_dir,
        downloader: DownloaderConfig {
            program: args.downloader,
            format: args.format,
        },
        probe: ProbeConfig {
            program: args.prober,
        },
        skip_download: args.skip_download,
        report_path: args.report,
        ..Default::default()
    };

    let reporter: SharedProgressReporter = if args.quiet {
        NoopReporter::shared()
    } else {
        Arc::new(ConsoleReporter::new())
    };

    cast_channel(&client, &ProcessRunner, &request, &options, reporter)
        .await
        .context("Failed to cast channel")?;

    Ok(())
}
