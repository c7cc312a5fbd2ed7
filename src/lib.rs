pub mod cast;
pub mod error;
pub mod feed;
pub mod http;
pub mod media;
pub mod process;
pub mod progress;
pub mod reconcile;
pub mod render;
pub mod report;
pub mod state;

#[cfg(test)]
mod testing;

// Re-export main types for convenience
pub use cast::{CastOptions, CastRequest, CastResult, audio_dir, cast_channel};
pub use error::{
    CastError, ChannelError, FeedError, ProbeError, RenderError, ReportError, StateError,
};
pub use feed::{ChannelSource, RemoteChannel, RemoteEntry, fetch_channel, parse_channel};
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use media::{DownloaderConfig, ProbeConfig, format_duration};
pub use process::{CommandRunner, ProcessRunner};
pub use progress::{NoopReporter, ProgressEvent, ProgressReporter, SharedProgressReporter};
pub use reconcile::{ReconcileOptions, ReconciledEntry, Reconciliation, reconcile};
pub use render::{FeedOutput, FeedSettings, render_podcast, render_subscription};
pub use report::{ReconcileReport, read_report, write_report};
