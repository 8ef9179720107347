//! Work the controller hands off the UI thread.

use std::path::PathBuf;

/// One asynchronous avatar file read. `generation` identifies the request so
/// only the latest completion is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarReadRequest {
    pub generation: u64,
    pub path: PathBuf,
}

/// Starts avatar reads; completions arrive later as
/// [`UiEvent::AvatarLoaded`](crate::controller::events::UiEvent::AvatarLoaded)
/// or `AvatarLoadFailed`.
pub trait AvatarReader {
    /// Queues a read of `path` and returns its generation. Generations grow
    /// monotonically for the reader's lifetime.
    fn request(&self, path: PathBuf) -> u64;
}
