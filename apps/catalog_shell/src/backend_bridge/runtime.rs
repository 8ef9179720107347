//! Runs avatar file reads on a tokio runtime and posts completions back to
//! the UI loop.

use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use crossbeam_channel::Sender;
use tokio::runtime::{Builder, Handle, Runtime};
use tracing::{debug, warn};

use crate::backend_bridge::commands::{AvatarReadRequest, AvatarReader};
use crate::controller::events::UiEvent;

pub fn build_runtime() -> Result<Runtime> {
    Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("catalog-io")
        .enable_all()
        .build()
        .context("failed to build background runtime")
}

pub struct TokioAvatarReader {
    handle: Handle,
    ui_tx: Sender<UiEvent>,
    generation: AtomicU64,
}

impl TokioAvatarReader {
    pub fn new(handle: Handle, ui_tx: Sender<UiEvent>) -> Self {
        Self {
            handle,
            ui_tx,
            generation: AtomicU64::new(0),
        }
    }
}

impl AvatarReader for TokioAvatarReader {
    fn request(&self, path: PathBuf) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let request = AvatarReadRequest { generation, path };
        let ui_tx = self.ui_tx.clone();
        self.handle.spawn(async move {
            let event = match read_data_url(&request.path).await {
                Ok(data_url) => UiEvent::AvatarLoaded {
                    generation: request.generation,
                    data_url,
                },
                Err(err) => UiEvent::AvatarLoadFailed {
                    generation: request.generation,
                    reason: format!("{err:#}"),
                },
            };
            if ui_tx.send(event).is_err() {
                warn!(generation = request.generation, "ui loop gone; dropping avatar read result");
            }
        });
        debug!(generation, "queued avatar read");
        generation
    }
}

pub async fn read_data_url(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    Ok(encode_data_url(path, &bytes))
}

/// `data:<mime>;base64,<payload>` with the mime type guessed from the
/// file extension.
pub fn encode_data_url(path: &Path, bytes: &[u8]) -> String {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    format!("data:{};base64,{}", mime.essence_str(), STANDARD.encode(bytes))
}
