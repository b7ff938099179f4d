// Asset filesystems. `factory::create_filesystem` picks one according to the
// selected feature.

pub mod disk;
pub mod embed;

use crate::traits::FileReader;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, ReadBuf};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Strips `root` from `path`. Returns `None` when `path` is not inside it.
pub(crate) fn strip_mount_root<'a>(root: &str, path: &'a str) -> Option<&'a str> {
    let root = root.trim_end_matches('/');
    let rest = path.strip_prefix(root)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

/// Caps the number of files open at the same time.
#[derive(Debug, Clone)]
pub(crate) struct OpenLimiter {
    slots: Arc<Semaphore>,
}

impl OpenLimiter {
    pub(crate) fn new(max_files: usize) -> Self {
        Self {
            slots: Arc::new(Semaphore::new(max_files.max(1))),
        }
    }

    /// Waits for a free slot; the slot is released when the reader is dropped.
    pub(crate) async fn wrap(&self, inner: FileReader) -> crate::Result<FileReader> {
        let permit = self
            .slots
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| crate::Error::Mount(e.to_string()))?;
        Ok(Box::new(LimitedReader {
            inner,
            _permit: permit,
        }))
    }

    #[cfg(test)]
    pub(crate) fn available(&self) -> usize {
        self.slots.available_permits()
    }
}

struct LimitedReader {
    inner: FileReader,
    _permit: OwnedSemaphorePermit,
}

impl AsyncRead for LimitedReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}
