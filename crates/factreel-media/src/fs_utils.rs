//! Filesystem utilities for durable artifact writes.
//!
//! Every artifact is flushed to disk (`sync_all`) before the writer returns,
//! so a later stage failing cannot leave a half-written file behind.

use std::path::Path;

use tokio::fs::{self, File};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

use crate::error::{MediaError, MediaResult};

/// Create `dir` and its parents if missing.
pub async fn ensure_dir(dir: impl AsRef<Path>) -> MediaResult<()> {
    let dir = dir.as_ref();
    if !dir.as_os_str().is_empty() && !dir.exists() {
        fs::create_dir_all(dir)
            .await
            .map_err(|e| MediaError::write_failed(dir, e))?;
    }
    Ok(())
}

/// Write `data` to `path`, replacing any existing file, and sync it.
pub async fn write_synced(path: impl AsRef<Path>, data: &[u8]) -> MediaResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        ensure_dir(parent).await?;
    }

    let mut file = File::create(path)
        .await
        .map_err(|e| MediaError::write_failed(path, e))?;
    file.write_all(data)
        .await
        .map_err(|e| MediaError::write_failed(path, e))?;
    file.sync_all()
        .await
        .map_err(|e| MediaError::write_failed(path, e))?;

    Ok(())
}

const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// Copy `reader` into `path` until EOF, then sync. Returns the byte count.
///
/// Read errors surface as [`MediaError::SourceFailed`]; create, write and
/// sync errors as [`MediaError::WriteFailed`].
pub async fn stream_to_file<R>(reader: &mut R, path: impl AsRef<Path>) -> MediaResult<u64>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        ensure_dir(parent).await?;
    }

    let mut file = File::create(path)
        .await
        .map_err(|e| MediaError::write_failed(path, e))?;
    let mut buf = vec![0u8; STREAM_CHUNK_SIZE];
    let mut written = 0u64;
    loop {
        let n = reader.read(&mut buf).await.map_err(MediaError::SourceFailed)?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n])
            .await
            .map_err(|e| MediaError::write_failed(path, e))?;
        written += n as u64;
    }
    file.sync_all()
        .await
        .map_err(|e| MediaError::write_failed(path, e))?;

    tracing::debug!("Wrote {} bytes to {}", written, path.display());
    Ok(written)
}
