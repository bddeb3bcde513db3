//! Frame decoding and PNG persistence.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use factreel_models::{frame_path, FrameBatch, ImageSourceFormat};
use image::{DynamicImage, ImageFormat, ImageOutputFormat};
use metrics::counter;
use tracing::{debug, info};

use crate::error::{MediaError, MediaResult};
use crate::fs_utils::{ensure_dir, write_synced};

/// A frame written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedFrame {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Encoding the payload arrived in
    pub source_format: ImageSourceFormat,
}

/// PNG bytes produced from a decoded payload.
#[derive(Debug)]
pub struct TranscodedFrame {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub source_format: ImageSourceFormat,
}

fn resolve_format(bytes: &[u8], hint: ImageSourceFormat) -> MediaResult<ImageSourceFormat> {
    match hint {
        ImageSourceFormat::Png | ImageSourceFormat::WebP => Ok(hint),
        ImageSourceFormat::Auto => match image::guess_format(bytes) {
            Ok(ImageFormat::Png) => Ok(ImageSourceFormat::Png),
            Ok(ImageFormat::WebP) => Ok(ImageSourceFormat::WebP),
            Ok(other) => Err(MediaError::UnsupportedFormat(format!("{:?}", other))),
            Err(_) => Err(MediaError::malformed_payload(
                "payload is not a recognizable image",
            )),
        },
    }
}

fn decode_image(bytes: &[u8], format: ImageSourceFormat) -> MediaResult<DynamicImage> {
    let image_format = match format {
        ImageSourceFormat::WebP => ImageFormat::WebP,
        _ => ImageFormat::Png,
    };
    image::load_from_memory_with_format(bytes, image_format).map_err(|e| {
        MediaError::malformed_payload(format!("failed to decode {} image: {}", format, e))
    })
}

/// Decode a base64 image payload and re-encode it as PNG.
pub fn transcode_to_png(b64_data: &str, hint: ImageSourceFormat) -> MediaResult<TranscodedFrame> {
    let bytes = STANDARD
        .decode(b64_data.trim())
        .map_err(|e| MediaError::malformed_payload(format!("invalid base64: {}", e)))?;

    let source_format = resolve_format(&bytes, hint)?;
    debug!(
        "Decoding {} byte payload as {} (hint: {})",
        bytes.len(),
        source_format,
        hint
    );

    let decoded = decode_image(&bytes, source_format)?;

    let mut png = Vec::new();
    decoded
        .write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)
        .map_err(|e| MediaError::EncodeFailed(e.to_string()))?;

    Ok(TranscodedFrame {
        png,
        width: decoded.width(),
        height: decoded.height(),
        source_format,
    })
}

/// Decode one payload and write it to `path` as a synced PNG file.
///
/// Decoding and re-encoding run on the blocking thread pool.
pub async fn persist_frame(
    b64_data: &str,
    path: impl AsRef<Path>,
    hint: ImageSourceFormat,
) -> MediaResult<PersistedFrame> {
    let path = path.as_ref();
    let payload = b64_data.to_owned();
    let frame = tokio::task::spawn_blocking(move || transcode_to_png(&payload, hint))
        .await
        .map_err(|e| MediaError::EncodeFailed(format!("transcode task failed: {}", e)))??;

    write_synced(path, &frame.png).await?;
    counter!("frames_persisted_total", "source_format" => frame.source_format.as_str())
        .increment(1);

    Ok(PersistedFrame {
        path: path.to_path_buf(),
        width: frame.width,
        height: frame.height,
        source_format: frame.source_format,
    })
}

/// Persist every generated frame of `batch` into `dir`, in index order.
///
/// Frame `i` is written to `vid_frame_<i>.png`. The first failure stops the
/// loop; frames written before it stay on disk.
pub async fn persist_frames(
    batch: &FrameBatch,
    dir: impl AsRef<Path>,
    hint: ImageSourceFormat,
) -> MediaResult<Vec<PersistedFrame>> {
    let dir = dir.as_ref();
    ensure_dir(dir).await?;

    let mut persisted = Vec::with_capacity(batch.generated_count());
    for (index, payload) in batch.generated() {
        let path = frame_path(dir, index);
        let frame = persist_frame(&payload.b64_json, &path, hint).await?;
        info!(
            "Persisted frame {} ({}x{}) to {}",
            index,
            frame.width,
            frame.height,
            frame.path.display()
        );
        persisted.push(frame);
    }

    Ok(persisted)
}
