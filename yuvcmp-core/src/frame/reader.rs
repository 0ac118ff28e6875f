// ============================================================================
// yuvcmp-core/src/frame/reader.rs
// ============================================================================
//
// FRAME STREAM READER: Sequential access to raw I420 files
//
// A stream is validated once, up front: its byte length must be an exact
// multiple of the frame size. After that, frames are read one at a time into
// a single reused buffer. A short or zero read simply ends the stream.

use super::{FrameGeometry, PlanarFrame};
use crate::error::{CoreError, CoreResult};

use log::{debug, warn};
use std::fs::{self, File};
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Returns the size of `path` in bytes, mapping a missing file to
/// [`CoreError::InputNotFound`].
pub fn stream_size(path: &Path) -> CoreResult<u64> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(metadata.len()),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(CoreError::InputNotFound(path.to_path_buf())),
        Err(e) => Err(e.into()),
    }
}

/// Checks that `path` holds a whole number of frames and returns that number.
pub fn validate_stream(path: &Path, geometry: FrameGeometry) -> CoreResult<u64> {
    let file_size = stream_size(path)?;
    let frame_size = geometry.frame_size();

    if file_size % frame_size as u64 != 0 {
        return Err(CoreError::TruncatedStream {
            path: path.to_path_buf(),
            file_size,
            frame_size,
        });
    }

    Ok(file_size / frame_size as u64)
}

/// Checks two streams for the equal length required by frame-by-frame pairing.
pub fn ensure_same_size(path_a: &Path, path_b: &Path) -> CoreResult<()> {
    let size_a = stream_size(path_a)?;
    let size_b = stream_size(path_b)?;
    if size_a != size_b {
        return Err(CoreError::StreamSizeMismatch {
            path_a: path_a.to_path_buf(),
            size_a,
            path_b: path_b.to_path_buf(),
            size_b,
        });
    }
    Ok(())
}

/// Sequential reader over a validated I420 file.
///
/// The file handle lives exactly as long as the reader.
#[derive(Debug)]
pub struct FrameReader {
    path: PathBuf,
    file: File,
    frame: PlanarFrame,
    frame_count: u64,
    position: u64,
}

impl FrameReader {
    /// Validates and opens `path` for reading frames of `geometry`.
    pub fn open(path: impl AsRef<Path>, geometry: FrameGeometry) -> CoreResult<Self> {
        let path = path.as_ref();
        let frame_count = validate_stream(path, geometry)?;
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => CoreError::InputNotFound(path.to_path_buf()),
            _ => CoreError::Io(e),
        })?;

        debug!(
            "Opened {} ({} frames of {} bytes at {})",
            path.display(),
            frame_count,
            geometry.frame_size(),
            geometry
        );

        Ok(Self {
            path: path.to_path_buf(),
            file,
            frame: PlanarFrame::new(geometry),
            frame_count,
            position: 0,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn geometry(&self) -> FrameGeometry {
        self.frame.geometry()
    }

    /// Number of whole frames in the file.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Index of the frame the next call to [`FrameReader::next_frame`] returns.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Reads the next frame into the internal buffer.
    ///
    /// Returns `Ok(None)` once the stream ends.
    pub fn next_frame(&mut self) -> CoreResult<Option<&PlanarFrame>> {
        let buffer = self.frame.as_bytes_mut();
        let mut filled = 0;

        while filled < buffer.len() {
            match self.file.read(&mut buffer[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        if filled < buffer.len() {
            if filled > 0 {
                warn!(
                    "{}: partial frame of {} bytes at frame {}, ending stream",
                    self.path.display(),
                    filled,
                    self.position
                );
            }
            return Ok(None);
        }

        self.position += 1;
        Ok(Some(&self.frame))
    }

    /// Skips up to `count` frames and returns how many were skipped.
    pub fn skip_frames(&mut self, count: u64) -> CoreResult<u64> {
        let remaining = self.frame_count.saturating_sub(self.position);
        let skipped = count.min(remaining);
        if skipped > 0 {
            let bytes = skipped * self.geometry().frame_size() as u64;
            self.file.seek(SeekFrom::Current(bytes as i64))?;
            self.position += skipped;
        }
        debug!("{}: skipped {} frame(s)", self.path.display(), skipped);
        Ok(skipped)
    }

    /// Returns to the first frame.
    pub fn rewind(&mut self) -> CoreResult<()> {
        self.file.seek(SeekFrom::Start(0))?;
        self.position = 0;
        Ok(())
    }
}
