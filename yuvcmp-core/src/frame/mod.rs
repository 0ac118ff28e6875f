//! Planar YUV 4:2:0 frame layout.
//!
//! A raw I420 frame is three contiguous planes: full resolution luma followed
//! by the U and V chroma planes at half horizontal and vertical resolution.
//! [`FrameGeometry`] validates the dimensions once and derives every plane
//! offset from them, so the rest of the crate only ever sees [`PlaneView`]
//! descriptors and borrowed [`Plane`] slices.

pub mod reader;

pub use reader::{FrameReader, ensure_same_size, stream_size, validate_stream};

use crate::error::{CoreError, CoreResult};
use serde::Serialize;
use std::fmt;

/// Identifies one of the three planes of an I420 frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaneKind {
    Y,
    U,
    V,
}

impl PlaneKind {
    pub const ALL: [PlaneKind; 3] = [PlaneKind::Y, PlaneKind::U, PlaneKind::V];
}

impl fmt::Display for PlaneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaneKind::Y => "Y",
            PlaneKind::U => "U",
            PlaneKind::V => "V",
        };
        f.write_str(name)
    }
}

/// Location of one plane inside a frame buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneView {
    pub offset: usize,
    pub stride: usize,
    pub width: usize,
    pub height: usize,
}

impl PlaneView {
    /// Number of samples in the plane.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stride * self.height
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Validated dimensions of an I420 stream.
///
/// Width and height must both be nonzero and even so that the chroma planes
/// cover the luma plane exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameGeometry {
    width: usize,
    height: usize,
}

/// Luma plus two quarter-size chroma planes, `None` when it overflows.
fn i420_frame_size(width: usize, height: usize) -> Option<usize> {
    let luma = width.checked_mul(height)?;
    let chroma = (width / 2).checked_mul(height / 2)?.checked_mul(2)?;
    luma.checked_add(chroma)
}

impl FrameGeometry {
    /// Creates a geometry, rejecting dimensions that cannot describe I420.
    pub fn new(width: usize, height: usize) -> CoreResult<Self> {
        let reason = if width == 0 || height == 0 {
            Some("dimensions must be nonzero")
        } else if width % 2 != 0 || height % 2 != 0 {
            Some("4:2:0 dimensions must be even")
        } else if i420_frame_size(width, height).is_none() {
            Some("frame size overflows")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(CoreError::InvalidGeometry {
                width,
                height,
                reason,
            }),
            None => Ok(Self { width, height }),
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn chroma_width(&self) -> usize {
        self.width / 2
    }

    #[must_use]
    pub fn chroma_height(&self) -> usize {
        self.height / 2
    }

    /// Size in bytes of one complete frame.
    #[must_use]
    pub fn frame_size(&self) -> usize {
        self.width * self.height + 2 * self.chroma_width() * self.chroma_height()
    }

    /// Descriptor for the requested plane.
    #[must_use]
    pub fn plane(&self, kind: PlaneKind) -> PlaneView {
        let luma_len = self.width * self.height;
        let chroma_len = self.chroma_width() * self.chroma_height();
        match kind {
            PlaneKind::Y => PlaneView {
                offset: 0,
                stride: self.width,
                width: self.width,
                height: self.height,
            },
            PlaneKind::U => PlaneView {
                offset: luma_len,
                stride: self.chroma_width(),
                width: self.chroma_width(),
                height: self.chroma_height(),
            },
            PlaneKind::V => PlaneView {
                offset: luma_len + chroma_len,
                stride: self.chroma_width(),
                width: self.chroma_width(),
                height: self.chroma_height(),
            },
        }
    }
}

impl fmt::Display for FrameGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Borrowed, read-only view of a single plane's samples.
#[derive(Debug, Clone, Copy)]
pub struct Plane<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> Plane<'a> {
    /// Wraps a row-major sample buffer of `width * height` bytes.
    ///
    /// Returns `None` when the buffer is too small for the dimensions.
    #[must_use]
    pub fn from_slice(data: &'a [u8], width: usize, height: usize) -> Option<Self> {
        (data.len() >= width * height).then_some(Self {
            data,
            width,
            height,
            stride: width,
        })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Samples of row `y`.
    #[must_use]
    pub fn row(&self, y: usize) -> &'a [u8] {
        let start = y * self.stride;
        &self.data[start..start + self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a [u8]> + use<'a> {
        let plane = *self;
        (0..plane.height).map(move |y| plane.row(y))
    }

    #[must_use]
    pub fn sample(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.stride + x]
    }
}

/// One owned I420 frame buffer.
///
/// The buffer length always equals `geometry.frame_size()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanarFrame {
    geometry: FrameGeometry,
    data: Vec<u8>,
}

impl PlanarFrame {
    /// Allocates a zero-filled frame.
    #[must_use]
    pub fn new(geometry: FrameGeometry) -> Self {
        Self {
            geometry,
            data: vec![0; geometry.frame_size()],
        }
    }

    /// Wraps an existing buffer, which must be exactly one frame long.
    pub fn from_bytes(geometry: FrameGeometry, data: Vec<u8>) -> CoreResult<Self> {
        if data.len() != geometry.frame_size() {
            return Err(CoreError::OperationFailed(format!(
                "frame buffer is {} bytes, {} frames need {}",
                data.len(),
                geometry,
                geometry.frame_size()
            )));
        }
        Ok(Self { geometry, data })
    }

    #[must_use]
    pub fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Read-only view of one plane.
    #[must_use]
    pub fn plane(&self, kind: PlaneKind) -> Plane<'_> {
        let view = self.geometry.plane(kind);
        Plane {
            data: &self.data[view.offset..view.offset + view.len()],
            width: view.width,
            height: view.height,
            stride: view.stride,
        }
    }

    #[must_use]
    pub fn luma(&self) -> Plane<'_> {
        self.plane(PlaneKind::Y)
    }

    /// Mutable samples of one plane, used to build frames in memory.
    pub fn plane_mut(&mut self, kind: PlaneKind) -> &mut [u8] {
        let view = self.geometry.plane(kind);
        &mut self.data[view.offset..view.offset + view.len()]
    }
}
