//! Photo Capture
//!
//! Screen captures land in the journal inbox as polaroids. Pixel readback and
//! PNG encoding belong to the renderer; this module validates the request and
//! names the file.

use chrono::{Local, NaiveDateTime};
use thiserror::Error;

/// Capture file name pattern, e.g. `img_20240131_235959.png`
pub const CAPTURE_FILE_FORMAT: &str = "img_%Y%m%d_%H%M%S.png";

#[derive(Debug, Error, PartialEq)]
pub enum CaptureError {
    #[error("capture size must be positive, got {width}x{height}")]
    DegenerateSize { width: i32, height: i32 },
}

/// Screen region to capture, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRequest {
    width: u32,
    height: u32,
}

impl CaptureRequest {
    pub fn new(width: i32, height: i32) -> Result<Self, CaptureError> {
        if width <= 0 || height <= 0 {
            return Err(CaptureError::DegenerateSize { width, height });
        }
        Ok(Self {
            width: width.unsigned_abs(),
            height: height.unsigned_abs(),
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Stamp the request with the local wall clock.
    pub fn take_now(self) -> CapturedPhoto {
        self.take_at(Local::now().naive_local())
    }

    pub fn take_at(self, taken_at: NaiveDateTime) -> CapturedPhoto {
        CapturedPhoto {
            file_name: capture_file_name(taken_at),
            width: self.width,
            height: self.height,
            taken_at,
        }
    }
}

pub fn capture_file_name(taken_at: NaiveDateTime) -> String {
    taken_at.format(CAPTURE_FILE_FORMAT).to_string()
}

/// A capture that has been written out and can be shown in the inbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPhoto {
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub taken_at: NaiveDateTime,
}
