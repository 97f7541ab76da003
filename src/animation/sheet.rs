//! Sheet slicing.
//!
//! A `W×H` sheet with fixed `fw×fh` frames holds `floor(W/fw)` columns and
//! `floor(H/fh)` rows. Frames are numbered row-major from the top-left, and
//! the rectangles are computed once when the sheet is sliced.

use serde::{Deserialize, Serialize};

use crate::resources::texturestore::TextureHandle;

/// Pixel rectangle of one frame inside its sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSheet {
    texture: TextureHandle,
    cols: u32,
    rows: u32,
    frames: Vec<FrameRect>,
}

impl SpriteSheet {
    /// Partition a `sheet_width × sheet_height` texture into frames.
    ///
    /// Leftover pixels on the right and bottom edges are ignored. A zero
    /// frame dimension yields an empty sheet.
    pub fn slice(
        texture: TextureHandle,
        sheet_width: u32,
        sheet_height: u32,
        frame_width: u32,
        frame_height: u32,
    ) -> Self {
        let (cols, rows) = grid_size(sheet_width, sheet_height, frame_width, frame_height);
        let mut frames = Vec::with_capacity((cols * rows) as usize);
        for row in 0..rows {
            for col in 0..cols {
                frames.push(FrameRect {
                    x: col * frame_width,
                    y: row * frame_height,
                    width: frame_width,
                    height: frame_height,
                });
            }
        }
        Self {
            texture,
            cols,
            rows,
            frames,
        }
    }

    pub fn texture(&self) -> TextureHandle {
        self.texture
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame(&self, index: usize) -> Option<FrameRect> {
        self.frames.get(index).copied()
    }

    /// The requested frame, or frame 0 when the index is out of range.
    pub fn frame_or_first(&self, index: usize) -> Option<FrameRect> {
        self.frame(index).or_else(|| self.frame(0))
    }
}

/// `(cols, rows)` of a sheet; zero when a frame dimension is zero.
pub fn grid_size(sheet_width: u32, sheet_height: u32, frame_width: u32, frame_height: u32) -> (u32, u32) {
    if frame_width == 0 || frame_height == 0 {
        return (0, 0);
    }
    (sheet_width / frame_width, sheet_height / frame_height)
}
