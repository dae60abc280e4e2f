//! Texture upload seam
//!
//! Prepare hands pixel data of every image to a [`TextureSink`]. A renderer
//! implements the sink over its graphics API; [`HeadlessTextures`] is enough
//! for tools and tests that only need handles.

use crate::resources::image::ColorMode;

/// Opaque handle to an uploaded texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Pixels ready for upload
#[derive(Debug, Clone, Copy)]
pub struct TextureUpload<'a> {
    pub width: u32,
    pub height: u32,
    pub mode: ColorMode,
    pub pixels: &'a [u8],
    /// Palette bytes for paletted modes, empty otherwise
    pub palette: &'a [u8],
}

/// Receiver of image uploads during prepare
pub trait TextureSink {
    fn upload(&mut self, upload: &TextureUpload<'_>) -> TextureHandle;

    /// Called before an image replaces its previous texture
    fn release(&mut self, handle: TextureHandle);
}

/// Sink that hands out sequential handles and keeps no pixel data
#[derive(Debug, Default)]
pub struct HeadlessTextures {
    next: u64,
    live: usize,
    uploaded_bytes: usize,
}

impl HeadlessTextures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Textures uploaded and not yet released
    pub fn live(&self) -> usize {
        self.live
    }

    /// Total pixel bytes seen
    pub fn uploaded_bytes(&self) -> usize {
        self.uploaded_bytes
    }
}

impl TextureSink for HeadlessTextures {
    fn upload(&mut self, upload: &TextureUpload<'_>) -> TextureHandle {
        self.next += 1;
        self.live += 1;
        self.uploaded_bytes += upload.pixels.len();
        TextureHandle(self.next)
    }

    fn release(&mut self, _handle: TextureHandle) {
        self.live = self.live.saturating_sub(1);
    }
}
