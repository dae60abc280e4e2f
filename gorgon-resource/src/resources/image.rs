//! Image resource and lazy pixel loading
//!
//! An image chunk carries its properties, an optional palette, the
//! compression used for its pixels and the pixel payload itself. When the
//! props ask for late loading the payload is not read during parsing; only
//! its location is recorded and [`Image::load`] fetches it on demand by
//! reopening the container file.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::ops::ControlFlow;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::codec::{CodecRegistry, DecodeRequest};
use crate::context::{LoadContext, NodeInfo};
use crate::error::{Error, Result};
use crate::gid::Gid;
use crate::guid::Guid;
use crate::reader::ChunkReader;
use crate::resources::Resource;
use crate::texture::{TextureHandle, TextureSink, TextureUpload};
use crate::tree::NodeId;

/// Size of the fixed part of the image props chunk
const PROPS_SIZE: u32 = 16;

/// Pixel layout of an image
///
/// Byte order within a pixel follows the name read from the least
/// significant end: `ARGB` is stored `B, G, R, A`, `ABGR` is `R, G, B, A`.
/// `RGB` and `BGR` are stored in name order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorMode(pub u32);

impl ColorMode {
    pub const RGB: ColorMode = ColorMode(1);
    pub const PALETTED: ColorMode = ColorMode(2);
    pub const GRAY: ColorMode = ColorMode(4);
    pub const ALPHA: ColorMode = ColorMode(8);
    pub const ARGB: ColorMode = ColorMode(9);
    pub const APALETTED: ColorMode = ColorMode(10);
    pub const AGRAY: ColorMode = ColorMode(12);
    pub const BGR: ColorMode = ColorMode(16);
    pub const ABGR: ColorMode = ColorMode(24);

    pub fn bytes_per_pixel(self) -> usize {
        match self {
            ColorMode::PALETTED | ColorMode::GRAY | ColorMode::ALPHA => 1,
            ColorMode::APALETTED | ColorMode::AGRAY => 2,
            ColorMode::RGB | ColorMode::BGR => 3,
            _ => 4,
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            ColorMode::RGB => "rgb",
            ColorMode::PALETTED => "paletted",
            ColorMode::GRAY => "gray",
            ColorMode::ALPHA => "alpha",
            ColorMode::ARGB => "argb",
            ColorMode::APALETTED => "alpha-paletted",
            ColorMode::AGRAY => "alpha-gray",
            ColorMode::BGR => "bgr",
            ColorMode::ABGR => "abgr",
            ColorMode(other) => return write!(f, "mode {other}"),
        };
        f.write_str(name)
    }
}

/// Location of a pixel payload inside the container file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payload {
    pub offset: u64,
    pub len: u32,
    pub compression: Gid,
}

#[derive(Debug)]
pub struct Image {
    width: u32,
    height: u32,
    mode: ColorMode,
    compression: Gid,
    compression_props: Vec<u8>,
    palette: Vec<u8>,
    late: bool,
    strict_size: bool,
    pixels: Option<Vec<u8>>,
    payload: Option<Payload>,
    source: Option<Arc<Path>>,
    codecs: Option<Arc<CodecRegistry>>,
    texture: Option<TextureHandle>,
    /// Keep pixels in memory after the container is discarded
    pub leave_data: bool,
}

impl Image {
    /// An image built in memory rather than parsed
    pub fn from_pixels(width: u32, height: u32, mode: ColorMode, pixels: Vec<u8>) -> Self {
        Self {
            pixels: Some(pixels),
            ..Self::empty(width, height, mode)
        }
    }

    fn empty(width: u32, height: u32, mode: ColorMode) -> Self {
        Self {
            width,
            height,
            mode,
            compression: Gid::NONE,
            compression_props: Vec::new(),
            palette: Vec::new(),
            late: false,
            strict_size: true,
            pixels: None,
            payload: None,
            source: None,
            codecs: None,
            texture: None,
            leave_data: false,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    /// Compression of the stored payload
    pub fn compression(&self) -> Gid {
        self.compression
    }

    pub fn palette(&self) -> &[u8] {
        &self.palette
    }

    /// Whether the props asked for late loading
    pub fn is_late(&self) -> bool {
        self.late
    }

    /// Where the pixel payload lives in the container file
    pub fn payload(&self) -> Option<Payload> {
        self.payload
    }

    pub fn pixels(&self) -> Option<&[u8]> {
        self.pixels.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.pixels.is_some()
    }

    pub fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }

    /// Length in bytes of uncompressed pixel data for the current mode
    pub fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * self.mode.bytes_per_pixel()
    }

    /// Fetch a deferred pixel payload from the container file
    ///
    /// Returns `true` when pixels are in memory afterwards. Failures are
    /// logged and leave the image unloaded.
    pub fn load(&mut self) -> bool {
        if self.is_loaded() {
            return true;
        }
        let (Some(payload), Some(source)) = (self.payload, self.source.clone()) else {
            warn!("Image has no payload location to load from");
            return false;
        };
        match self.fetch(payload, &source) {
            Ok(()) => {
                debug!(path = %source.display(), offset = payload.offset, len = payload.len, "Loaded image payload");
                true
            }
            Err(e) => {
                warn!(path = %source.display(), offset = payload.offset, "Failed to load image payload: {e}");
                false
            }
        }
    }

    fn fetch(&mut self, payload: Payload, source: &Path) -> Result<()> {
        let file = File::open(source)?;
        let mut reader = ChunkReader::new(BufReader::new(file))?;
        reader.skip(payload.offset)?;
        let bytes = reader.read_bytes(payload.len as usize)?;
        self.decode(bytes, payload.compression)
    }

    fn decode(&mut self, bytes: Vec<u8>, compression: Gid) -> Result<()> {
        if compression == Gid::NONE {
            let expected = self.byte_len();
            if bytes.len() != expected {
                if self.strict_size {
                    return Err(Error::ImageSizeMismatch {
                        expected,
                        found: bytes.len(),
                    });
                }
                warn!(expected, found = bytes.len(), "Image data size mismatch");
            }
            self.pixels = Some(bytes);
            return Ok(());
        }

        let fallback;
        let codecs = match &self.codecs {
            Some(codecs) => codecs.as_ref(),
            None => {
                fallback = CodecRegistry::builtin();
                &fallback
            }
        };
        let request = DecodeRequest {
            props: &self.compression_props,
            expected_len: Some(self.byte_len()),
        };
        let decoded = codecs.decode(compression, &bytes, &request)?;
        if let Some(mode) = decoded.mode {
            self.mode = mode;
        }
        if let Some((width, height)) = decoded.dimensions {
            if (width, height) != (self.width, self.height) {
                debug!(width, height, "Decoded dimensions differ from image props");
            }
            self.width = width;
            self.height = height;
        }
        self.pixels = Some(decoded.bytes);
        Ok(())
    }

    pub(crate) fn prepare(&mut self, guid: Guid, sink: &mut dyn TextureSink) -> Result<()> {
        let Some(pixels) = self.pixels.as_deref() else {
            return Err(Error::ImageNotLoaded { guid });
        };
        let upload = TextureUpload {
            width: self.width,
            height: self.height,
            mode: self.mode,
            pixels,
            palette: &self.palette,
        };
        let handle = sink.upload(&upload);
        if let Some(old) = self.texture.replace(handle) {
            sink.release(old);
        }
        Ok(())
    }

    /// Drop pixels of an uploaded image unless `leave_data` is set
    ///
    /// Returns whether pixels were dropped. A discarded image can be
    /// reloaded with [`load`](Self::load) when it came from a file.
    pub fn discard(&mut self) -> bool {
        if self.leave_data || self.texture.is_none() || self.pixels.is_none() {
            return false;
        }
        self.pixels = None;
        true
    }

    /// Pixels converted to 8-bit RGBA, for modes with a direct mapping
    pub fn to_rgba8(&self) -> Option<Vec<u8>> {
        let pixels = self.pixels.as_deref()?;
        if pixels.len() < self.byte_len() {
            return None;
        }
        let stride = self.mode.bytes_per_pixel();
        let convert: fn(&[u8]) -> [u8; 4] = match self.mode {
            ColorMode::ARGB => |p| [p[2], p[1], p[0], p[3]],
            ColorMode::ABGR => |p| [p[0], p[1], p[2], p[3]],
            ColorMode::RGB => |p| [p[0], p[1], p[2], 255],
            ColorMode::BGR => |p| [p[2], p[1], p[0], 255],
            ColorMode::GRAY => |p| [p[0], p[0], p[0], 255],
            ColorMode::ALPHA => |p| [255, 255, 255, p[0]],
            ColorMode::AGRAY => |p| [p[0], p[0], p[0], p[1]],
            _ => return None,
        };
        Some(
            pixels[..self.byte_len()]
                .chunks_exact(stride)
                .flat_map(convert)
                .collect(),
        )
    }
}

/// Loader for image chunks, also used for animation frames and font glyphs
pub fn load(ctx: &mut LoadContext<'_>, size: u32) -> Result<NodeId> {
    let mut info = NodeInfo::default();
    let mut image = Image::empty(0, 0, ColorMode::ARGB);
    image.strict_size = ctx.options().strict_image_size;
    image.source = ctx.source().cloned();
    image.codecs = Some(Arc::clone(ctx.codecs()));

    ctx.for_each_chunk(size, |ctx, chunk| {
        if info.read_common(ctx.reader(), chunk)? {
            return Ok(ControlFlow::Continue(()));
        }
        match chunk.gid {
            Gid::IMAGE_PROPS => {
                let reader = ctx.reader();
                image.width = reader.read_i32()?.max(0) as u32;
                image.height = reader.read_i32()?.max(0) as u32;
                image.mode = ColorMode(reader.read_u32()?);
                let _reserved = reader.read_i32()?;
                if chunk.size > PROPS_SIZE {
                    image.late = reader.read_bool()?;
                }
            }
            Gid::IMAGE_CMP_PROPS => {
                let reader = ctx.reader();
                image.compression = reader.read_gid()?;
                let rest = chunk.size.saturating_sub(4) as usize;
                image.compression_props = reader.read_bytes(rest)?;
            }
            Gid::IMAGE_PALETTE => {
                image.palette = ctx.reader().read_bytes(chunk.size as usize)?;
            }
            Gid::IMAGE_DATA | Gid::IMAGE_CMP_DATA => {
                let compression = if chunk.gid == Gid::IMAGE_DATA {
                    Gid::NONE
                } else {
                    image.compression
                };
                image.payload = Some(Payload {
                    offset: chunk.offset,
                    len: chunk.size,
                    compression,
                });
                if image.late {
                    // Left for Image::load; the reader skips the payload.
                    return Ok(ControlFlow::Continue(()));
                }
                let bytes = ctx.reader().read_bytes(chunk.size as usize)?;
                match image.decode(bytes, compression) {
                    Ok(()) => {}
                    Err(Error::Codec(e)) => {
                        warn!(%compression, "Failed to decode image payload: {e}");
                    }
                    Err(e) => return Err(e),
                }
            }
            _ => {}
        }
        Ok(ControlFlow::Continue(()))
    })?;

    Ok(ctx.tree_mut().insert(info.into_node(Resource::Image(image))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_per_pixel() {
        assert_eq!(ColorMode::ALPHA.bytes_per_pixel(), 1);
        assert_eq!(ColorMode::AGRAY.bytes_per_pixel(), 2);
        assert_eq!(ColorMode::BGR.bytes_per_pixel(), 3);
        assert_eq!(ColorMode::ARGB.bytes_per_pixel(), 4);
        assert_eq!(ColorMode(77).bytes_per_pixel(), 4);
    }

    #[test]
    fn test_to_rgba8() {
        let image = Image::from_pixels(2, 1, ColorMode::ARGB, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(image.to_rgba8().unwrap(), vec![3, 2, 1, 4, 7, 6, 5, 8]);

        let gray = Image::from_pixels(2, 1, ColorMode::AGRAY, vec![10, 20, 30, 40]);
        assert_eq!(
            gray.to_rgba8().unwrap(),
            vec![10, 10, 10, 20, 30, 30, 30, 40]
        );

        let paletted = Image::from_pixels(1, 1, ColorMode::PALETTED, vec![0]);
        assert!(paletted.to_rgba8().is_none());
    }

    #[test]
    fn test_load_without_source_fails() {
        let mut image = Image::empty(1, 1, ColorMode::ALPHA);
        assert!(!image.load());
        assert!(!image.is_loaded());
    }

    #[test]
    fn test_prepare_requires_pixels() {
        let mut sink = crate::texture::HeadlessTextures::new();
        let mut image = Image::empty(1, 1, ColorMode::ALPHA);
        let guid = Guid::from_u64(9);
        assert!(matches!(
            image.prepare(guid, &mut sink),
            Err(Error::ImageNotLoaded { guid: g }) if g == guid
        ));

        let mut image = Image::from_pixels(1, 1, ColorMode::ALPHA, vec![7]);
        image.prepare(guid, &mut sink).unwrap();
        assert!(image.texture().is_some());
        image.prepare(guid, &mut sink).unwrap();
        assert_eq!(sink.live(), 1);
    }

    #[test]
    fn test_discard_respects_leave_data() {
        let mut sink = crate::texture::HeadlessTextures::new();
        let mut image = Image::from_pixels(1, 1, ColorMode::ALPHA, vec![7]);
        assert!(!image.discard());
        image.prepare(Guid::EMPTY, &mut sink).unwrap();

        image.leave_data = true;
        assert!(!image.discard());
        image.leave_data = false;
        assert!(image.discard());
        assert!(!image.is_loaded());
    }
}
