//! Payload codecs keyed by compression tag
//!
//! Image and sound payloads may be stored compressed. The loader never
//! decodes them itself; it looks the compression tag up in a
//! [`CodecRegistry`]. PNG and JPEG ship with the crate via the `image`
//! crate. Dictionary codecs such as LZMA are registered by the caller.

use std::fmt;
use std::sync::Arc;

use hashbrown::HashMap;

use crate::error::CodecError;
use crate::gid::Gid;
use crate::resources::image::ColorMode;

/// What the caller knows about the payload being decoded
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeRequest<'a> {
    /// Codec properties stored next to the compression tag
    pub props: &'a [u8],
    /// Length the decoded bytes should have, when known
    ///
    /// Codecs that report their own dimensions are not held to it.
    pub expected_len: Option<usize>,
}

/// Decoded payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub bytes: Vec<u8>,
    /// Pixel layout chosen by an image codec
    pub mode: Option<ColorMode>,
    /// Dimensions reported by an image codec
    pub dimensions: Option<(u32, u32)>,
}

impl Decoded {
    /// Plain bytes without image metadata
    pub fn bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mode: None,
            dimensions: None,
        }
    }
}

/// A payload decoder
pub trait Codec: Send + Sync {
    fn decode(&self, input: &[u8], request: &DecodeRequest<'_>) -> Result<Decoded, CodecError>;
}

impl<F> Codec for F
where
    F: Fn(&[u8], &DecodeRequest<'_>) -> Result<Decoded, CodecError> + Send + Sync,
{
    fn decode(&self, input: &[u8], request: &DecodeRequest<'_>) -> Result<Decoded, CodecError> {
        self(input, request)
    }
}

/// Table of codecs keyed by compression tag
#[derive(Clone, Default)]
pub struct CodecRegistry {
    codecs: HashMap<Gid, Arc<dyn Codec>>,
}

impl CodecRegistry {
    /// Registry without any codecs; only uncompressed payloads decode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the PNG and JPEG codecs
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Gid::PNG, PngCodec);
        registry.register(Gid::JPEG, JpegCodec);
        registry
    }

    pub fn register<C: Codec + 'static>(&mut self, compression: Gid, codec: C) -> &mut Self {
        self.codecs.insert(compression, Arc::new(codec));
        self
    }

    pub fn contains(&self, compression: Gid) -> bool {
        compression == Gid::NONE || self.codecs.contains_key(&compression)
    }

    /// Decode `input` stored with `compression`
    ///
    /// [`Gid::NONE`] passes bytes through. A known `expected_len` is checked
    /// against the decoded length unless the codec reported dimensions.
    pub fn decode(
        &self,
        compression: Gid,
        input: &[u8],
        request: &DecodeRequest<'_>,
    ) -> Result<Decoded, CodecError> {
        let decoded = if compression == Gid::NONE {
            Decoded::bytes(input.to_vec())
        } else {
            let codec = self
                .codecs
                .get(&compression)
                .ok_or(CodecError::Unsupported { compression })?;
            codec.decode(input, request)?
        };

        match request.expected_len {
            Some(expected) if decoded.dimensions.is_none() && expected != decoded.bytes.len() => {
                Err(CodecError::LengthMismatch {
                    expected,
                    found: decoded.bytes.len(),
                })
            }
            _ => Ok(decoded),
        }
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut gids: Vec<_> = self.codecs.keys().collect();
        gids.sort();
        f.debug_struct("CodecRegistry").field("codecs", &gids).finish()
    }
}

// =============================================================================
// Built-in image codecs
// =============================================================================

/// PNG, decoded to 32-bit BGRA ([`ColorMode::ARGB`])
#[derive(Debug, Clone, Copy, Default)]
pub struct PngCodec;

impl Codec for PngCodec {
    fn decode(&self, input: &[u8], _request: &DecodeRequest<'_>) -> Result<Decoded, CodecError> {
        let img = image::load_from_memory_with_format(input, image::ImageFormat::Png)
            .map_err(|e| CodecError::Decode(e.to_string()))?;
        let rgba = img.to_rgba8();
        let dimensions = rgba.dimensions();
        let mut bytes = rgba.into_raw();
        swap_red_blue(&mut bytes, 4);
        Ok(Decoded {
            bytes,
            mode: Some(ColorMode::ARGB),
            dimensions: Some(dimensions),
        })
    }
}

/// JPEG, decoded to 24-bit BGR or to an alpha mask for grayscale files
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegCodec;

impl Codec for JpegCodec {
    fn decode(&self, input: &[u8], _request: &DecodeRequest<'_>) -> Result<Decoded, CodecError> {
        let img = image::load_from_memory_with_format(input, image::ImageFormat::Jpeg)
            .map_err(|e| CodecError::Decode(e.to_string()))?;

        if img.color().channel_count() == 1 {
            let luma = img.to_luma8();
            let dimensions = luma.dimensions();
            return Ok(Decoded {
                bytes: luma.into_raw(),
                mode: Some(ColorMode::ALPHA),
                dimensions: Some(dimensions),
            });
        }

        let rgb = img.to_rgb8();
        let dimensions = rgb.dimensions();
        let mut bytes = rgb.into_raw();
        swap_red_blue(&mut bytes, 3);
        Ok(Decoded {
            bytes,
            mode: Some(ColorMode::BGR),
            dimensions: Some(dimensions),
        })
    }
}

fn swap_red_blue(bytes: &mut [u8], stride: usize) {
    for px in bytes.chunks_exact_mut(stride) {
        px.swap(0, 2);
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                image::Rgba([255, 0, 0, 255]) // Red
            } else {
                image::Rgba([0, 0, 255, 128]) // Blue, half alpha
            }
        });
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn test_none_passes_through() {
        let codecs = CodecRegistry::new();
        let decoded = codecs
            .decode(Gid::NONE, &[1, 2, 3], &DecodeRequest::default())
            .unwrap();
        assert_eq!(decoded.bytes, vec![1, 2, 3]);
    }

    #[test]
    fn test_png_decodes_to_bgra() {
        let codecs = CodecRegistry::builtin();
        let decoded = codecs
            .decode(Gid::PNG, &png_bytes(), &DecodeRequest::default())
            .unwrap();
        assert_eq!(decoded.mode, Some(ColorMode::ARGB));
        assert_eq!(decoded.dimensions, Some((2, 1)));
        assert_eq!(decoded.bytes, vec![0, 0, 255, 255, 255, 0, 0, 128]);
    }

    #[test]
    fn test_unregistered_codec_is_unsupported() {
        let codecs = CodecRegistry::builtin();
        let err = codecs
            .decode(Gid::LZMA, &[0; 4], &DecodeRequest::default())
            .unwrap_err();
        assert_eq!(
            err,
            CodecError::Unsupported {
                compression: Gid::LZMA
            }
        );
    }

    #[test]
    fn test_custom_codec_and_length_check() {
        let mut codecs = CodecRegistry::new();
        codecs.register(Gid::LZMA, |input: &[u8], _: &DecodeRequest<'_>| {
            Ok::<_, CodecError>(Decoded::bytes(input.iter().rev().copied().collect()))
        });
        let request = DecodeRequest {
            props: &[],
            expected_len: Some(3),
        };
        let decoded = codecs.decode(Gid::LZMA, &[1, 2, 3], &request).unwrap();
        assert_eq!(decoded.bytes, vec![3, 2, 1]);

        let err = codecs.decode(Gid::LZMA, &[1, 2], &request).unwrap_err();
        assert_eq!(err, CodecError::LengthMismatch { expected: 3, found: 2 });
    }

    #[test]
    fn test_image_codec_sets_its_own_length() {
        let codecs = CodecRegistry::builtin();
        let request = DecodeRequest {
            props: &[],
            expected_len: Some(64),
        };
        let decoded = codecs.decode(Gid::PNG, &png_bytes(), &request).unwrap();
        assert_eq!(decoded.bytes.len(), 8);
    }

    #[test]
    fn test_corrupt_png_is_decode_error() {
        let codecs = CodecRegistry::builtin();
        let err = codecs
            .decode(Gid::PNG, b"not a png", &DecodeRequest::default())
            .unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }
}
