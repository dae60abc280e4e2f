//! Sound resource

use std::ops::ControlFlow;

use tracing::warn;

use crate::codec::DecodeRequest;
use crate::context::{LoadContext, NodeInfo};
use crate::error::Result;
use crate::gid::Gid;
use crate::resources::Resource;
use crate::tree::NodeId;

/// PCM wave format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaveFormat {
    pub format_tag: u16,
    pub channels: u16,
    pub samples_per_sec: u32,
    pub avg_bytes_per_sec: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sound {
    /// Size of the decoded sample buffer in bytes
    pub buffer_size: u32,
    pub format: WaveFormat,
    compression: Gid,
    compression_props: Vec<u8>,
    data: Vec<u8>,
}

impl Sound {
    pub fn compression(&self) -> Gid {
        self.compression
    }

    /// Decoded sample bytes, empty if decoding failed
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Playback length in seconds
    pub fn duration(&self) -> f32 {
        if self.format.avg_bytes_per_sec == 0 {
            return 0.0;
        }
        self.data.len() as f32 / self.format.avg_bytes_per_sec as f32
    }
}

pub fn load(ctx: &mut LoadContext<'_>, size: u32) -> Result<NodeId> {
    let mut info = NodeInfo::default();
    let mut sound = Sound::default();

    ctx.for_each_chunk(size, |ctx, chunk| {
        if info.read_common(ctx.reader(), chunk)? {
            return Ok(ControlFlow::Continue(()));
        }
        match chunk.gid {
            Gid::SOUND_PROPS => {
                let reader = ctx.reader();
                sound.buffer_size = reader.read_u32()?;
                sound.format.channels = reader.read_u16()?;
                sound.format.block_align = reader.read_u16()?;
                sound.format.bits_per_sample = reader.read_u16()?;
                sound.format.samples_per_sec = reader.read_u32()?;
                sound.format.avg_bytes_per_sec = reader.read_u32()?;
                sound.format.format_tag = reader.read_u16()?;
            }
            Gid::SOUND_CMP_PROPS => {
                let reader = ctx.reader();
                sound.compression = reader.read_gid()?;
                let rest = chunk.size.saturating_sub(4) as usize;
                sound.compression_props = reader.read_bytes(rest)?;
            }
            Gid::SOUND_WAVE => {
                sound.data = ctx.reader().read_bytes(chunk.size as usize)?;
            }
            Gid::SOUND_CMP_WAVE => {
                let bytes = ctx.reader().read_bytes(chunk.size as usize)?;
                let request = DecodeRequest {
                    props: &sound.compression_props,
                    expected_len: (sound.buffer_size > 0).then_some(sound.buffer_size as usize),
                };
                match ctx.codecs().decode(sound.compression, &bytes, &request) {
                    Ok(decoded) => sound.data = decoded.bytes,
                    Err(e) => warn!(compression = %sound.compression, "Failed to decode sound: {e}"),
                }
            }
            _ => {}
        }
        Ok(ControlFlow::Continue(()))
    })?;

    Ok(ctx.tree_mut().insert(info.into_node(Resource::Sound(sound))))
}
