//! Animation: frame images plus their timing

use std::ops::ControlFlow;

use tracing::debug;

use crate::context::{LoadContext, NodeInfo};
use crate::error::Result;
use crate::frame_index::FrameIndex;
use crate::gid::Gid;
use crate::resources::{Resource, image};
use crate::tree::{Node, NodeId};

/// Timing of an animation; frame `i` is the node's `i`th child
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Animation {
    frames: FrameIndex,
}

impl Animation {
    pub fn frames(&self) -> &FrameIndex {
        &self.frames
    }

    /// Total length in milliseconds
    pub fn total_length(&self) -> u32 {
        self.frames.total_length()
    }

    pub fn frame_at(&self, t: u32) -> Result<usize> {
        self.frames.frame_at(t)
    }
}

pub fn load(ctx: &mut LoadContext<'_>, size: u32) -> Result<NodeId> {
    let id = ctx
        .tree_mut()
        .insert(Node::new(Resource::Animation(Animation::default())));
    let mut info = NodeInfo::default();
    let mut durations = Vec::new();

    ctx.for_each_chunk(size, |ctx, chunk| {
        if info.read_common(ctx.reader(), chunk)? {
            return Ok(ControlFlow::Continue(()));
        }
        match chunk.gid {
            Gid::ANIMATION_DURATIONS => {
                let count = chunk.size / 4;
                durations.reserve(count as usize);
                for _ in 0..count {
                    durations.push(ctx.reader().read_u32()?);
                }
            }
            Gid::ANIMATION_IMAGE | Gid::IMAGE => {
                let frame = image::load(ctx, chunk.size)?;
                ctx.tree_mut().append_child(id, frame);
            }
            _ => {}
        }
        Ok(ControlFlow::Continue(()))
    })?;

    let node = &mut ctx.tree_mut()[id];
    if node.children().len() != durations.len() {
        debug!(
            frames = node.children().len(),
            durations = durations.len(),
            "Animation frame count differs from duration count"
        );
    }
    node.set_guid(info.guid);
    node.set_name(info.name);
    *node.resource_mut() = Resource::Animation(Animation {
        frames: FrameIndex::from_durations(&durations),
    });
    Ok(id)
}
