//! Text resource

use std::ops::ControlFlow;

use crate::context::{LoadContext, NodeInfo};
use crate::error::Result;
use crate::gid::Gid;
use crate::resources::Resource;
use crate::tree::NodeId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text {
    pub value: String,
}

pub fn load(ctx: &mut LoadContext<'_>, size: u32) -> Result<NodeId> {
    let mut info = NodeInfo::default();
    let mut text = Text::default();

    ctx.for_each_chunk(size, |ctx, chunk| {
        if !info.read_common(ctx.reader(), chunk)? && chunk.gid == Gid::TEXT_VALUE {
            text.value = ctx.reader().read_string()?;
        }
        Ok(ControlFlow::Continue(()))
    })?;

    Ok(ctx.tree_mut().insert(info.into_node(Resource::Text(text))))
}
