//! Link alias: a placeholder standing in for another node
//!
//! Aliases only exist between parsing and link resolution. Resolution
//! replaces each one with a shared reference to its target, or drops it.

use std::ops::ControlFlow;

use crate::context::{LoadContext, NodeInfo};
use crate::error::Result;
use crate::gid::Gid;
use crate::guid::Guid;
use crate::resources::Resource;
use crate::tree::NodeId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkAlias {
    pub target: Guid,
}

pub fn load(ctx: &mut LoadContext<'_>, size: u32) -> Result<NodeId> {
    let mut info = NodeInfo::default();
    let mut alias = LinkAlias::default();

    ctx.for_each_chunk(size, |ctx, chunk| {
        if !info.read_common(ctx.reader(), chunk)? && chunk.gid == Gid::LINK_NODE_TARGET {
            alias.target = ctx.reader().read_guid_sized(chunk.size)?;
        }
        Ok(ControlFlow::Continue(()))
    })?;

    let node = info.into_node(Resource::LinkAlias(alias));
    Ok(ctx.tree_mut().insert(node))
}
