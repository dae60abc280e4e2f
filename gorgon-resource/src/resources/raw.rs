//! Opaque payload for custom chunk kinds

use crate::context::LoadContext;
use crate::error::Result;
use crate::gid::Gid;
use crate::resources::Resource;
use crate::tree::{Node, NodeId};

/// Payload bytes of a chunk the crate has no dedicated type for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raw {
    pub gid: Gid,
    pub bytes: Vec<u8>,
}

/// Loader keeping the whole payload as bytes
///
/// Register it for any tag whose contents should be kept verbatim:
///
/// ```
/// use gorgon_resource::{Gid, LoaderRegistry, resources};
///
/// let mut registry = LoaderRegistry::basic();
/// registry.register(Gid(0x0700_0000), resources::raw::load);
/// ```
pub fn load(ctx: &mut LoadContext<'_>, size: u32) -> Result<NodeId> {
    let raw = Raw {
        gid: ctx.current_gid(),
        bytes: ctx.reader().read_bytes(size as usize)?,
    };
    Ok(ctx.tree_mut().insert(Node::new(Resource::Raw(raw))))
}
