//! Bitmap font: glyph images selected through a character map

use std::ops::ControlFlow;

use crate::context::{LoadContext, NodeInfo};
use crate::error::Result;
use crate::gid::Gid;
use crate::resources::{Resource, image};
use crate::tree::{Node, NodeId};

/// Entries in the character map, one per byte value
pub const CHARMAP_LEN: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    /// Glyph index per character, negative for no glyph
    charmap: Vec<i32>,
    /// Horizontal gap between glyphs in pixels
    pub separator: i32,
    pub vertical_spacing: i32,
    pub baseline: i32,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            charmap: vec![-1; CHARMAP_LEN],
            separator: 1,
            vertical_spacing: 0,
            baseline: 0,
        }
    }
}

impl Font {
    /// Glyph index for a character
    pub fn glyph_index(&self, ch: u8) -> Option<usize> {
        usize::try_from(self.charmap[ch as usize]).ok()
    }

    /// Glyph image node for a character, given this font's node
    pub fn glyph(&self, node: &Node, ch: u8) -> Option<NodeId> {
        node.child(self.glyph_index(ch)?)
    }
}

pub fn load(ctx: &mut LoadContext<'_>, size: u32) -> Result<NodeId> {
    let id = ctx
        .tree_mut()
        .insert(Node::new(Resource::Font(Font::default())));
    let mut info = NodeInfo::default();
    let mut font = Font::default();

    ctx.for_each_chunk(size, |ctx, chunk| {
        if info.read_common(ctx.reader(), chunk)? {
            return Ok(ControlFlow::Continue(()));
        }
        match chunk.gid {
            Gid::FONT_CHARMAP => {
                let count = (chunk.size as usize / 4).min(CHARMAP_LEN);
                for slot in &mut font.charmap[..count] {
                    *slot = ctx.reader().read_i32()?;
                }
            }
            Gid::FONT_PROPS => {
                let reader = ctx.reader();
                font.separator = reader.read_i32()?;
                font.vertical_spacing = reader.read_i32()?;
                font.baseline = reader.read_i32()?;
            }
            Gid::FONT_IMAGE | Gid::IMAGE => {
                let glyph = image::load(ctx, chunk.size)?;
                ctx.tree_mut().append_child(id, glyph);
            }
            _ => {}
        }
        Ok(ControlFlow::Continue(()))
    })?;

    let node = &mut ctx.tree_mut()[id];
    node.set_guid(info.guid);
    node.set_name(info.name);
    *node.resource_mut() = Resource::Font(font);
    Ok(id)
}
