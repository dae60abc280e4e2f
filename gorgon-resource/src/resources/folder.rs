//! Folder: the generic container node
//!
//! A folder knows none of its children's kinds; every nested chunk goes back
//! through the registry. Only a folder may be the root of a container.

use std::ops::ControlFlow;

use hashbrown::HashMap;

use crate::context::{LoadContext, NodeInfo};
use crate::error::Result;
use crate::gid::Gid;
use crate::resources::Resource;
use crate::tree::{Node, NodeId, ResourceTree};

/// Separates a name from its caption in legacy name lists
const CAPTION_SEPARATOR: char = '\x01';

#[derive(Debug, Default)]
pub struct Folder {
    by_name: HashMap<String, NodeId>,
}

impl Folder {
    /// Child with the given name. Filled in by prepare.
    pub fn child_by_name(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    pub(crate) fn index_names(tree: &ResourceTree, id: NodeId) -> HashMap<String, NodeId> {
        let mut by_name = HashMap::new();
        if let Some(node) = tree.get(id) {
            for child in node.children() {
                let Some(child_node) = tree.get(child.node) else {
                    continue;
                };
                if !child_node.name().is_empty() {
                    by_name
                        .entry(child_node.name().to_string())
                        .or_insert(child.node);
                }
            }
        }
        by_name
    }

    pub(crate) fn set_name_index(&mut self, by_name: HashMap<String, NodeId>) {
        self.by_name = by_name;
    }
}

pub fn load(ctx: &mut LoadContext<'_>, size: u32) -> Result<NodeId> {
    let first_only = ctx.options().first_only && ctx.tree().is_empty();
    let id = ctx
        .tree_mut()
        .insert(Node::new(Resource::Folder(Folder::default())));

    let mut info = NodeInfo::default();
    let mut has_names = false;
    let mut names = Vec::new();

    ctx.for_each_chunk(size, |ctx, chunk| {
        if info.read_common(ctx.reader(), chunk)? {
            return Ok(ControlFlow::Continue(()));
        }
        match chunk.gid {
            Gid::FOLDER_PROPS if chunk.size >= 4 => {
                has_names = ctx.reader().read_i32()? != 0;
            }
            Gid::FOLDER_NAMES => {
                if ctx.options().load_names && has_names {
                    names = read_names(ctx, chunk.size)?;
                }
            }
            _ => {
                if let Some(child) = ctx.load_object(chunk)? {
                    ctx.tree_mut().append_child(id, child);
                    if first_only {
                        return Ok(ControlFlow::Break(()));
                    }
                }
            }
        }
        Ok(ControlFlow::Continue(()))
    })?;

    let tree = ctx.tree_mut();
    let children: Vec<NodeId> = tree[id].children().iter().map(|c| c.node).collect();
    for (child, entry) in children.into_iter().zip(names) {
        let (name, caption) = match entry.split_once(CAPTION_SEPARATOR) {
            Some((name, caption)) => (name.to_string(), Some(caption.to_string())),
            None => (entry, None),
        };
        let node = &mut tree[child];
        node.set_name(name);
        node.set_caption(caption);
    }

    let node = &mut tree[id];
    node.set_guid(info.guid);
    if !info.name.is_empty() {
        node.set_name(info.name);
    }
    Ok(id)
}

fn read_names(ctx: &mut LoadContext<'_>, size: u32) -> Result<Vec<String>> {
    let mut names = Vec::new();
    ctx.for_each_chunk(size, |ctx, chunk| {
        if chunk.gid == Gid::FOLDER_NAME {
            names.push(ctx.reader().read_fixed_string(chunk.size as usize)?);
        }
        Ok(ControlFlow::Continue(()))
    })?;
    Ok(names)
}
