//! Prepare pass
//!
//! Runs after link resolution, children before parents. Folders index
//! their children by name, data arrays and font themes turn stored
//! identifiers into node references, and images upload their pixels.

use hashbrown::HashMap;
use tracing::debug;

use crate::error::{Error, Result};
use crate::file::ResourceFile;
use crate::resources::font_theme::STYLE_COUNT;
use crate::resources::{DataItem, Folder, Resource};
use crate::texture::TextureSink;
use crate::tree::NodeId;

/// Mutation computed from an immutable view of the tree
enum Fixup {
    Names(HashMap<String, NodeId>),
    Links(Vec<Option<NodeId>>),
    Renderers([Option<NodeId>; STYLE_COUNT]),
    Upload,
}

impl ResourceFile {
    /// Resolve links if needed, then prepare every node
    ///
    /// Late-loaded images must have been fetched beforehand; an image
    /// without pixels fails with [`Error::ImageNotLoaded`]. A failed
    /// prepare may be retried after fixing the cause. Succeeds once per
    /// load.
    pub fn prepare(&mut self, sink: &mut dyn TextureSink) -> Result<()> {
        let root = self.root.ok_or(Error::NotLoaded)?;
        if self.prepared {
            return Err(Error::AlreadyPrepared);
        }
        self.resolve_links()?;

        let order = self.tree.postorder(root);
        for &id in &order {
            self.prepare_node(id, sink)?;
        }

        self.prepared = true;
        debug!(nodes = order.len(), "Prepared resource container");
        Ok(())
    }

    fn prepare_node(&mut self, id: NodeId, sink: &mut dyn TextureSink) -> Result<()> {
        let Some(node) = self.tree.get(id) else {
            return Ok(());
        };
        let guid = node.guid();
        let fixup = match node.resource() {
            Resource::Folder(_) => Fixup::Names(Folder::index_names(&self.tree, id)),
            Resource::Data(data) => Fixup::Links(
                data.items()
                    .iter()
                    .filter_map(|item| match item {
                        DataItem::Link(link) => Some(self.find(link.guid)),
                        _ => None,
                    })
                    .collect(),
            ),
            Resource::FontTheme(theme) => Fixup::Renderers(theme.slots().map(|g| self.find(g))),
            Resource::Image(_) => Fixup::Upload,
            _ => return Ok(()),
        };

        let resource = self.tree[id].resource_mut();
        match (fixup, resource) {
            (Fixup::Names(by_name), Resource::Folder(folder)) => folder.set_name_index(by_name),
            (Fixup::Links(targets), Resource::Data(data)) => {
                for (link, target) in data.links_mut().zip(targets) {
                    link.set_target(target);
                }
            }
            (Fixup::Renderers(renderers), Resource::FontTheme(theme)) => {
                theme.set_renderers(renderers)
            }
            (Fixup::Upload, Resource::Image(image)) => image.prepare(guid, sink)?,
            _ => {}
        }
        Ok(())
    }
}
