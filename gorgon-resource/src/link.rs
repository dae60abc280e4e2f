//! Link resolution
//!
//! Link aliases are placeholders parsed where another node should appear.
//! Resolution walks the tree once, in depth-first order, and for every alias:
//!
//! 1. records a redirect from the alias identifier to its target,
//! 2. looks the target up among the real (non-alias) nodes,
//! 3. puts the target in the alias's slot of its parent as a shared
//!    reference, keeping the slot's order key, or removes the slot when
//!    the target does not exist,
//! 4. destroys the alias node.
//!
//! The target stays owned by its original parent.

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::file::ResourceFile;
use crate::resources::Resource;
use crate::tree::NodeId;

/// Outcome of a resolution pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    /// Aliases replaced by their target
    pub resolved: usize,
    /// Aliases whose target was not found
    pub dropped: usize,
}

impl ResourceFile {
    /// Replace link aliases with shared references to their targets
    ///
    /// Runs once per load; later calls return empty stats. Called by
    /// [`prepare`](Self::prepare) when it has not run yet.
    pub fn resolve_links(&mut self) -> Result<LinkStats> {
        let root = self.root.ok_or(Error::NotLoaded)?;
        let mut stats = LinkStats::default();
        if self.links_resolved {
            return Ok(stats);
        }

        let aliases: Vec<NodeId> = self
            .tree
            .preorder(root)
            .into_iter()
            .filter(|&id| self.tree[id].resource().is_link_alias())
            .collect();

        for alias in aliases {
            let node = &self.tree[alias];
            let Resource::LinkAlias(link) = node.resource() else {
                continue;
            };
            let own = node.guid();
            let target_guid = self.redirects.resolve(link.target);
            let parent = node.parent();

            if !own.is_empty() {
                self.redirects.add(own, target_guid);
            }
            let target = self
                .tree
                .find_dfs(root, target_guid, |n| !n.resource().is_link_alias());

            if let Some(parent) = parent {
                match target {
                    Some(target) => {
                        let order = self.tree.replace_child(parent, alias, target);
                        trace!(alias = %own, target = %target_guid, ?order, "Resolved link");
                        stats.resolved += 1;
                    }
                    None => {
                        self.tree.remove_child(parent, alias);
                        debug!(alias = %own, target = %target_guid, "Dropped unresolved link");
                        stats.dropped += 1;
                    }
                }
            }
            self.tree.remove(alias);
        }

        self.invalidate_index();
        self.links_resolved = true;
        debug!(resolved = stats.resolved, dropped = stats.dropped, "Resolved links");
        Ok(stats)
    }
}
