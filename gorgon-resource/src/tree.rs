//! In-memory resource tree
//!
//! Nodes live in an arena owned by the tree and are addressed by [`NodeId`].
//! Every node except the root has exactly one owning parent. Link
//! resolution may additionally place a node in other parents' child lists
//! as a [`Link::Shared`] entry; shared entries never affect ownership, so
//! traversals that follow owned edges visit each node exactly once.

use std::ops::{Index, IndexMut};

use crate::gid::Gid;
use crate::guid::Guid;
use crate::resources::Resource;

/// Index of a node inside its [`ResourceTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// How a parent refers to a child
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// The parent built the child and owns it
    Owned,
    /// A non-owning reference installed by link resolution
    Shared,
}

/// An entry in a node's ordered child list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Child {
    pub order: u32,
    pub node: NodeId,
    pub link: Link,
}

impl Child {
    pub fn is_owned(&self) -> bool {
        self.link == Link::Owned
    }
}

/// A resource node: identifier, naming and typed payload
#[derive(Debug)]
pub struct Node {
    guid: Guid,
    name: String,
    caption: Option<String>,
    parent: Option<NodeId>,
    children: Vec<Child>,
    resource: Resource,
}

impl Node {
    pub fn new(resource: Resource) -> Self {
        Self {
            guid: Guid::EMPTY,
            name: String::new(),
            caption: None,
            parent: None,
            children: Vec::new(),
            resource,
        }
    }

    pub fn with_guid(mut self, guid: Guid) -> Self {
        self.guid = guid;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn guid(&self) -> Guid {
        self.guid
    }

    pub fn set_guid(&mut self, guid: Guid) {
        self.guid = guid;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    pub fn set_caption(&mut self, caption: Option<String>) {
        self.caption = caption;
    }

    /// Owning parent, `None` for the root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children sorted by order key, owned and shared alike
    pub fn children(&self) -> &[Child] {
        &self.children
    }

    /// Child node at position `index` in order
    pub fn child(&self, index: usize) -> Option<NodeId> {
        self.children.get(index).map(|c| c.node)
    }

    /// Highest order key in use, `None` without children
    pub fn highest_order(&self) -> Option<u32> {
        self.children.iter().map(|c| c.order).max()
    }

    /// Tag of the concrete resource kind
    pub fn gid(&self) -> Gid {
        self.resource.gid()
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    pub fn resource_mut(&mut self) -> &mut Resource {
        &mut self.resource
    }
}

/// Arena of resource nodes
#[derive(Debug, Default)]
pub struct ResourceTree {
    nodes: Vec<Option<Node>>,
}

impl ResourceTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a detached node
    pub fn insert(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(node));
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live nodes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.as_ref().map(|n| (NodeId(i as u32), n)))
    }

    /// Append an owned child with order key `highest + 1`
    ///
    /// Returns the assigned order key.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> u32 {
        let Some(parent_node) = self.get_mut(parent) else {
            return 0;
        };
        let order = parent_node.highest_order().map_or(0, |o| o + 1);
        parent_node.children.push(Child {
            order,
            node: child,
            link: Link::Owned,
        });
        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = Some(parent);
        }
        order
    }

    /// Put `replacement` in `old`'s slot as a shared reference
    ///
    /// The order key is kept. Returns it, or `None` if `old` is not a child
    /// of `parent`.
    pub fn replace_child(&mut self, parent: NodeId, old: NodeId, replacement: NodeId) -> Option<u32> {
        let parent_node = self.get_mut(parent)?;
        let slot = parent_node.children.iter_mut().find(|c| c.node == old)?;
        slot.node = replacement;
        slot.link = Link::Shared;
        Some(slot.order)
    }

    /// Remove `child` from `parent`'s child list without destroying it
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Option<Child> {
        let parent_node = self.get_mut(parent)?;
        let pos = parent_node.children.iter().position(|c| c.node == child)?;
        Some(parent_node.children.remove(pos))
    }

    /// Destroy a node and everything it owns
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        let node = self.nodes.get_mut(id.index())?.take()?;
        let mut stack: Vec<NodeId> = owned_children(&node).collect();
        while let Some(next) = stack.pop() {
            if let Some(child) = self.nodes.get_mut(next.index()).and_then(Option::take) {
                stack.extend(owned_children(&child));
            }
        }
        Some(node)
    }

    /// Owned nodes below and including `root`, parents before children
    pub fn preorder(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.get(id) else { continue };
            out.push(id);
            stack.extend(
                node.children
                    .iter()
                    .rev()
                    .filter(|c| c.is_owned())
                    .map(|c| c.node),
            );
        }
        out
    }

    /// Owned nodes below and including `root`, children before parents
    pub fn postorder(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![(root, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                out.push(id);
                continue;
            }
            let Some(node) = self.get(id) else { continue };
            stack.push((id, true));
            stack.extend(
                node.children
                    .iter()
                    .rev()
                    .filter(|c| c.is_owned())
                    .map(|c| (c.node, false)),
            );
        }
        out
    }

    /// First node in preorder whose identifier is `guid` and which passes `filter`
    pub fn find_dfs(
        &self,
        root: NodeId,
        guid: Guid,
        filter: impl Fn(&Node) -> bool,
    ) -> Option<NodeId> {
        if guid.is_empty() {
            return None;
        }
        self.preorder(root).into_iter().find(|&id| {
            self.get(id)
                .is_some_and(|node| node.guid == guid && filter(node))
        })
    }
}

fn owned_children(node: &Node) -> impl Iterator<Item = NodeId> + '_ {
    node.children.iter().filter(|c| c.is_owned()).map(|c| c.node)
}

impl Index<NodeId> for ResourceTree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        match self.get(id) {
            Some(node) => node,
            None => panic!("node {id:?} is not in the tree"),
        }
    }
}

impl IndexMut<NodeId> for ResourceTree {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        match self.get_mut(id) {
            Some(node) => node,
            None => panic!("node {id:?} is not in the tree"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{Folder, Text};

    fn folder(guid: u64) -> Node {
        Node::new(Resource::Folder(Folder::default())).with_guid(Guid::from_u64(guid))
    }

    fn text(guid: u64) -> Node {
        Node::new(Resource::Text(Text::default())).with_guid(Guid::from_u64(guid))
    }

    #[test]
    fn test_append_assigns_sequential_orders() {
        let mut tree = ResourceTree::new();
        let root = tree.insert(folder(1));
        let a = tree.insert(text(2));
        let b = tree.insert(text(3));
        assert_eq!(tree.append_child(root, a), 0);
        assert_eq!(tree.append_child(root, b), 1);
        assert_eq!(tree[a].parent(), Some(root));
        assert_eq!(tree[root].child(1), Some(b));
    }

    #[test]
    fn test_traversal_orders() {
        let mut tree = ResourceTree::new();
        let root = tree.insert(folder(1));
        let sub = tree.insert(folder(2));
        let a = tree.insert(text(3));
        let b = tree.insert(text(4));
        tree.append_child(root, sub);
        tree.append_child(sub, a);
        tree.append_child(root, b);

        assert_eq!(tree.preorder(root), vec![root, sub, a, b]);
        assert_eq!(tree.postorder(root), vec![a, sub, b, root]);
    }

    #[test]
    fn test_replace_keeps_order_and_marks_shared() {
        let mut tree = ResourceTree::new();
        let root = tree.insert(folder(1));
        let sub = tree.insert(folder(2));
        let first = tree.insert(text(3));
        let alias = tree.insert(text(4));
        let target = tree.insert(text(5));
        tree.append_child(root, sub);
        tree.append_child(root, first);
        tree.append_child(root, alias);
        tree.append_child(sub, target);

        assert_eq!(tree.replace_child(root, alias, target), Some(2));
        let slot = tree[root].children()[2];
        assert_eq!(slot.node, target);
        assert_eq!(slot.link, Link::Shared);
        // Ownership is unchanged
        assert_eq!(tree[target].parent(), Some(sub));
        // Shared edges are not followed, so the target is visited once
        assert_eq!(tree.preorder(root), vec![root, sub, target, first]);
    }

    #[test]
    fn test_remove_drops_owned_subtree_only() {
        let mut tree = ResourceTree::new();
        let root = tree.insert(folder(1));
        let sub = tree.insert(folder(2));
        let owned = tree.insert(text(3));
        let other = tree.insert(text(4));
        tree.append_child(root, sub);
        tree.append_child(root, other);
        tree.append_child(sub, owned);

        tree.remove_child(root, sub);
        tree.remove(sub);
        assert!(!tree.contains(sub));
        assert!(!tree.contains(owned));
        assert!(tree.contains(other));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_remove_deep_chain() {
        let mut tree = ResourceTree::new();
        let root = tree.insert(folder(0));
        let mut parent = root;
        for i in 1..=100_000 {
            let next = tree.insert(folder(i));
            tree.append_child(parent, next);
            parent = next;
        }

        assert!(tree.remove(root).is_some());
        assert!(tree.is_empty());
    }

    #[test]
    fn test_find_dfs_ignores_empty_and_applies_filter() {
        let mut tree = ResourceTree::new();
        let root = tree.insert(folder(1));
        let a = tree.insert(text(7));
        let b = tree.insert(folder(7));
        tree.append_child(root, a);
        tree.append_child(root, b);

        assert_eq!(tree.find_dfs(root, Guid::from_u64(7), |_| true), Some(a));
        assert_eq!(
            tree.find_dfs(root, Guid::from_u64(7), |n| n.gid() == Gid::FOLDER),
            Some(b)
        );
        assert_eq!(tree.find_dfs(root, Guid::EMPTY, |_| true), None);
    }
}
