//! General tree backed by an arena of nodes.
//!
//! Nodes are addressed by [`NodeId`] handles. A parent owns its children (by
//! handle, in insertion order); the back-reference to the parent is a plain
//! handle, so there are no reference cycles. Nodes are never removed.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("tree is not empty")]
    AlreadyRooted,
}

/// Handle to a node inside a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Node<T> {
    element: T,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl<T> Node<T> {
    pub fn element(&self) -> &T {
        &self.element
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// True if this node has at least one child.
    pub fn is_internal(&self) -> bool {
        !self.children.is_empty()
    }

    /// True if this node is a leaf.
    pub fn is_external(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Tree<T> {
    nodes: Vec<Node<T>>,
    root: Option<NodeId>,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Tree<T> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }

    /// Number of nodes ever added to the tree.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Creates the root of an empty tree. Fails without touching the tree if
    /// a root already exists.
    pub fn add_root(&mut self, element: T) -> Result<NodeId, TreeError> {
        if self.root.is_some() {
            return Err(TreeError::AlreadyRooted);
        }
        let id = self.push(element, None);
        self.root = Some(id);
        Ok(id)
    }

    /// Appends a child to `parent` and returns its handle.
    ///
    /// # Panics
    ///
    /// Panics if `parent` was not issued by this tree.
    pub fn add_child(&mut self, parent: NodeId, element: T) -> NodeId {
        assert!(parent.0 < self.nodes.len(), "node {:?} is not in this tree", parent);
        let id = self.push(element, Some(parent));
        self.nodes[parent.0].children.push(id);
        id
    }

    fn push(&mut self, element: T, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            element,
            parent,
            children: Vec::new(),
        });
        id
    }

    pub fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> &T {
        &self.nodes[id.0].element
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut T {
        &mut self.nodes[id.0].element
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Height of the subtree rooted at `id`; a leaf has height 0.
    pub fn height(&self, id: NodeId) -> usize {
        self.children(id)
            .iter()
            .map(|&c| 1 + self.height(c))
            .max()
            .unwrap_or(0)
    }

    /// Number of edges between `id` and the root.
    pub fn depth(&self, id: NodeId) -> usize {
        match self.parent(id) {
            None => 0,
            Some(p) => 1 + self.depth(p),
        }
    }

    /// All nodes, each before its children.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut snapshot = Vec::with_capacity(self.nodes.len());
        if let Some(root) = self.root {
            self.preorder_subtree(root, &mut snapshot);
        }
        snapshot
    }

    fn preorder_subtree(&self, id: NodeId, snapshot: &mut Vec<NodeId>) {
        snapshot.push(id);
        for &c in self.children(id) {
            self.preorder_subtree(c, snapshot);
        }
    }

    /// All nodes, each after its children.
    pub fn postorder(&self) -> Vec<NodeId> {
        let mut snapshot = Vec::with_capacity(self.nodes.len());
        if let Some(root) = self.root {
            self.postorder_subtree(root, &mut snapshot);
        }
        snapshot
    }

    fn postorder_subtree(&self, id: NodeId, snapshot: &mut Vec<NodeId>) {
        for &c in self.children(id) {
            self.postorder_subtree(c, snapshot);
        }
        snapshot.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Tree<&'static str>, NodeId, NodeId, NodeId, NodeId) {
        let mut tree = Tree::new();
        let root = tree.add_root("root").unwrap();
        let a = tree.add_child(root, "a");
        let b = tree.add_child(root, "b");
        let a1 = tree.add_child(a, "a1");
        (tree, root, a, b, a1)
    }

    #[test]
    fn test_empty_tree() {
        let tree: Tree<u8> = Tree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.size(), 0);
        assert!(tree.root().is_none());
        assert!(tree.preorder().is_empty());
        assert!(tree.postorder().is_empty());
    }

    #[test]
    fn test_add_root_twice_fails_without_mutation() {
        let mut tree = Tree::new();
        tree.add_root(1).unwrap();
        assert_eq!(tree.add_root(2), Err(TreeError::AlreadyRooted));
        assert_eq!(tree.size(), 1);
        assert_eq!(*tree.get(tree.root().unwrap()), 1);
    }

    #[test]
    fn test_children_keep_insertion_order() {
        let (tree, root, a, b, _) = sample();
        assert_eq!(tree.children(root), &[a, b]);
        assert_eq!(tree.parent(a), Some(root));
        assert_eq!(tree.parent(root), None);
        assert_eq!(tree.size(), 4);
    }

    #[test]
    fn test_height_and_depth() {
        let (tree, root, a, b, a1) = sample();
        assert_eq!(tree.height(root), 2);
        assert_eq!(tree.height(a), 1);
        assert_eq!(tree.height(b), 0);
        assert_eq!(tree.depth(root), 0);
        assert_eq!(tree.depth(a1), 2);
    }

    #[test]
    fn test_traversal_orders() {
        let (tree, root, a, b, a1) = sample();
        assert_eq!(tree.preorder(), vec![root, a, a1, b]);
        assert_eq!(tree.postorder(), vec![a1, a, b, root]);
        // snapshots are restartable
        assert_eq!(tree.preorder(), tree.preorder());
    }

    #[test]
    fn test_leaf_queries() {
        let (tree, root, _, b, _) = sample();
        assert!(tree.node(root).is_internal());
        assert!(tree.node(b).is_external());
    }
}
