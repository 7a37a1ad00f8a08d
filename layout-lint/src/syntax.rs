//! Arena syntax tree correlated with the token stream.
//!
//! The tree only needs enough structure for the layout rules: node kinds,
//! spans and the ordered direct children (statements, cases, members).

use crate::token::Span;

/// Stable index of a node inside its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Position of the node in the arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// The four brace-delimited bodies that can carry padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// A statement block `{ ... }`.
    Block,
    /// A `switch (...) { case ... }` statement; its body is the case list.
    Switch,
    /// A class body `{ members }`.
    Class,
    /// A `static { ... }` initializer inside a class body.
    StaticBlock,
}

/// Policy category a block kind is configured under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Statement blocks and static initializers.
    Blocks,
    /// Switch bodies.
    Switches,
    /// Class bodies.
    Classes,
}

impl BlockKind {
    /// The configuration category for this kind.
    #[must_use]
    pub const fn category(self) -> Category {
        match self {
            Self::Block | Self::StaticBlock => Category::Blocks,
            Self::Switch => Category::Switches,
            Self::Class => Category::Classes,
        }
    }
}

/// Kind of a syntax node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A padded-block kind.
    Padded(BlockKind),
    /// A class method; it owns its lines but is never checked itself.
    Method,
    /// Anything else (statements, cases, fields, the program root).
    Other,
}

impl NodeKind {
    /// The block kind, if this node can carry padding.
    #[must_use]
    pub const fn block_kind(self) -> Option<BlockKind> {
        match self {
            Self::Padded(kind) => Some(kind),
            Self::Method | Self::Other => None,
        }
    }

    /// Whether lines inside this node belong to it rather than to its parent.
    #[must_use]
    pub const fn owns_scope(self) -> bool {
        matches!(self, Self::Padded(_) | Self::Method)
    }
}

/// A node of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    /// Node kind.
    pub kind: NodeKind,
    /// Full source span. For `Switch` and `StaticBlock` this includes the
    /// leading keyword; for `Block` and `Class` it starts at `{`.
    pub span: Span,
    /// Direct children in source order.
    pub children: Vec<NodeId>,
}

/// Arena of [`SyntaxNode`]s. Nodes are stored in the order they were opened,
/// which is source (pre-)order for any provider that builds top-down.
#[derive(Debug, Clone, Default)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
}

impl SyntaxTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node starting at `start` and links it as the last child of
    /// `parent`. The end of the span is set by [`SyntaxTree::close_node`].
    pub fn open_node(&mut self, kind: NodeKind, start: usize, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(SyntaxNode {
            kind,
            span: Span::empty(start),
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.index()].children.push(id);
        }
        id
    }

    /// Sets the end offset of a node opened with [`SyntaxTree::open_node`].
    pub fn close_node(&mut self, id: NodeId, end: usize) {
        self.nodes[id.index()].span.end = end;
    }

    /// Looks a node up by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.index()]
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes with their ids, in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SyntaxNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(u32::try_from(i).unwrap_or(u32::MAX)), node))
    }

    /// Nodes that can carry padding, with their block kind.
    pub fn padded_nodes(&self) -> impl Iterator<Item = (NodeId, BlockKind, &SyntaxNode)> {
        self.iter()
            .filter_map(|(id, node)| node.kind.block_kind().map(|kind| (id, kind, node)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_close_links_children() {
        let mut tree = SyntaxTree::new();
        let root = tree.open_node(NodeKind::Other, 0, None);
        let block = tree.open_node(NodeKind::Padded(BlockKind::Block), 2, Some(root));
        let stmt = tree.open_node(NodeKind::Other, 4, Some(block));
        tree.close_node(stmt, 8);
        tree.close_node(block, 10);
        tree.close_node(root, 10);

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.node(root).children, vec![block]);
        assert_eq!(tree.node(block).children, vec![stmt]);
        assert_eq!(tree.node(block).span, Span::new(2, 10));
        let padded: Vec<_> = tree.padded_nodes().map(|(id, kind, _)| (id, kind)).collect();
        assert_eq!(padded, vec![(block, BlockKind::Block)]);
    }

    #[test]
    fn test_categories() {
        assert_eq!(BlockKind::StaticBlock.category(), Category::Blocks);
        assert_eq!(BlockKind::Switch.category(), Category::Switches);
        assert_eq!(BlockKind::Class.category(), Category::Classes);
        assert!(NodeKind::Method.owns_scope());
        assert!(!NodeKind::Other.owns_scope());
    }
}
