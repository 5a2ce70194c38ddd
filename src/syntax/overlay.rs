use crate::text::OffsetRange;
use tree_sitter::Node;

/// Owned syntax node: a kind label, a byte range and children in document order.
///
/// This is the only shape of syntax tree the summarizer and the selection
/// adjuster consume, so any parser can feed them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayNode {
    pub kind: String,
    pub range: OffsetRange,
    pub children: Vec<OverlayNode>,
}

impl OverlayNode {
    pub fn new(kind: impl Into<String>, range: OffsetRange, children: Vec<OverlayNode>) -> Self {
        Self {
            kind: kind.into(),
            range,
            children,
        }
    }

    pub fn leaf(kind: impl Into<String>, range: OffsetRange) -> Self {
        Self::new(kind, range, Vec::new())
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Convert a tree-sitter node, keeping named and anonymous children
    pub fn from_tree_sitter(node: Node<'_>) -> Self {
        Self::convert(node, false)
    }

    /// Convert a tree-sitter node, keeping only named children.
    ///
    /// Punctuation such as braces then falls into the gaps between children.
    pub fn from_tree_sitter_named(node: Node<'_>) -> Self {
        Self::convert(node, true)
    }

    fn convert(node: Node<'_>, named_only: bool) -> Self {
        let mut cursor = node.walk();
        let children = if named_only {
            node.named_children(&mut cursor)
                .map(|child| Self::convert(child, named_only))
                .collect()
        } else {
            node.children(&mut cursor)
                .map(|child| Self::convert(child, named_only))
                .collect()
        };
        let range = node.byte_range();
        Self::new(node.kind(), OffsetRange::from(range), children)
    }

    /// Pre-order walk over this node and its descendants
    pub fn walk(&self, visitor: &mut impl FnMut(&OverlayNode)) {
        visitor(self);
        for child in &self.children {
            child.walk(visitor);
        }
    }

    /// First node of `kind` in pre-order
    pub fn find_kind(&self, kind: &str) -> Option<&OverlayNode> {
        if self.kind == kind {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_kind(kind))
    }
}
