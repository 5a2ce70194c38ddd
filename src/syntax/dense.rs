use super::overlay::OverlayNode;
use crate::error::{KirinukiError, KirinukiResult};
use crate::text::{OffsetRange, floor_char_boundary};

/// Index of a node in a [`DenseTextTree`] arena; ids follow pre-order
pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenseNode {
    /// Syntax kind; `None` for synthetic gaps and the virtual root
    pub kind: Option<String>,
    pub range: OffsetRange,
    pub depth: usize,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl DenseNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Synthetic leaf covering text no syntax node claims
    pub fn is_gap(&self) -> bool {
        self.kind.is_none() && self.is_leaf()
    }
}

/// Tree whose leaves partition `[0, text.len())` exactly.
///
/// Built from an optional syntax tree, filling uncovered spans with gap leaves.
#[derive(Debug, Clone)]
pub struct DenseTextTree {
    nodes: Vec<DenseNode>,
    text_len: usize,
}

impl DenseTextTree {
    pub const ROOT: NodeId = 0;

    pub fn build(text: &str, syntax: Option<&OverlayNode>) -> KirinukiResult<Self> {
        let mut builder = Builder {
            text,
            nodes: Vec::new(),
        };
        let document = OffsetRange::new(0, text.len());

        match syntax {
            None => {
                builder.push_gap(document, None, 0)?;
            }
            Some(root) => {
                let root_range = builder.clamp(root.range, document);
                if root_range == document {
                    builder.push_syntax(root, root_range, None, 0)?;
                } else {
                    log::debug!(
                        target: "kirinuki::dense",
                        "Syntax root {} does not span the document; wrapping in a virtual root",
                        root_range
                    );
                    let virtual_root = builder.push(None, document, None, 0);
                    let mut children = Vec::new();
                    if root_range.start > 0 {
                        children.push(builder.push_gap(
                            OffsetRange::new(0, root_range.start),
                            Some(virtual_root),
                            1,
                        )?);
                    }
                    if !root_range.is_empty() {
                        children.push(builder.push_syntax(root, root_range, Some(virtual_root), 1)?);
                    }
                    if root_range.end < document.end {
                        children.push(builder.push_gap(
                            OffsetRange::new(root_range.end, document.end),
                            Some(virtual_root),
                            1,
                        )?);
                    }
                    builder.nodes[virtual_root].children = children;
                }
            }
        }

        Ok(Self {
            nodes: builder.nodes,
            text_len: text.len(),
        })
    }

    pub fn root(&self) -> &DenseNode {
        &self.nodes[Self::ROOT]
    }

    pub fn node(&self, id: NodeId) -> &DenseNode {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> &[DenseNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn text_len(&self) -> usize {
        self.text_len
    }

    /// Leaf ids in document order
    pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).filter(|&id| self.nodes[id].is_leaf())
    }

    /// `id` followed by each of its ancestors up to the root
    pub fn ancestors_inclusive(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), |&current| self.nodes[current].parent)
    }

    /// `id` and all of its descendants; pre-order makes them a contiguous id block
    pub fn subtree(&self, id: NodeId) -> std::ops::Range<NodeId> {
        let mut end = id + 1;
        while end < self.nodes.len() && self.nodes[end].depth > self.nodes[id].depth {
            end += 1;
        }
        id..end
    }
}

struct Builder<'t> {
    text: &'t str,
    nodes: Vec<DenseNode>,
}

impl Builder<'_> {
    fn push(
        &mut self,
        kind: Option<String>,
        range: OffsetRange,
        parent: Option<NodeId>,
        depth: usize,
    ) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(DenseNode {
            kind,
            range,
            depth,
            parent,
            children: Vec::new(),
        });
        id
    }

    fn push_gap(
        &mut self,
        range: OffsetRange,
        parent: Option<NodeId>,
        depth: usize,
    ) -> KirinukiResult<NodeId> {
        if range.start > range.end {
            return Err(KirinukiError::invalid_gap(range.start, range.end));
        }
        Ok(self.push(None, range, parent, depth))
    }

    /// Clamp `range` into `bounds`, snapping both ends to char boundaries
    fn clamp(&self, range: OffsetRange, bounds: OffsetRange) -> OffsetRange {
        let start = floor_char_boundary(self.text, range.start.clamp(bounds.start, bounds.end))
            .max(bounds.start);
        let end = floor_char_boundary(self.text, range.end.clamp(start, bounds.end)).max(start);
        OffsetRange::new(start, end)
    }

    fn push_syntax(
        &mut self,
        node: &OverlayNode,
        range: OffsetRange,
        parent: Option<NodeId>,
        depth: usize,
    ) -> KirinukiResult<NodeId> {
        let id = self.push(Some(node.kind.clone()), range, parent, depth);
        let mut children = Vec::new();
        let mut cursor = range.start;

        for child in &node.children {
            let child_range = self.clamp(child.range, OffsetRange::new(cursor, range.end));
            if child_range.is_empty() {
                log::debug!(
                    target: "kirinuki::dense",
                    "Dropping empty {} child {} of {} at {}",
                    child.kind,
                    child.range,
                    node.kind,
                    range
                );
                continue;
            }
            if child_range.start > cursor {
                children.push(self.push_gap(
                    OffsetRange::new(cursor, child_range.start),
                    Some(id),
                    depth + 1,
                )?);
            }
            children.push(self.push_syntax(child, child_range, Some(id), depth + 1)?);
            cursor = child_range.end;
        }

        if !children.is_empty() && cursor < range.end {
            children.push(self.push_gap(
                OffsetRange::new(cursor, range.end),
                Some(id),
                depth + 1,
            )?);
        }

        self.nodes[id].children = children;
        Ok(id)
    }
}
