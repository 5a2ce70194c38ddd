use crate::error::{KirinukiError, KirinukiResult};
use crate::syntax::OverlayNode;
use crate::text::{OffsetRange, floor_char_boundary};

/// Linked view of a syntax tree with explicit gaps between siblings
#[derive(Debug)]
pub(crate) struct SelectionTree {
    nodes: Vec<SelectionNode>,
}

#[derive(Debug)]
struct SelectionNode {
    range: OffsetRange,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Space before child `index` of `parent`: after child `index - 1`, or the
/// parent's start when `index == 0`; up to child `index`, or the parent's end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Gap {
    pub parent: usize,
    pub index: usize,
    pub range: OffsetRange,
}

/// Where a selection bound lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Location {
    Leaf(OffsetRange),
    Gap(Gap),
}

/// Which bound of a selection is being located
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    /// A node contains `p` when `start <= p < end`
    Start,
    /// A node contains `p` when `start < p <= end`
    End,
}

impl SelectionTree {
    pub(crate) fn build(text: &str, syntax: &OverlayNode) -> KirinukiResult<Self> {
        let mut tree = Self { nodes: Vec::new() };
        let document = OffsetRange::new(0, text.len());
        let root_range = clamp(text, syntax.range, document);

        if root_range == document {
            tree.push(text, syntax, root_range, None)?;
        } else {
            let root = tree.nodes.len();
            tree.nodes.push(SelectionNode {
                range: document,
                parent: None,
                children: Vec::new(),
            });
            let child = tree.push(text, syntax, root_range, Some(root))?;
            tree.nodes[root].children.push(child);
        }
        Ok(tree)
    }

    fn push(
        &mut self,
        text: &str,
        node: &OverlayNode,
        range: OffsetRange,
        parent: Option<usize>,
    ) -> KirinukiResult<usize> {
        let id = self.nodes.len();
        self.nodes.push(SelectionNode {
            range,
            parent,
            children: Vec::new(),
        });

        let mut children = Vec::with_capacity(node.children.len());
        let mut previous_end = range.start;
        for child in &node.children {
            let child_range = clamp(text, child.range, range);
            if child_range.start < previous_end {
                return Err(KirinukiError::invalid_gap(previous_end, child_range.start));
            }
            previous_end = child_range.end;
            children.push(self.push(text, child, child_range, Some(id))?);
        }
        self.nodes[id].children = children;
        Ok(id)
    }

    pub(crate) fn root_range(&self) -> OffsetRange {
        self.nodes[0].range
    }

    fn gap(&self, parent: usize, index: usize) -> Gap {
        let node = &self.nodes[parent];
        let start = match index {
            0 => node.range.start,
            _ => self.nodes[node.children[index - 1]].range.end,
        };
        let end = match node.children.get(index) {
            Some(&child) => self.nodes[child].range.start,
            None => node.range.end,
        };
        Gap {
            parent,
            index,
            range: OffsetRange::new(start, end.max(start)),
        }
    }

    /// Gap mirroring `gap` at the other end of the same parent
    pub(crate) fn matching_gap(&self, gap: Gap) -> Gap {
        let count = self.nodes[gap.parent].children.len();
        self.gap(gap.parent, count - gap.index)
    }

    /// Descend from the root to the leaf or gap holding `offset`
    pub(crate) fn locate(&self, offset: usize, side: Side) -> Location {
        let mut current = 0;
        loop {
            let node = &self.nodes[current];
            if node.children.is_empty() {
                return Location::Leaf(node.range);
            }
            let contains = |range: OffsetRange| match side {
                Side::Start => range.start <= offset && offset < range.end,
                Side::End => range.start < offset && offset <= range.end,
            };
            match node
                .children
                .iter()
                .copied()
                .find(|&child| contains(self.nodes[child].range))
            {
                Some(child) => current = child,
                None => {
                    let index = node
                        .children
                        .iter()
                        .take_while(|&&child| match side {
                            Side::Start => self.nodes[child].range.start <= offset,
                            Side::End => self.nodes[child].range.start < offset,
                        })
                        .count();
                    return Location::Gap(self.gap(current, index));
                }
            }
        }
    }
}

fn clamp(text: &str, range: OffsetRange, bounds: OffsetRange) -> OffsetRange {
    let start = floor_char_boundary(text, range.start.clamp(bounds.start, bounds.end))
        .max(bounds.start);
    let end = floor_char_boundary(text, range.end.clamp(start, bounds.end)).max(start);
    OffsetRange::new(start, end)
}
