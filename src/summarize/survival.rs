use super::elision::{ElidedRun, ElisionStyle, push_elided_run};
use crate::syntax::{DenseTextTree, NodeId};
use crate::text::{FragmentBuilder, PositionTransformer, StringFragment};

/// Survival flags and memoized fragments over one dense tree.
///
/// Marking a node surviving also marks its ancestors and makes them dirty;
/// [`SurvivalTree::refresh`] recomputes dirty memos children-first.
pub(crate) struct SurvivalTree<'a> {
    tree: &'a DenseTextTree,
    text: &'a str,
    lines: &'a PositionTransformer,
    style: &'a ElisionStyle,
    surviving: Vec<bool>,
    memo: Vec<Option<StringFragment<'a>>>,
    dirty: Vec<bool>,
    dirty_ids: Vec<NodeId>,
}

impl<'a> SurvivalTree<'a> {
    pub(crate) fn new(
        tree: &'a DenseTextTree,
        text: &'a str,
        lines: &'a PositionTransformer,
        style: &'a ElisionStyle,
    ) -> Self {
        let len = tree.len();
        Self {
            tree,
            text,
            lines,
            style,
            surviving: vec![false; len],
            memo: vec![None; len],
            dirty: vec![false; len],
            dirty_ids: Vec::new(),
        }
    }

    pub(crate) fn is_surviving(&self, id: NodeId) -> bool {
        self.surviving[id]
    }

    /// Mark `id` and its ancestors surviving
    pub(crate) fn mark(&mut self, id: NodeId) {
        for ancestor in self.tree.ancestors_inclusive(id) {
            self.surviving[ancestor] = true;
            self.invalidate(ancestor);
        }
    }

    /// Mark `id`, its whole subtree and its ancestors surviving
    pub(crate) fn mark_subtree(&mut self, id: NodeId) {
        for descendant in self.tree.subtree(id) {
            self.surviving[descendant] = true;
            self.invalidate(descendant);
        }
        self.mark(id);
    }

    fn invalidate(&mut self, id: NodeId) {
        if !self.dirty[id] {
            self.dirty[id] = true;
            self.dirty_ids.push(id);
        }
    }

    /// Recompute every dirty memo, deepest ids first
    pub(crate) fn refresh(&mut self) {
        let mut dirty_ids = std::mem::take(&mut self.dirty_ids);
        // pre-order ids: a child always has a larger id than its parent
        dirty_ids.sort_unstable_by(|a, b| b.cmp(a));
        for id in dirty_ids {
            let fragment = self.surviving[id].then(|| self.render(id));
            self.memo[id] = fragment;
            self.dirty[id] = false;
        }
    }

    /// Current fragment of the whole document; empty when the root does not survive
    pub(crate) fn root_fragment(&self) -> StringFragment<'a> {
        match &self.memo[DenseTextTree::ROOT] {
            Some(fragment) if self.surviving[DenseTextTree::ROOT] => fragment.clone(),
            _ => StringFragment::empty(),
        }
    }

    fn render(&self, id: NodeId) -> StringFragment<'a> {
        let node = self.tree.node(id);
        if node.is_leaf() {
            return StringFragment::original(self.text, node.range);
        }

        let children = &node.children;
        let mut builder = FragmentBuilder::new();
        let mut index = 0;
        while index < children.len() {
            let child = children[index];
            if self.surviving[child] {
                let fragment = match &self.memo[child] {
                    Some(fragment) => fragment.clone(),
                    None => self.render(child),
                };
                builder.push(fragment);
                index += 1;
                continue;
            }

            let run_start = index;
            while index < children.len() && !self.surviving[children[index]] {
                index += 1;
            }
            let first = self.tree.node(children[run_start]);
            let last = self.tree.node(children[index - 1]);
            let run = ElidedRun {
                range: first.range.join(&last.range),
                has_previous: run_start > 0,
                has_next: index < children.len(),
            };
            push_elided_run(&mut builder, self.text, self.lines, self.style, &run);
        }
        builder.build()
    }
}
