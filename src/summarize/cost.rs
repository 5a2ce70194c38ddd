use crate::syntax::{DenseTextTree, NodeId};
use crate::text::OffsetRange;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Weights of the base cost `scope·s + depth·d + distance·(dist / len)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostWeights {
    pub scope: f64,
    pub depth: f64,
    pub distance: f64,
    /// Applied to the distance of nodes that come after the selection
    pub below_selection_multiplier: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            scope: 100.0,
            depth: 1.0,
            distance: 10.0,
            below_selection_multiplier: 3.0,
        }
    }
}

/// A dense-tree node as a cost override sees it
#[derive(Debug, Clone, Copy)]
pub struct NodeInfo<'t> {
    pub id: NodeId,
    /// `None` for gaps and the virtual root
    pub kind: Option<&'t str>,
    pub range: OffsetRange,
    pub depth: usize,
    pub is_leaf: bool,
    pub text: &'t str,
}

/// The document a node belongs to
#[derive(Debug, Clone, Copy)]
pub struct DocumentInfo<'t> {
    /// Position in the batch passed to `summarize`
    pub index: usize,
    pub text: &'t str,
    pub selection: Option<OffsetRange>,
}

/// Replaces or vetoes the cost of a node.
///
/// Returning `None` excludes the node from the greedy pass. A non-positive
/// cost that is lower than the base cost pins the node and its subtree.
///
/// Pinned nodes survive regardless of the budget. An override that returns
/// `Some(0.0)` for every node pins everything below the root, so the output is
/// the whole document whatever the budget. Return the base cost for nodes that
/// should compete for the budget.
pub trait CostOverride: Send + Sync {
    fn cost(
        &self,
        node: &NodeInfo<'_>,
        base_cost: f64,
        document: &DocumentInfo<'_>,
    ) -> Option<f64>;
}

impl<F> CostOverride for F
where
    F: Fn(&NodeInfo<'_>, f64, &DocumentInfo<'_>) -> Option<f64> + Send + Sync,
{
    fn cost(
        &self,
        node: &NodeInfo<'_>,
        base_cost: f64,
        document: &DocumentInfo<'_>,
    ) -> Option<f64> {
        self(node, base_cost, document)
    }
}

/// Effective cost of one node
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct NodeCost {
    /// `None` when vetoed
    pub cost: Option<f64>,
    /// Survives unconditionally, with its subtree
    pub pinned: bool,
}

/// Base cost of every node, indexed by node id
pub(crate) fn base_costs(
    tree: &DenseTextTree,
    selection: Option<OffsetRange>,
    weights: &CostWeights,
) -> Vec<f64> {
    let nodes = tree.nodes();
    let Some(selection) = selection else {
        return nodes
            .iter()
            .map(|node| weights.depth * node.depth as f64)
            .collect();
    };

    // children have larger ids than their parent, so a reverse sweep sees them first
    let mut scope_down = vec![f64::INFINITY; nodes.len()];
    for id in (0..nodes.len()).rev() {
        let node = &nodes[id];
        scope_down[id] = if node.is_leaf() {
            if node.range.touches(&selection) {
                0.0
            } else {
                f64::INFINITY
            }
        } else {
            1.0 + node
                .children
                .iter()
                .map(|&child| scope_down[child])
                .fold(f64::INFINITY, f64::min)
        };
    }

    let mut scope = scope_down.clone();
    for id in 0..nodes.len() {
        if let Some(parent) = nodes[id].parent {
            scope[id] = scope[id].min(scope[parent]);
        }
    }

    let text_len = tree.text_len().max(1) as f64;
    nodes
        .iter()
        .enumerate()
        .map(|(id, node)| {
            let distance = distance_to_selection(node.range, selection, weights);
            weights.scope * scope[id]
                + weights.depth * node.depth as f64
                + weights.distance * (distance / text_len)
        })
        .collect()
}

fn distance_to_selection(range: OffsetRange, selection: OffsetRange, weights: &CostWeights) -> f64 {
    if range.end <= selection.start {
        (selection.start - range.end) as f64
    } else if range.start >= selection.end {
        (range.start - selection.end) as f64 * weights.below_selection_multiplier
    } else {
        0.0
    }
}

/// Apply import preservation and the caller's override on top of the base costs
pub(crate) fn effective_costs(
    tree: &DenseTextTree,
    document: &DocumentInfo<'_>,
    weights: &CostWeights,
    import_kinds: Option<&Regex>,
    cost_override: Option<&dyn CostOverride>,
) -> Vec<NodeCost> {
    let base = base_costs(tree, document.selection, weights);
    tree.nodes()
        .iter()
        .enumerate()
        .map(|(id, node)| {
            let base_cost = base[id];
            let mut cost = base_cost;
            let mut adjusted = false;

            if let (Some(pattern), Some(kind)) = (import_kinds, node.kind.as_deref())
                && pattern.is_match(kind)
            {
                cost = 0.0;
                adjusted = true;
            }

            if let Some(cost_override) = cost_override {
                let info = NodeInfo {
                    id,
                    kind: node.kind.as_deref(),
                    range: node.range,
                    depth: node.depth,
                    is_leaf: node.is_leaf(),
                    text: node.range.substring(document.text),
                };
                match cost_override.cost(&info, cost, document) {
                    Some(overridden) => {
                        adjusted |= overridden != cost;
                        cost = overridden;
                    }
                    None => {
                        return NodeCost {
                            cost: None,
                            pinned: false,
                        };
                    }
                }
            }

            NodeCost {
                cost: Some(cost),
                pinned: adjusted && cost <= 0.0 && cost < base_cost,
            }
        })
        .collect()
}
