//! Budget-bounded, syntax-aware summaries.
//!
//! Every node of every document gets a cost; nodes are then marked surviving
//! in ascending cost order, across all documents at once, until the projected
//! output would exceed the shared budget. Budgets count `char`s, so a
//! one-character marker costs the same as one character of source.

pub mod cost;
mod elision;
mod line_numbers;
pub mod options;
mod survival;

pub use cost::{CostOverride, CostWeights, DocumentInfo, NodeInfo};
pub use options::{LineNumberStyle, SummarizeOptions, SummarizeSettings};

use crate::error::KirinukiResult;
use crate::syntax::{DenseTextTree, NodeId, OverlayNode};
use crate::text::{
    OffsetRange, PositionTransformer, ProjectedText, StringFragment, floor_char_boundary,
};
use cost::NodeCost;
use elision::ElisionStyle;
use rayon::prelude::*;
use survival::SurvivalTree;

/// One input of a batch summary
#[derive(Debug, Clone, Copy)]
pub struct SummaryDocument<'a> {
    pub text: &'a str,
    /// `None` when no parser is available; the document is then one gap
    pub syntax: Option<&'a OverlayNode>,
    pub selection: Option<OffsetRange>,
}

impl<'a> SummaryDocument<'a> {
    pub fn new(text: &'a str, syntax: Option<&'a OverlayNode>) -> Self {
        Self {
            text,
            syntax,
            selection: None,
        }
    }

    pub fn with_selection(mut self, selection: OffsetRange) -> Self {
        self.selection = Some(selection);
        self
    }
}

/// Per-document state built before the greedy pass
struct PreparedDocument<'a> {
    text: &'a str,
    tree: DenseTextTree,
    selection: Option<OffsetRange>,
    costs: Vec<NodeCost>,
    lines: PositionTransformer,
}

/// Summarize several documents against one shared budget (in `char`s).
///
/// Results come back in input order.
pub fn summarize(
    documents: &[SummaryDocument<'_>],
    budget: usize,
    options: &SummarizeOptions,
) -> KirinukiResult<Vec<ProjectedText>> {
    let settings = &options.settings;
    let import_kinds = settings.import_kinds()?;
    let cost_override = options.cost_override.as_deref();

    let prepared = documents
        .par_iter()
        .enumerate()
        .map(|(index, document)| {
            let text = document.text;
            let tree = DenseTextTree::build(text, document.syntax)?;
            let selection = document.selection.map(|selection| clamp_selection(text, selection));
            let info = DocumentInfo {
                index,
                text,
                selection,
            };
            let costs = cost::effective_costs(
                &tree,
                &info,
                &settings.weights,
                import_kinds.as_ref(),
                cost_override,
            );
            Ok(PreparedDocument {
                text,
                tree,
                selection,
                costs,
                lines: PositionTransformer::new(text),
            })
        })
        .collect::<KirinukiResult<Vec<_>>>()?;

    let style = ElisionStyle::from_settings(settings);
    let full_line_numbers = settings.line_number_style == LineNumberStyle::Full;
    let mut trees: Vec<SurvivalTree<'_>> = prepared
        .iter()
        .map(|doc| SurvivalTree::new(&doc.tree, doc.text, &doc.lines, &style))
        .collect();

    for (doc, survival) in prepared.iter().zip(trees.iter_mut()) {
        if let Some(selection) = doc.selection {
            for leaf in doc.tree.leaves() {
                if doc.tree.node(leaf).range.touches(&selection) {
                    survival.mark(leaf);
                }
            }
        }
        for (id, cost) in doc.costs.iter().enumerate() {
            if cost.pinned {
                survival.mark_subtree(id);
            }
        }
        survival.refresh();
    }

    let mut snapshot: Vec<StringFragment<'_>> =
        trees.iter().map(SurvivalTree::root_fragment).collect();
    let mut lengths: Vec<usize> = prepared
        .iter()
        .zip(&snapshot)
        .map(|(doc, fragment)| measured_len(fragment, doc, full_line_numbers))
        .collect();
    let mut total: usize = lengths.iter().sum();
    if total > budget {
        log::debug!(
            target: "kirinuki::summarize",
            "Selection and pinned nodes alone take {total} chars, over the budget of {budget}"
        );
    }

    let mut queue: Vec<(f64, usize, NodeId)> = prepared
        .iter()
        .enumerate()
        .flat_map(|(doc, prepared)| {
            prepared
                .costs
                .iter()
                .enumerate()
                .filter_map(move |(id, cost)| cost.cost.map(|cost| (cost, doc, id)))
        })
        .collect();
    queue.sort_by(|a, b| {
        a.0.total_cmp(&b.0)
            .then_with(|| a.1.cmp(&b.1))
            .then_with(|| a.2.cmp(&b.2))
    });

    let mut accepted = 0usize;
    for (cost, doc, id) in queue {
        let survival = &mut trees[doc];
        if survival.is_surviving(id) {
            continue;
        }
        survival.mark(id);
        survival.refresh();
        let fragment = survival.root_fragment();
        let length = measured_len(&fragment, &prepared[doc], full_line_numbers);
        let candidate = total - lengths[doc] + length;
        if candidate > budget {
            log::debug!(
                target: "kirinuki::summarize",
                "Stopping at node {id} of document {doc} (cost {cost}): {candidate} chars exceeds budget {budget}"
            );
            break;
        }
        total = candidate;
        lengths[doc] = length;
        snapshot[doc] = fragment;
        accepted += 1;
    }

    log::debug!(
        target: "kirinuki::summarize",
        "Summarized {} document(s): {accepted} node(s) accepted, {total} of {budget} chars",
        prepared.len()
    );

    prepared
        .iter()
        .zip(&snapshot)
        .map(|(doc, fragment)| {
            let edit = fragment.to_edit(doc.text.len())?;
            let projected = ProjectedText::new(doc.text, edit);
            Ok(if full_line_numbers {
                line_numbers::number_lines(&projected)
            } else {
                projected
            })
        })
        .collect()
}

/// Summarize a single document
pub fn summarize_one(
    text: &str,
    syntax: Option<&OverlayNode>,
    selection: Option<OffsetRange>,
    budget: usize,
    options: &SummarizeOptions,
) -> KirinukiResult<ProjectedText> {
    let document = SummaryDocument {
        text,
        syntax,
        selection,
    };
    let mut results = summarize(&[document], budget, options)?;
    Ok(results.pop().unwrap_or_else(|| ProjectedText::unchanged(text)))
}

/// Output length in `char`s, plus room for line number prefixes when they will be added
fn measured_len(
    fragment: &StringFragment<'_>,
    doc: &PreparedDocument<'_>,
    full_line_numbers: bool,
) -> usize {
    if full_line_numbers && !fragment.is_empty() {
        fragment.char_len()
            + line_numbers::prefix_estimate(fragment.line_breaks(), doc.lines.line_count())
    } else {
        fragment.char_len()
    }
}

fn clamp_selection(text: &str, selection: OffsetRange) -> OffsetRange {
    let start = floor_char_boundary(text, selection.start);
    let end = floor_char_boundary(text, selection.end).max(start);
    OffsetRange::new(start, end)
}
