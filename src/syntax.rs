//! Syntax trees as the summarizer sees them.
//!
//! `OverlayNode` is the owned input shape; `DenseTextTree` is the arena tree
//! built from it whose leaves cover every byte of the document.

pub mod dense;
pub mod overlay;

pub use dense::{DenseNode, DenseTextTree, NodeId};
pub use overlay::OverlayNode;
