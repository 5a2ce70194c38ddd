//! Text primitives.
//!
//! This module provides the value types every other layer is built on:
//! - Byte ranges and ordered replacement lists (`OffsetRange`, `TextEdit`)
//! - The fragment algebra summaries are rendered with (`StringFragment`)
//! - Offset/position conversion and bidirectional projection (`ProjectedText`)

pub mod edit;
pub mod fragment;
pub mod position;
pub mod projected;
pub mod range;

pub use edit::{Bias, SingleEdit, TextEdit};
pub use fragment::{FragmentBuilder, StringFragment, TextLength};
pub use position::{Position, PositionMapper, PositionTransformer, Range};
pub use projected::ProjectedText;
pub use range::{OffsetRange, floor_char_boundary};
