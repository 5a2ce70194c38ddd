pub mod config;
pub mod error;
pub mod language;
pub mod selection;
pub mod summarize;
pub mod syntax;
pub mod text;

pub use error::{KirinukiError, KirinukiResult};
pub use language::{SupportedLanguage, parse_document, parse_document_named};
pub use selection::{SelectionAdjustment, adjust_selection};
pub use summarize::{
    CostOverride, CostWeights, DocumentInfo, LineNumberStyle, NodeInfo, SummarizeOptions,
    SummarizeSettings, SummaryDocument, summarize, summarize_one,
};
pub use syntax::{DenseTextTree, OverlayNode};
pub use text::{OffsetRange, ProjectedText, StringFragment, TextEdit};
