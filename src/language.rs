//! Parser front-end for the languages the CLI can summarize.
//!
//! The summarizer itself only consumes [`OverlayNode`]s; this module turns
//! source text into one with the bundled tree-sitter grammars.

use crate::error::{KirinukiError, KirinukiResult};
use crate::syntax::OverlayNode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tree_sitter::{Language, Parser, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportedLanguage {
    Rust,
    Python,
}

impl SupportedLanguage {
    pub const ALL: [SupportedLanguage; 2] = [SupportedLanguage::Rust, SupportedLanguage::Python];

    pub fn name(self) -> &'static str {
        match self {
            SupportedLanguage::Rust => "rust",
            SupportedLanguage::Python => "python",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "rust" | "rs" => Some(SupportedLanguage::Rust),
            "python" | "py" => Some(SupportedLanguage::Python),
            _ => None,
        }
    }

    /// Extension without the leading dot
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "rs" => Some(SupportedLanguage::Rust),
            "py" | "pyi" => Some(SupportedLanguage::Python),
            _ => None,
        }
    }

    /// Detect from a `#!` interpreter line
    pub fn from_shebang(content: &str) -> Option<Self> {
        let first_line = content.lines().next()?;
        let shebang = first_line.strip_prefix("#!")?;
        let interpreter = shebang.split_whitespace().last()?;
        let binary = interpreter.rsplit('/').next().unwrap_or(interpreter);
        match binary {
            "python" | "python3" | "python2" => Some(SupportedLanguage::Python),
            _ => None,
        }
    }

    /// Extension first, then shebang
    pub fn detect(path: &Path, content: &str) -> Option<Self> {
        path.extension()
            .and_then(|extension| extension.to_str())
            .and_then(Self::from_extension)
            .or_else(|| Self::from_shebang(content))
    }

    pub fn tree_sitter_language(self) -> Language {
        match self {
            SupportedLanguage::Rust => tree_sitter_rust::LANGUAGE.into(),
            SupportedLanguage::Python => tree_sitter_python::LANGUAGE.into(),
        }
    }

    pub fn parse(self, text: &str) -> KirinukiResult<Tree> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.tree_sitter_language())
            .map_err(|e| KirinukiError::parse(format!("{} grammar: {e}", self.name())))?;
        parser
            .parse(text, None)
            .ok_or_else(|| KirinukiError::parse(format!("{} parser returned no tree", self.name())))
    }
}

impl fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SupportedLanguage {
    type Err = KirinukiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| KirinukiError::unsupported_language(s))
    }
}

/// Parse `text` into an overlay keeping every child, punctuation included
pub fn parse_document(text: &str, language: SupportedLanguage) -> KirinukiResult<OverlayNode> {
    let tree = language.parse(text)?;
    log::trace!(
        target: "kirinuki::language",
        "Parsed {} bytes of {} (has_error: {})",
        text.len(),
        language,
        tree.root_node().has_error()
    );
    Ok(OverlayNode::from_tree_sitter(tree.root_node()))
}

/// Parse `text` into an overlay of named nodes only
pub fn parse_document_named(
    text: &str,
    language: SupportedLanguage,
) -> KirinukiResult<OverlayNode> {
    let tree = language.parse(text)?;
    Ok(OverlayNode::from_tree_sitter_named(tree.root_node()))
}
