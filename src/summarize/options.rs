use super::cost::{CostOverride, CostWeights};
use crate::error::{KirinukiError, KirinukiResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Matches the import-like node kinds of the bundled grammars
pub const DEFAULT_IMPORT_KIND_PATTERN: &str = "^(use_declaration|extern_crate_declaration|import_statement|import_from_statement|future_import_statement)$";

pub const DEFAULT_ELLIPSIS: &str = "…";

/// How line numbers show up in a summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineNumberStyle {
    /// Plain ellipsis markers, no numbers
    #[default]
    None,
    /// Markers name the original lines they replace
    OmittedRanges,
    /// Every output line is prefixed with `<n>: `, its original line number
    Full,
}

impl LineNumberStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            LineNumberStyle::None => "none",
            LineNumberStyle::OmittedRanges => "omitted-ranges",
            LineNumberStyle::Full => "full",
        }
    }
}

impl fmt::Display for LineNumberStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LineNumberStyle {
    type Err = KirinukiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(LineNumberStyle::None),
            "omitted-ranges" => Ok(LineNumberStyle::OmittedRanges),
            "full" => Ok(LineNumberStyle::Full),
            other => Err(KirinukiError::config(format!(
                "unknown line number style '{other}' (expected none, omitted-ranges or full)"
            ))),
        }
    }
}

/// Serializable summarization settings, resolved from the configuration layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeSettings {
    pub weights: CostWeights,
    /// Import-like nodes cost 0 and always survive
    pub preserve_type_checking: bool,
    /// Regex over node kinds treated as import-like
    pub import_kind_pattern: String,
    pub always_ellipsis_for_elisions: bool,
    pub line_number_style: LineNumberStyle,
    pub ellipsis: String,
}

impl Default for SummarizeSettings {
    fn default() -> Self {
        Self {
            weights: CostWeights::default(),
            preserve_type_checking: false,
            import_kind_pattern: DEFAULT_IMPORT_KIND_PATTERN.to_string(),
            always_ellipsis_for_elisions: false,
            line_number_style: LineNumberStyle::None,
            ellipsis: DEFAULT_ELLIPSIS.to_string(),
        }
    }
}

impl SummarizeSettings {
    /// Compiled import pattern, if import preservation is on
    pub(crate) fn import_kinds(&self) -> KirinukiResult<Option<Regex>> {
        if !self.preserve_type_checking {
            return Ok(None);
        }
        Regex::new(&self.import_kind_pattern).map(Some).map_err(|e| {
            KirinukiError::config(format!(
                "invalid importKindPattern '{}': {e}",
                self.import_kind_pattern
            ))
        })
    }
}

/// Settings plus the caller's cost override
#[derive(Default)]
pub struct SummarizeOptions {
    pub settings: SummarizeSettings,
    pub cost_override: Option<Box<dyn CostOverride>>,
}

impl SummarizeOptions {
    pub fn new(settings: SummarizeSettings) -> Self {
        Self {
            settings,
            cost_override: None,
        }
    }

    pub fn with_cost_override(mut self, cost_override: impl CostOverride + 'static) -> Self {
        self.cost_override = Some(Box::new(cost_override));
        self
    }
}

impl fmt::Debug for SummarizeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummarizeOptions")
            .field("settings", &self.settings)
            .field("cost_override", &self.cost_override.is_some())
            .finish()
    }
}
