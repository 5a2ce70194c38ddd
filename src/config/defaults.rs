//! Default configuration values for kirinuki.
//!
//! Used as the lowest configuration layer and by `config init` to print a
//! complete, editable template.

use super::settings::{SummarizeConfig, WeightsConfig};
use crate::error::{KirinukiError, KirinukiResult};
use crate::summarize::SummarizeSettings;

/// Budget used when neither a config layer nor the command line sets one
pub const DEFAULT_BUDGET: usize = 8 * 1024;

/// Every field set to its built-in value
pub fn default_config() -> SummarizeConfig {
    let settings = SummarizeSettings::default();
    SummarizeConfig {
        budget: Some(DEFAULT_BUDGET),
        weights: Some(WeightsConfig {
            scope: Some(settings.weights.scope),
            depth: Some(settings.weights.depth),
            distance: Some(settings.weights.distance),
            below_selection_multiplier: Some(settings.weights.below_selection_multiplier),
        }),
        preserve_type_checking: Some(settings.preserve_type_checking),
        import_kind_pattern: Some(settings.import_kind_pattern),
        always_ellipsis_for_elisions: Some(settings.always_ellipsis_for_elisions),
        line_number_style: Some(settings.line_number_style),
        ellipsis: Some(settings.ellipsis),
    }
}

/// The default config rendered as TOML
pub fn default_config_toml() -> KirinukiResult<String> {
    toml::to_string_pretty(&default_config())
        .map_err(|e| KirinukiError::config(format!("failed to render default config: {e}")))
}
