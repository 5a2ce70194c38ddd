use crate::summarize::{CostWeights, LineNumberStyle, SummarizeSettings};
use serde::{Deserialize, Serialize};

/// Cost weights as written in a config file; unset fields fall through to lower layers
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub below_selection_multiplier: Option<f64>,
}

/// One layer of `kirinuki.toml`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SummarizeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preserve_type_checking: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_kind_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub always_ellipsis_for_elisions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number_style: Option<LineNumberStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ellipsis: Option<String>,
    /// Tables come after plain values in TOML output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights: Option<WeightsConfig>,
}

impl WeightsConfig {
    fn merge(fallback: Self, primary: Self) -> Self {
        Self {
            scope: primary.scope.or(fallback.scope),
            depth: primary.depth.or(fallback.depth),
            distance: primary.distance.or(fallback.distance),
            below_selection_multiplier: primary
                .below_selection_multiplier
                .or(fallback.below_selection_multiplier),
        }
    }

    fn resolve(self) -> CostWeights {
        let defaults = CostWeights::default();
        CostWeights {
            scope: self.scope.unwrap_or(defaults.scope),
            depth: self.depth.unwrap_or(defaults.depth),
            distance: self.distance.unwrap_or(defaults.distance),
            below_selection_multiplier: self
                .below_selection_multiplier
                .unwrap_or(defaults.below_selection_multiplier),
        }
    }
}

impl SummarizeConfig {
    /// Merge two layers, preferring values from `primary` over `fallback`
    pub fn merge(fallback: Self, primary: Self) -> Self {
        let weights = match (fallback.weights, primary.weights) {
            (Some(fallback), Some(primary)) => Some(WeightsConfig::merge(fallback, primary)),
            (fallback, primary) => primary.or(fallback),
        };
        Self {
            budget: primary.budget.or(fallback.budget),
            weights,
            preserve_type_checking: primary
                .preserve_type_checking
                .or(fallback.preserve_type_checking),
            import_kind_pattern: primary.import_kind_pattern.or(fallback.import_kind_pattern),
            always_ellipsis_for_elisions: primary
                .always_ellipsis_for_elisions
                .or(fallback.always_ellipsis_for_elisions),
            line_number_style: primary.line_number_style.or(fallback.line_number_style),
            ellipsis: primary.ellipsis.or(fallback.ellipsis),
        }
    }

    /// Concrete settings; anything still unset takes the built-in default
    pub fn resolve(&self) -> SummarizeSettings {
        let defaults = SummarizeSettings::default();
        SummarizeSettings {
            weights: self.weights.unwrap_or_default().resolve(),
            preserve_type_checking: self
                .preserve_type_checking
                .unwrap_or(defaults.preserve_type_checking),
            import_kind_pattern: self
                .import_kind_pattern
                .clone()
                .unwrap_or(defaults.import_kind_pattern),
            always_ellipsis_for_elisions: self
                .always_ellipsis_for_elisions
                .unwrap_or(defaults.always_ellipsis_for_elisions),
            line_number_style: self.line_number_style.unwrap_or(defaults.line_number_style),
            ellipsis: self.ellipsis.clone().unwrap_or(defaults.ellipsis),
        }
    }
}
