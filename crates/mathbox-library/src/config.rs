//! Layout configuration.

use mathbox_utils::Numeric;
use serde::{Deserialize, Serialize};

use crate::diag::ConfigError;
use crate::layout::Abs;
use crate::math::MathSize;

/// How undesirable a line break at some boundary is.
#[derive(
    Debug, Default, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Penalty {
    /// The ideal break, e.g. after a relation.
    Best,
    /// A fine break, e.g. after punctuation.
    Good,
    /// A break that is acceptable when nothing better is near.
    #[default]
    Moderate,
    /// A break that should be avoided.
    Acceptable,
    /// A break that is almost never right, e.g. inside a run of letters.
    Bad,
    /// A forbidden break.
    Never,
}

/// The numeric cost of each penalty, used to compare break candidates.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyScale {
    pub best: f64,
    pub good: f64,
    pub moderate: f64,
    pub acceptable: f64,
    pub bad: f64,
}

impl PenaltyScale {
    /// The cost of a penalty, or `None` for a forbidden break.
    pub fn value(&self, penalty: Penalty) -> Option<f64> {
        Some(match penalty {
            Penalty::Best => self.best,
            Penalty::Good => self.good,
            Penalty::Moderate => self.moderate,
            Penalty::Acceptable => self.acceptable,
            Penalty::Bad => self.bad,
            Penalty::Never => return None,
        })
    }

    /// Ensure the values strictly increase.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = [self.best, self.good, self.moderate, self.acceptable, self.bad];
        if values.iter().any(|v| !v.is_finite()) || values.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::PenaltyOrder);
        }
        Ok(())
    }
}

impl Default for PenaltyScale {
    fn default() -> Self {
        Self {
            best: 0.0,
            good: 10.0,
            moderate: 50.0,
            acceptable: 100.0,
            bad: 500.0,
        }
    }
}

/// Configuration of the line fitter.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// How many legal boundaries at or before an overflow are considered.
    pub lookahead: usize,
    /// The cost of each penalty.
    pub penalties: PenaltyScale,
    /// Added to a candidate's cost for each boundary it lies before the
    /// latest candidate.
    pub step_back_cost: f64,
}

impl FitConfig {
    /// Ensure the configuration is consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookahead == 0 {
            return Err(ConfigError::ZeroLookahead);
        }
        if !(self.step_back_cost >= 0.0 && self.step_back_cost.is_finite()) {
            return Err(ConfigError::StepBackCost(self.step_back_cost));
        }
        self.penalties.validate()
    }
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            lookahead: 4,
            penalties: PenaltyScale::default(),
            step_back_cost: 1.0,
        }
    }
}

/// Configuration of a layout run.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// The base font size.
    pub font_size: Abs,
    /// The initial math size of tokenizing and line typesetting. Single
    /// frame layout takes its size as an argument instead.
    pub style: MathSize,
    /// The smallest distance between consecutive baselines, relative to the
    /// font size.
    pub min_line_advance: f64,
    /// Line fitting.
    pub fit: FitConfig,
}

impl LayoutConfig {
    /// Ensure the configuration is consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.font_size > Abs::zero() && self.font_size.is_finite()) {
            return Err(ConfigError::FontSize(self.font_size));
        }
        if !(self.min_line_advance >= 0.0 && self.min_line_advance.is_finite()) {
            return Err(ConfigError::LineAdvance(self.min_line_advance));
        }
        self.fit.validate()
    }

    /// Builder-style method to set the font size.
    pub fn with_font_size(mut self, font_size: Abs) -> Self {
        self.font_size = font_size;
        self
    }

    /// Builder-style method to set the initial math size.
    pub fn with_style(mut self, style: MathSize) -> Self {
        self.style = style;
        self
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            font_size: Abs::pt(20.0),
            style: MathSize::Display,
            min_line_advance: 0.5,
            fit: FitConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_penalties_are_ordered() {
        assert!(Penalty::Best < Penalty::Good);
        assert!(Penalty::Bad < Penalty::Never);
        let scale = PenaltyScale::default();
        assert!(scale.validate().is_ok());
        assert_eq!(scale.value(Penalty::Never), None);
    }

    #[test]
    fn test_validate_rejects_bad_configs() {
        let mut config = LayoutConfig::default();
        assert!(config.validate().is_ok());

        config.fit.penalties.good = 60.0;
        assert_eq!(config.validate(), Err(ConfigError::PenaltyOrder));

        config.fit = FitConfig { lookahead: 0, ..FitConfig::default() };
        assert_eq!(config.validate(), Err(ConfigError::ZeroLookahead));

        config.fit = FitConfig::default();
        config.min_line_advance = -1.0;
        assert_eq!(config.validate(), Err(ConfigError::LineAdvance(-1.0)));

        let config = LayoutConfig::default().with_font_size(Abs::zero());
        assert_eq!(config.validate(), Err(ConfigError::FontSize(Abs::zero())));
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: LayoutConfig =
            serde_json::from_str(r#"{"font_size": 12.0, "style": "text", "fit": {"lookahead": 2}}"#)
                .unwrap();
        assert_eq!(config.font_size, Abs::pt(12.0));
        assert_eq!(config.style, MathSize::Text);
        assert_eq!(config.fit.lookahead, 2);
        assert_eq!(config.fit.penalties, PenaltyScale::default());
    }
}
