use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::layout::{Axis, Em};

/// Identifies a glyph within a font.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct GlyphId(pub u32);

/// Metrics of a single glyph, relative to the font size.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlyphMetrics {
    pub id: GlyphId,
    /// The horizontal advance.
    pub advance: Em,
    /// Top of the ink box above the baseline.
    pub ascent: Em,
    /// Bottom of the ink box below the baseline.
    pub descent: Em,
    /// The italics correction.
    pub italics: Em,
    /// Where accents attach horizontally, from the left edge.
    pub accent_attach: Option<Em>,
}

impl GlyphMetrics {
    /// The total height of the ink box.
    pub fn height(&self) -> Em {
        self.ascent + self.descent
    }

    /// The horizontal accent attachment point, defaulting to the center.
    pub fn attach(&self) -> Em {
        self.accent_attach.unwrap_or(self.advance / 2.0)
    }
}

/// A larger version of a glyph for stretching.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlyphVariant {
    /// The variant's own metrics.
    pub metrics: GlyphMetrics,
    /// The size of the variant along the stretch axis.
    pub advance: Em,
}

/// Provides everything math layout needs to know about a font.
///
/// Implementations must be usable from many threads at once. Any internal
/// caching has to be thread-safe.
pub trait MathFont: Send + Sync {
    /// The font's math constants.
    fn constants(&self) -> &MathConstants;

    /// The metrics of the glyph for a character, if the font has one.
    fn glyph(&self, c: char) -> Option<GlyphMetrics>;

    /// The metrics of a glyph id, if it exists.
    fn glyph_by_id(&self, id: GlyphId) -> Option<GlyphMetrics>;

    /// Larger versions of a glyph along an axis, smallest first.
    fn variants(&self, glyph: GlyphId, axis: Axis) -> SmallVec<[GlyphVariant; 8]>;
}

/// The constants of an OpenType MATH table, relative to the font size.
///
/// Percentages are stored as fractions, so a `ScriptPercentScaleDown` of 70
/// is `0.7`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MathConstants {
    pub script_percent_scale_down: f64,
    pub script_script_percent_scale_down: f64,
    pub delimited_sub_formula_min_height: Em,
    pub display_operator_min_height: Em,
    pub axis_height: Em,
    pub accent_base_height: Em,
    pub subscript_shift_down: Em,
    pub subscript_top_max: Em,
    pub subscript_baseline_drop_min: Em,
    pub superscript_shift_up: Em,
    pub superscript_shift_up_cramped: Em,
    pub superscript_bottom_min: Em,
    pub superscript_baseline_drop_max: Em,
    pub sub_superscript_gap_min: Em,
    pub superscript_bottom_max_with_subscript: Em,
    pub space_after_script: Em,
    pub upper_limit_gap_min: Em,
    pub upper_limit_baseline_rise_min: Em,
    pub lower_limit_gap_min: Em,
    pub lower_limit_baseline_drop_min: Em,
    pub stack_top_shift_up: Em,
    pub stack_top_display_style_shift_up: Em,
    pub stack_bottom_shift_down: Em,
    pub stack_bottom_display_style_shift_down: Em,
    pub stack_gap_min: Em,
    pub stack_display_style_gap_min: Em,
    pub fraction_numerator_shift_up: Em,
    pub fraction_numerator_display_style_shift_up: Em,
    pub fraction_denominator_shift_down: Em,
    pub fraction_denominator_display_style_shift_down: Em,
    pub fraction_numerator_gap_min: Em,
    pub fraction_num_display_style_gap_min: Em,
    pub fraction_rule_thickness: Em,
    pub fraction_denominator_gap_min: Em,
    pub fraction_denom_display_style_gap_min: Em,
    pub overbar_vertical_gap: Em,
    pub overbar_rule_thickness: Em,
    pub overbar_extra_ascender: Em,
    pub underbar_vertical_gap: Em,
    pub underbar_rule_thickness: Em,
    pub underbar_extra_descender: Em,
    pub radical_vertical_gap: Em,
    pub radical_display_style_vertical_gap: Em,
    pub radical_rule_thickness: Em,
    pub radical_extra_ascender: Em,
    pub radical_kern_before_degree: Em,
    pub radical_kern_after_degree: Em,
    pub radical_degree_bottom_raise_percent: f64,
    /// The smallest overlap of parts in a glyph assembly.
    ///
    /// Layout builds no assemblies and never reads this. It is kept for
    /// hosts that draw their own assemblies from the variants.
    pub min_connector_overlap: Em,
}

impl Default for MathConstants {
    /// Values close to those of Latin Modern Math.
    fn default() -> Self {
        let em = |units: f64| Em::from_units(units, 1000.0);
        Self {
            script_percent_scale_down: 0.7,
            script_script_percent_scale_down: 0.5,
            delimited_sub_formula_min_height: em(1300.0),
            display_operator_min_height: em(1300.0),
            axis_height: em(250.0),
            accent_base_height: em(450.0),
            subscript_shift_down: em(247.0),
            subscript_top_max: em(344.0),
            subscript_baseline_drop_min: em(200.0),
            superscript_shift_up: em(363.0),
            superscript_shift_up_cramped: em(289.0),
            superscript_bottom_min: em(108.0),
            superscript_baseline_drop_max: em(250.0),
            sub_superscript_gap_min: em(160.0),
            superscript_bottom_max_with_subscript: em(344.0),
            space_after_script: em(56.0),
            upper_limit_gap_min: em(200.0),
            upper_limit_baseline_rise_min: em(111.0),
            lower_limit_gap_min: em(167.0),
            lower_limit_baseline_drop_min: em(600.0),
            stack_top_shift_up: em(444.0),
            stack_top_display_style_shift_up: em(677.0),
            stack_bottom_shift_down: em(345.0),
            stack_bottom_display_style_shift_down: em(686.0),
            stack_gap_min: em(120.0),
            stack_display_style_gap_min: em(280.0),
            fraction_numerator_shift_up: em(394.0),
            fraction_numerator_display_style_shift_up: em(677.0),
            fraction_denominator_shift_down: em(345.0),
            fraction_denominator_display_style_shift_down: em(686.0),
            fraction_numerator_gap_min: em(40.0),
            fraction_num_display_style_gap_min: em(120.0),
            fraction_rule_thickness: em(40.0),
            fraction_denominator_gap_min: em(40.0),
            fraction_denom_display_style_gap_min: em(120.0),
            overbar_vertical_gap: em(120.0),
            overbar_rule_thickness: em(40.0),
            overbar_extra_ascender: em(40.0),
            underbar_vertical_gap: em(120.0),
            underbar_rule_thickness: em(40.0),
            underbar_extra_descender: em(40.0),
            radical_vertical_gap: em(50.0),
            radical_display_style_vertical_gap: em(148.0),
            radical_rule_thickness: em(40.0),
            radical_extra_ascender: em(40.0),
            radical_kern_before_degree: em(278.0),
            radical_kern_after_degree: em(-556.0),
            radical_degree_bottom_raise_percent: 0.6,
            min_connector_overlap: em(20.0),
        }
    }
}
