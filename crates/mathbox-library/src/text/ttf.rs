use smallvec::SmallVec;
use ttf_parser::math::{Constants, GlyphConstruction, MathValue};
use ttf_parser::{Face, GlyphId as TtfGlyphId};

use crate::diag::FontError;
use crate::layout::{Axis, Em};
use crate::text::{GlyphId, GlyphMetrics, GlyphVariant, MathConstants, MathFont};

/// An OpenType font with a MATH table.
///
/// The font borrows its data from the host.
pub struct TtfFont<'a> {
    face: Face<'a>,
    constants: MathConstants,
    units_per_em: f64,
}

impl<'a> TtfFont<'a> {
    /// Parse the font at `index` in the data.
    ///
    /// Fails if the data is not a font or the font has no math constants.
    pub fn new(data: &'a [u8], index: u32) -> Result<Self, FontError> {
        let face = Face::parse(data, index)?;
        let math = face.tables().math.ok_or(FontError::NoMathTable)?;
        let constants = math.constants.ok_or(FontError::NoMathConstants)?;
        let units_per_em = f64::from(face.units_per_em());
        let mut constants = read_constants(constants, units_per_em);
        if let Some(variants) = math.variants {
            constants.min_connector_overlap =
                Em::from_units(variants.min_connector_overlap, units_per_em);
        }
        log::debug!(
            "loaded math font with {} glyphs and {units_per_em} units per em",
            face.number_of_glyphs()
        );
        Ok(Self { face, constants, units_per_em })
    }

    /// The underlying face.
    pub fn face(&self) -> &Face<'a> {
        &self.face
    }

    fn to_em(&self, units: impl Into<f64>) -> Em {
        Em::from_units(units, self.units_per_em)
    }

    fn metrics(&self, id: TtfGlyphId) -> GlyphMetrics {
        let advance = self.face.glyph_hor_advance(id).unwrap_or(0);
        let (ascent, descent) = self
            .face
            .glyph_bounding_box(id)
            .map(|bbox| (self.to_em(bbox.y_max), -self.to_em(bbox.y_min)))
            .unwrap_or_default();
        let glyph_info = || self.face.tables().math.and_then(|math| math.glyph_info);
        let italics = glyph_info()
            .and_then(|info| info.italic_corrections)
            .and_then(|values| values.get(id))
            .map(|value| self.to_em(value.value))
            .unwrap_or_default();
        let accent_attach = glyph_info()
            .and_then(|info| info.top_accent_attachments)
            .and_then(|values| values.get(id))
            .map(|value| self.to_em(value.value));
        GlyphMetrics {
            id: GlyphId(u32::from(id.0)),
            advance: self.to_em(advance),
            ascent,
            descent,
            italics,
            accent_attach,
        }
    }

    fn construction(&self, id: TtfGlyphId, axis: Axis) -> Option<GlyphConstruction<'a>> {
        let variants = self.face.tables().math?.variants?;
        match axis {
            Axis::X => variants.horizontal_constructions,
            Axis::Y => variants.vertical_constructions,
        }
        .get(id)
    }
}

impl MathFont for TtfFont<'_> {
    fn constants(&self) -> &MathConstants {
        &self.constants
    }

    fn glyph(&self, c: char) -> Option<GlyphMetrics> {
        let id = self.face.glyph_index(c)?;
        Some(self.metrics(id))
    }

    fn glyph_by_id(&self, id: GlyphId) -> Option<GlyphMetrics> {
        let id = u16::try_from(id.0).ok()?;
        (id < self.face.number_of_glyphs()).then(|| self.metrics(TtfGlyphId(id)))
    }

    fn variants(&self, glyph: GlyphId, axis: Axis) -> SmallVec<[GlyphVariant; 8]> {
        let Ok(id) = u16::try_from(glyph.0) else { return SmallVec::new() };
        let Some(construction) = self.construction(TtfGlyphId(id), axis) else {
            return SmallVec::new();
        };
        construction
            .variants
            .into_iter()
            .map(|variant| GlyphVariant {
                metrics: self.metrics(variant.variant_glyph),
                advance: self.to_em(variant.advance_measurement),
            })
            .collect()
    }
}

/// Convert the MATH constants to font-relative lengths.
fn read_constants(c: Constants, units_per_em: f64) -> MathConstants {
    let em = |value: MathValue| Em::from_units(value.value, units_per_em);
    let units = |value: u16| Em::from_units(value, units_per_em);
    let percent = |value: i16| f64::from(value) / 100.0;
    MathConstants {
        script_percent_scale_down: percent(c.script_percent_scale_down()),
        script_script_percent_scale_down: percent(c.script_script_percent_scale_down()),
        delimited_sub_formula_min_height: units(c.delimited_sub_formula_min_height()),
        display_operator_min_height: units(c.display_operator_min_height()),
        axis_height: em(c.axis_height()),
        accent_base_height: em(c.accent_base_height()),
        subscript_shift_down: em(c.subscript_shift_down()),
        subscript_top_max: em(c.subscript_top_max()),
        subscript_baseline_drop_min: em(c.subscript_baseline_drop_min()),
        superscript_shift_up: em(c.superscript_shift_up()),
        superscript_shift_up_cramped: em(c.superscript_shift_up_cramped()),
        superscript_bottom_min: em(c.superscript_bottom_min()),
        superscript_baseline_drop_max: em(c.superscript_baseline_drop_max()),
        sub_superscript_gap_min: em(c.sub_superscript_gap_min()),
        superscript_bottom_max_with_subscript: em(c.superscript_bottom_max_with_subscript()),
        space_after_script: em(c.space_after_script()),
        upper_limit_gap_min: em(c.upper_limit_gap_min()),
        upper_limit_baseline_rise_min: em(c.upper_limit_baseline_rise_min()),
        lower_limit_gap_min: em(c.lower_limit_gap_min()),
        lower_limit_baseline_drop_min: em(c.lower_limit_baseline_drop_min()),
        stack_top_shift_up: em(c.stack_top_shift_up()),
        stack_top_display_style_shift_up: em(c.stack_top_display_style_shift_up()),
        stack_bottom_shift_down: em(c.stack_bottom_shift_down()),
        stack_bottom_display_style_shift_down: em(c.stack_bottom_display_style_shift_down()),
        stack_gap_min: em(c.stack_gap_min()),
        stack_display_style_gap_min: em(c.stack_display_style_gap_min()),
        fraction_numerator_shift_up: em(c.fraction_numerator_shift_up()),
        fraction_numerator_display_style_shift_up: em(
            c.fraction_numerator_display_style_shift_up(),
        ),
        fraction_denominator_shift_down: em(c.fraction_denominator_shift_down()),
        fraction_denominator_display_style_shift_down: em(
            c.fraction_denominator_display_style_shift_down(),
        ),
        fraction_numerator_gap_min: em(c.fraction_numerator_gap_min()),
        fraction_num_display_style_gap_min: em(c.fraction_num_display_style_gap_min()),
        fraction_rule_thickness: em(c.fraction_rule_thickness()),
        fraction_denominator_gap_min: em(c.fraction_denominator_gap_min()),
        fraction_denom_display_style_gap_min: em(c.fraction_denom_display_style_gap_min()),
        overbar_vertical_gap: em(c.overbar_vertical_gap()),
        overbar_rule_thickness: em(c.overbar_rule_thickness()),
        overbar_extra_ascender: em(c.overbar_extra_ascender()),
        underbar_vertical_gap: em(c.underbar_vertical_gap()),
        underbar_rule_thickness: em(c.underbar_rule_thickness()),
        underbar_extra_descender: em(c.underbar_extra_descender()),
        radical_vertical_gap: em(c.radical_vertical_gap()),
        radical_display_style_vertical_gap: em(c.radical_display_style_vertical_gap()),
        radical_rule_thickness: em(c.radical_rule_thickness()),
        radical_extra_ascender: em(c.radical_extra_ascender()),
        radical_kern_before_degree: em(c.radical_kern_before_degree()),
        radical_kern_after_degree: em(c.radical_kern_after_degree()),
        radical_degree_bottom_raise_percent: percent(c.radical_degree_bottom_raise_percent()),
        min_connector_overlap: Em::zero(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_is_a_parse_error() {
        let result = TtfFont::new(b"definitely not a font", 0);
        assert!(matches!(result, Err(FontError::Parse(_))));
    }

    #[test]
    fn test_empty_data_is_a_parse_error() {
        assert!(matches!(TtfFont::new(&[], 0), Err(FontError::Parse(_))));
    }
}
